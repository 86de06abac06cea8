//! # Ward Core
//!
//! 病区患者看板的核心模块，提供数据模型、错误定义、游标分页和服务层。

pub mod error;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod service;

pub use error::{Result, WardError};
pub use models::*;
pub use pagination::{Page, PageRequest, Pagination, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use repository::{PatientRepository, PatientSeedStore};
pub use service::PatientService;
