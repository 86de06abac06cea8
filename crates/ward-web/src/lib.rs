//! # Ward Web
//!
//! 患者接口的 HTTP 边界：路由、请求校验与错误映射。

pub mod dto;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, WebServer};
