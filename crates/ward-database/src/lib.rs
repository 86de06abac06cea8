//! # Ward 数据库模块
//!
//! 患者数据的存储适配器：PostgreSQL 连接池与查询、进程内存储，以及示例数据初始化。

pub mod connection;
pub mod memory;
pub mod models;
pub mod queries;
pub mod seeder;

// 重新导出主要类型
pub use connection::{DatabasePool, PoolSettings};
pub use memory::MemoryPatientRepository;
pub use queries::PgPatientRepository;
pub use seeder::{generate_patients, PatientSeeder};
