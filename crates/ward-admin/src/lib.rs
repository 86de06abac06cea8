//! # Ward Admin
//!
//! 运行时配置加载与日志初始化。

pub mod config;
pub mod logging;

pub use config::{ConfigManager, ConfigValidator, WardConfig};
pub use logging::init_logging;
