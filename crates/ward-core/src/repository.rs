//! 存储能力抽象
//!
//! 服务层只依赖这里的 trait，每种存储引擎提供一个适配器。

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{DeleteOutcome, NewPatient, Patient, PatientFilter, PatientUpdate};
use crate::pagination::Page;

/// 患者访问层接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// 按游标分页查询，结果按 ID 升序
    ///
    /// 非数字游标返回 [`WardError::Validation`](crate::WardError::Validation)。
    async fn find_page(&self, filter: &PatientFilter) -> Result<Page<Patient>>;

    /// 根据ID查找患者
    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>>;

    /// 创建新患者，返回带有新ID的记录
    async fn create(&self, patient: NewPatient) -> Result<Patient>;

    /// 部分更新；记录不存在时返回 `None`，不会新建
    async fn update(&self, id: i64, update: PatientUpdate) -> Result<Option<Patient>>;

    /// 删除患者；记录不存在时 `deleted` 为 false
    async fn delete(&self, id: i64) -> Result<DeleteOutcome>;
}

/// 示例数据写入接口，仅供初始化脚本使用
#[async_trait]
pub trait PatientSeedStore: Send + Sync {
    /// 批量插入，返回写入条数
    async fn insert_batch(&self, patients: &[NewPatient]) -> Result<u64>;

    /// 清空所有患者，已发放的ID不会被复用
    async fn clear(&self) -> Result<()>;
}
