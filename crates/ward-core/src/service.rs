//! 患者服务层
//!
//! 访问层的薄封装，把“记录不存在”统一转换为 [`WardError::PatientNotFound`]。

use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, WardError};
use crate::models::{DeleteOutcome, NewPatient, Patient, PatientFilter, PatientUpdate};
use crate::pagination::Page;
use crate::repository::PatientRepository;

/// 患者服务
#[derive(Clone)]
pub struct PatientService {
    repository: Arc<dyn PatientRepository>,
}

impl PatientService {
    pub fn new(repository: Arc<dyn PatientRepository>) -> Self {
        Self { repository }
    }

    /// 分页查询患者
    pub async fn get_all_patients(&self, filter: &PatientFilter) -> Result<Page<Patient>> {
        self.repository.find_page(filter).await
    }

    /// 根据ID获取患者
    pub async fn get_patient_by_id(&self, id: i64) -> Result<Patient> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(WardError::PatientNotFound(id))
    }

    /// 创建患者
    pub async fn create_patient(&self, patient: NewPatient) -> Result<Patient> {
        let created = self.repository.create(patient).await?;
        debug!("Created patient {}", created.id);
        Ok(created)
    }

    /// 更新患者
    pub async fn update_patient(&self, id: i64, update: PatientUpdate) -> Result<Patient> {
        let updated = self
            .repository
            .update(id, update)
            .await?
            .ok_or(WardError::PatientNotFound(id))?;
        debug!("Updated patient {}", id);
        Ok(updated)
    }

    /// 删除患者
    pub async fn delete_patient(&self, id: i64) -> Result<DeleteOutcome> {
        let outcome = self.repository.delete(id).await?;
        if !outcome.deleted {
            return Err(WardError::PatientNotFound(id));
        }

        debug!("Deleted patient {}", id);
        Ok(outcome)
    }
}

impl std::fmt::Debug for PatientService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientService").finish_non_exhaustive()
    }
}
