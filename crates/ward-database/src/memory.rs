//! 进程内存储
//!
//! 用于本地开发和测试，与 PostgreSQL 适配器遵循同样的分页与ID规则：
//! ID 单调递增，删除或清空后不会复用。

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;
use ward_core::{
    DeleteOutcome, NewPatient, Page, PageRequest, Patient, PatientFilter, PatientRepository,
    PatientSeedStore, PatientUpdate, Result,
};

#[derive(Debug, Default)]
struct MemoryState {
    rows: BTreeMap<i64, Patient>,
    last_id: i64,
}

impl MemoryState {
    fn insert(&mut self, patient: NewPatient) -> Patient {
        self.last_id += 1;
        let stored = patient.into_patient(self.last_id);
        self.rows.insert(stored.id, stored.clone());
        stored
    }
}

/// 进程内患者访问层
#[derive(Debug, Default)]
pub struct MemoryPatientRepository {
    state: RwLock<MemoryState>,
}

impl MemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前记录数
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.rows.is_empty()
    }
}

#[async_trait]
impl PatientRepository for MemoryPatientRepository {
    async fn find_page(&self, filter: &PatientFilter) -> Result<Page<Patient>> {
        let request = PageRequest::try_from(filter)?;
        let lower = request.after.map_or(Bound::Unbounded, Bound::Excluded);

        let state = self.state.read().await;
        let rows = state
            .rows
            .range((lower, Bound::Unbounded))
            .map(|(_, patient)| patient)
            .filter(|patient| request.matches(patient))
            .take(request.fetch_size())
            .cloned()
            .collect();

        Ok(Page::of_patients(rows, request.limit))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, patient: NewPatient) -> Result<Patient> {
        Ok(self.state.write().await.insert(patient))
    }

    async fn update(&self, id: i64, update: PatientUpdate) -> Result<Option<Patient>> {
        let mut state = self.state.write().await;
        let Some(existing) = state.rows.get_mut(&id) else {
            return Ok(None);
        };

        update.apply_to(existing);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        let removed = self.state.write().await.rows.remove(&id);
        Ok(DeleteOutcome {
            id,
            deleted: removed.is_some(),
        })
    }
}

#[async_trait]
impl PatientSeedStore for MemoryPatientRepository {
    async fn insert_batch(&self, patients: &[NewPatient]) -> Result<u64> {
        let mut state = self.state.write().await;
        for patient in patients {
            state.insert(patient.clone());
        }
        Ok(patients.len() as u64)
    }

    async fn clear(&self) -> Result<()> {
        self.state.write().await.rows.clear();
        Ok(())
    }
}
