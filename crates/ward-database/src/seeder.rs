//! 示例数据初始化
//!
//! 生成随机患者并分批写入；指定随机种子时输出可复现。

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use fake::faker::name::raw::Name;
use fake::locales::EN;
use fake::Fake;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use ward_core::{NewPatient, PatientSeedStore, Result};

const STATUSES: &[&str] = &["Active", "Inactive", "Pending", "Discharged"];
const NOTES_STATUSES: &[&str] = &["Complete", "Incomplete", "1/2 Copied", "Not Started"];
const LOCATIONS: &[&str] = &["Wing A", "Wing B", "ICU", "Emergency", "Outpatient"];

const WINDOW_START: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("invalid seed window start"),
};
const WINDOW_END: NaiveDate = match NaiveDate::from_ymd_opt(2025, 5, 29) {
    Some(date) => date,
    None => panic!("invalid seed window end"),
};

/// 生成指定数量的随机患者
pub fn generate_patients<R: Rng>(rng: &mut R, count: usize) -> Vec<NewPatient> {
    (0..count).map(|_| generate_patient(rng)).collect()
}

fn generate_patient<R: Rng>(rng: &mut R) -> NewPatient {
    let span = (WINDOW_END - WINDOW_START).num_days();
    let collaborator_count = rng.random_range(1..=3);
    let collaborators: Vec<String> = (0..collaborator_count)
        .map(|_| Name(EN).fake_with_rng(rng))
        .collect();

    NewPatient {
        name: Name(EN).fake_with_rng(rng),
        status: pick(rng, STATUSES),
        date: WINDOW_START + Duration::days(rng.random_range(0..=span)),
        notes_status: pick(rng, NOTES_STATUSES),
        room: format!("Room {}", rng.random_range(100..=999)),
        location: pick(rng, LOCATIONS),
        collaborators: collaborators.join(", "),
    }
}

fn pick<R: Rng>(rng: &mut R, options: &[&str]) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

/// 患者数据初始化器
pub struct PatientSeeder {
    store: Arc<dyn PatientSeedStore>,
    chunk_size: usize,
    rng: ChaCha8Rng,
}

impl PatientSeeder {
    /// `rng_seed` 为 `None` 时使用随机种子
    pub fn new(store: Arc<dyn PatientSeedStore>, chunk_size: usize, rng_seed: Option<u64>) -> Self {
        let seed = rng_seed.unwrap_or_else(rand::random);
        Self {
            store,
            chunk_size: chunk_size.max(1),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// 生成并写入 `count` 条患者，返回写入条数
    pub async fn seed(&mut self, count: usize) -> Result<u64> {
        info!("Starting to seed {} patients...", count);

        let patients = generate_patients(&mut self.rng, count);
        let mut inserted = 0;
        for chunk in patients.chunks(self.chunk_size) {
            inserted += self.store.insert_batch(chunk).await?;
            info!("Inserted chunk of {} patients", chunk.len());
        }

        info!("Successfully seeded {} patients", inserted);
        Ok(inserted)
    }

    /// 清空所有患者
    pub async fn clear(&self) -> Result<()> {
        info!("Clearing all patients from the database...");
        self.store.clear().await?;
        info!("All patients have been removed");
        Ok(())
    }

    /// 先清空再重新生成
    pub async fn refresh(&mut self, count: usize) -> Result<u64> {
        self.clear().await?;
        self.seed(count).await
    }
}

impl std::fmt::Debug for PatientSeeder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientSeeder")
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPatientRepository;
    use ward_core::{PatientFilter, PatientRepository};

    #[test]
    fn test_generation_is_deterministic() {
        let first = generate_patients(&mut ChaCha8Rng::seed_from_u64(7), 20);
        let second = generate_patients(&mut ChaCha8Rng::seed_from_u64(7), 20);
        assert_eq!(first, second);
    }

    #[test]
    fn test_generated_values_stay_in_range() {
        let patients = generate_patients(&mut ChaCha8Rng::seed_from_u64(42), 100);
        assert_eq!(patients.len(), 100);

        for patient in &patients {
            assert!(!patient.name.is_empty());
            assert!(STATUSES.contains(&patient.status.as_str()));
            assert!(NOTES_STATUSES.contains(&patient.notes_status.as_str()));
            assert!(LOCATIONS.contains(&patient.location.as_str()));
            assert!(patient.date >= WINDOW_START && patient.date <= WINDOW_END);

            let room: u32 = patient.room.trim_start_matches("Room ").parse().unwrap();
            assert!((100..=999).contains(&room));

            let names = patient.collaborators.split(", ").count();
            assert!((1..=3).contains(&names));
        }
    }

    #[tokio::test]
    async fn test_seed_writes_in_chunks() {
        let store = Arc::new(MemoryPatientRepository::new());
        let mut seeder = PatientSeeder::new(store.clone(), 50, Some(1));

        let inserted = seeder.seed(120).await.unwrap();

        assert_eq!(inserted, 120);
        assert_eq!(store.len().await, 120);
    }

    #[tokio::test]
    async fn test_refresh_replaces_existing_rows() {
        let store = Arc::new(MemoryPatientRepository::new());
        let mut seeder = PatientSeeder::new(store.clone(), 10, Some(2));
        seeder.seed(15).await.unwrap();

        let inserted = seeder.refresh(5).await.unwrap();

        assert_eq!(inserted, 5);
        assert_eq!(store.len().await, 5);
        let page = store.find_page(&PatientFilter::new()).await.unwrap();
        assert_eq!(page.data.first().map(|patient| patient.id), Some(16));
    }

    #[tokio::test]
    async fn test_clear_empties_store() {
        let store = Arc::new(MemoryPatientRepository::new());
        let mut seeder = PatientSeeder::new(store.clone(), 0, Some(3));
        seeder.seed(3).await.unwrap();

        seeder.clear().await.unwrap();
        assert!(store.is_empty().await);
    }
}
