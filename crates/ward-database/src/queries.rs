//! PostgreSQL 查询操作

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use ward_core::{
    DeleteOutcome, NewPatient, Page, PageRequest, Patient, PatientFilter, PatientRepository,
    PatientSeedStore, PatientUpdate, Result,
};

use crate::connection::DatabasePool;
use crate::models::{DbPatient, PATIENT_COLUMNS};

/// 基于 PostgreSQL 的患者访问层
#[derive(Debug, Clone)]
pub struct PgPatientRepository {
    pool: PgPool,
}

impl PgPatientRepository {
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            pool: pool.pool().clone(),
        }
    }

    /// 创建数据库表（幂等）
    pub async fn create_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS patients (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR NOT NULL,
                status VARCHAR NOT NULL,
                date DATE NOT NULL,
                notes_status VARCHAR NOT NULL,
                room VARCHAR NOT NULL,
                location VARCHAR NOT NULL,
                collabrators VARCHAR NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_patients_status ON patients(status)")
            .execute(&self.pool)
            .await?;

        tracing::info!("Database tables created successfully");
        Ok(())
    }
}

/// 构造分页查询：可选的状态与游标条件，按 ID 升序多取一条
fn page_query(request: &PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query.push(PATIENT_COLUMNS);
    query.push(" FROM patients WHERE TRUE");

    if let Some(status) = &request.status {
        query.push(" AND status = ").push_bind(status.clone());
    }
    if let Some(after) = request.after {
        query.push(" AND id > ").push_bind(after);
    }

    query
        .push(" ORDER BY id ASC LIMIT ")
        .push_bind(request.fetch_size() as i64);
    query
}

#[async_trait]
impl PatientRepository for PgPatientRepository {
    async fn find_page(&self, filter: &PatientFilter) -> Result<Page<Patient>> {
        let request = PageRequest::try_from(filter)?;

        let rows = page_query(&request)
            .build_query_as::<DbPatient>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::of_patients(
            rows.into_iter().map(Patient::from).collect(),
            request.limit,
        ))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>> {
        let result = sqlx::query_as::<_, DbPatient>(&format!(
            "SELECT {} FROM patients WHERE id = $1",
            PATIENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.map(Patient::from))
    }

    async fn create(&self, patient: NewPatient) -> Result<Patient> {
        let row = sqlx::query_as::<_, DbPatient>(&format!(
            r#"
            INSERT INTO patients (name, status, date, notes_status, room, location, collabrators)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
        "#,
            PATIENT_COLUMNS
        ))
        .bind(patient.name)
        .bind(patient.status)
        .bind(patient.date)
        .bind(patient.notes_status)
        .bind(patient.room)
        .bind(patient.location)
        .bind(patient.collaborators)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// 单条语句完成读取与合并，记录被并发删除时返回 `None` 而不是重新插入
    async fn update(&self, id: i64, update: PatientUpdate) -> Result<Option<Patient>> {
        let result = sqlx::query_as::<_, DbPatient>(&format!(
            r#"
            UPDATE patients SET
                name = COALESCE($2, name),
                status = COALESCE($3, status),
                date = COALESCE($4, date),
                notes_status = COALESCE($5, notes_status),
                room = COALESCE($6, room),
                location = COALESCE($7, location),
                collabrators = COALESCE($8, collabrators)
            WHERE id = $1
            RETURNING {}
        "#,
            PATIENT_COLUMNS
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.status)
        .bind(update.date)
        .bind(update.notes_status)
        .bind(update.room)
        .bind(update.location)
        .bind(update.collaborators)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.map(Patient::from))
    }

    async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(DeleteOutcome {
            id,
            deleted: result.rows_affected() > 0,
        })
    }
}

#[async_trait]
impl PatientSeedStore for PgPatientRepository {
    async fn insert_batch(&self, patients: &[NewPatient]) -> Result<u64> {
        if patients.is_empty() {
            return Ok(0);
        }

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO patients (name, status, date, notes_status, room, location, collabrators) ",
        );
        query.push_values(patients, |mut row, patient| {
            row.push_bind(patient.name.clone())
                .push_bind(patient.status.clone())
                .push_bind(patient.date)
                .push_bind(patient.notes_status.clone())
                .push_bind(patient.room.clone())
                .push_bind(patient.location.clone())
                .push_bind(patient.collaborators.clone());
        });

        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// TRUNCATE 不重置 ID 序列
    async fn clear(&self) -> Result<()> {
        sqlx::query("TRUNCATE TABLE patients")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use chrono::NaiveDate;
    use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

    fn request(after: Option<i64>, status: Option<&str>, limit: usize) -> PageRequest {
        PageRequest {
            after,
            status: status.map(str::to_string),
            limit,
        }
    }

    #[test]
    fn test_page_query_without_predicates() {
        let query = page_query(&request(None, None, 10));
        assert_eq!(
            query.sql(),
            "SELECT id, name, status, date, notes_status, room, location, collabrators \
             FROM patients WHERE TRUE ORDER BY id ASC LIMIT $1"
        );
    }

    #[test]
    fn test_page_query_with_status_and_cursor() {
        let query = page_query(&request(Some(42), Some("Active"), 5));
        assert_eq!(
            query.sql(),
            "SELECT id, name, status, date, notes_status, room, location, collabrators \
             FROM patients WHERE TRUE AND status = $1 AND id > $2 ORDER BY id ASC LIMIT $3"
        );
    }

    #[test]
    fn test_page_query_cursor_only() {
        let query = page_query(&request(Some(3), None, 2));
        assert!(query.sql().ends_with("WHERE TRUE AND id > $1 ORDER BY id ASC LIMIT $2"));
    }

    // ========== 需要 PostgreSQL 的测试 ==========
    // 未设置 DATABASE_URL 时跳过；每个测试使用独立 schema，ID 从 1 开始。

    struct TestDatabase {
        repository: PgPatientRepository,
        schema: String,
    }

    impl TestDatabase {
        async fn open(label: &str) -> Option<Self> {
            let Ok(url) = std::env::var("DATABASE_URL") else {
                eprintln!("DATABASE_URL not set, skipping {}", label);
                return None;
            };

            let schema = format!("ward_test_{}_{}", label, rand::random::<u32>());
            let options = PgConnectOptions::from_str(&url)
                .unwrap()
                .options([("search_path", schema.as_str())]);
            let pool = PgPoolOptions::new()
                .max_connections(2)
                .connect_with(options)
                .await
                .unwrap();

            sqlx::query(&format!("CREATE SCHEMA {}", schema))
                .execute(&pool)
                .await
                .unwrap();

            let repository = PgPatientRepository { pool };
            repository.create_tables().await.unwrap();
            Some(Self { repository, schema })
        }

        async fn with_patients(label: &str, statuses: &[&str]) -> Option<Self> {
            let database = Self::open(label).await?;
            for (index, status) in statuses.iter().enumerate() {
                database
                    .repository
                    .create(new_patient(&format!("Patient {}", index + 1), status))
                    .await
                    .unwrap();
            }
            Some(database)
        }

        async fn drop_schema(self) {
            sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
                .execute(&self.repository.pool)
                .await
                .unwrap();
            self.repository.pool.close().await;
        }
    }

    fn new_patient(name: &str, status: &str) -> NewPatient {
        NewPatient {
            name: name.to_string(),
            status: status.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            notes_status: "Complete".to_string(),
            room: "Room 101".to_string(),
            location: "Wing A".to_string(),
            collaborators: "Dr. Smith".to_string(),
        }
    }

    fn ids(page: &Page<Patient>) -> Vec<i64> {
        page.data.iter().map(|patient| patient.id).collect()
    }

    #[tokio::test]
    async fn test_pg_status_filter() {
        let Some(db) =
            TestDatabase::with_patients("status", &["Active", "Inactive", "Active"]).await
        else {
            return;
        };

        let page = db
            .repository
            .find_page(&PatientFilter::new().with_status("Active"))
            .await
            .unwrap();

        assert_eq!(ids(&page), vec![1, 3]);
        assert!(!page.pagination.has_next_page);
        assert_eq!(page.pagination.next_cursor.as_deref(), Some("3"));
        db.drop_schema().await;
    }

    #[tokio::test]
    async fn test_pg_limit_and_cursor() {
        let Some(db) =
            TestDatabase::with_patients("limit", &["Active", "Inactive", "Active"]).await
        else {
            return;
        };

        let first = db
            .repository
            .find_page(&PatientFilter::new().with_limit(2))
            .await
            .unwrap();
        assert_eq!(ids(&first), vec![1, 2]);
        assert!(first.pagination.has_next_page);
        assert_eq!(first.pagination.next_cursor.as_deref(), Some("2"));

        let second = db
            .repository
            .find_page(&PatientFilter::new().with_limit(2).with_cursor("2"))
            .await
            .unwrap();
        assert_eq!(ids(&second), vec![3]);
        assert!(!second.pagination.has_next_page);

        let active_after_one = db
            .repository
            .find_page(&PatientFilter::new().with_status("Active").with_cursor("1"))
            .await
            .unwrap();
        assert_eq!(ids(&active_after_one), vec![3]);
        db.drop_schema().await;
    }

    #[tokio::test]
    async fn test_pg_update_merges_and_empty_update_is_noop() {
        let Some(db) = TestDatabase::with_patients("update", &["Active"]).await else {
            return;
        };
        let before = db.repository.find_by_id(1).await.unwrap().unwrap();

        let unchanged = db
            .repository
            .update(1, PatientUpdate::default())
            .await
            .unwrap();
        assert_eq!(unchanged, Some(before.clone()));

        let updated = db
            .repository
            .update(
                1,
                PatientUpdate {
                    status: Some("Inactive".to_string()),
                    room: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            updated,
            Patient {
                status: "Inactive".to_string(),
                room: String::new(),
                ..before
            }
        );

        let missing = db
            .repository
            .update(99, PatientUpdate::default())
            .await
            .unwrap();
        assert_eq!(missing, None);
        db.drop_schema().await;
    }

    #[tokio::test]
    async fn test_pg_delete_then_find() {
        let Some(db) = TestDatabase::with_patients("delete", &["Active", "Active"]).await else {
            return;
        };

        assert_eq!(db.repository.delete(1).await.unwrap(), DeleteOutcome::deleted(1));
        assert_eq!(db.repository.find_by_id(1).await.unwrap(), None);
        assert_eq!(db.repository.delete(1).await.unwrap(), DeleteOutcome::missing(1));
        assert!(db.repository.find_by_id(2).await.unwrap().is_some());
        db.drop_schema().await;
    }

    #[tokio::test]
    async fn test_pg_ids_after_clear_keep_growing() {
        let Some(db) = TestDatabase::open("clear").await else {
            return;
        };

        let batch: Vec<NewPatient> = (0..3)
            .map(|index| new_patient(&format!("Seed {}", index), "Pending"))
            .collect();
        assert_eq!(db.repository.insert_batch(&batch).await.unwrap(), 3);
        assert_eq!(db.repository.insert_batch(&[]).await.unwrap(), 0);

        let before = db.repository.find_page(&PatientFilter::new()).await.unwrap();
        assert_eq!(ids(&before), vec![1, 2, 3]);

        db.repository.clear().await.unwrap();
        assert!(db
            .repository
            .find_page(&PatientFilter::new())
            .await
            .unwrap()
            .data
            .is_empty());

        db.repository.insert_batch(&batch[..2]).await.unwrap();
        let after = db.repository.find_page(&PatientFilter::new()).await.unwrap();
        assert_eq!(ids(&after), vec![4, 5]);
        db.drop_schema().await;
    }
}
