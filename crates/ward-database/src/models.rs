//! 数据库模型

use chrono::NaiveDate;
use sqlx::FromRow;
use ward_core::Patient;

/// 查询时使用的列顺序，与 [`DbPatient`] 字段一一对应
pub const PATIENT_COLUMNS: &str =
    "id, name, status, date, notes_status, room, location, collabrators";

/// 数据库患者表
#[derive(Debug, FromRow)]
pub struct DbPatient {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub date: NaiveDate,
    pub notes_status: String,
    pub room: String,
    pub location: String,
    pub collabrators: String, // 列名沿用既有表结构
}

impl From<DbPatient> for Patient {
    fn from(db_patient: DbPatient) -> Self {
        Patient {
            id: db_patient.id,
            name: db_patient.name,
            status: db_patient.status,
            date: db_patient.date,
            notes_status: db_patient.notes_status,
            room: db_patient.room,
            location: db_patient.location,
            collaborators: db_patient.collabrators,
        }
    }
}
