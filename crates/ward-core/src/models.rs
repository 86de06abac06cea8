//! 核心数据模型定义
//!
//! 对外 JSON 中协作者字段沿用既有接口的拼写 `collabrators`。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 患者记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,                 // 存储层分配，创建后不可变
    pub name: String,            // 患者姓名
    pub status: String,          // 状态 (Active, Inactive, Pending, Discharged ...)
    pub date: NaiveDate,         // 日期
    pub notes_status: String,    // 病历记录状态
    pub room: String,            // 病房
    pub location: String,        // 院区/位置
    #[serde(rename = "collabrators")]
    pub collaborators: String,   // 协作医生，逗号分隔
}

/// 新患者插入模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub status: String,
    pub date: NaiveDate,
    pub notes_status: String,
    pub room: String,
    pub location: String,
    #[serde(rename = "collabrators")]
    pub collaborators: String,
}

impl NewPatient {
    /// 附上存储层分配的ID
    pub fn into_patient(self, id: i64) -> Patient {
        Patient {
            id,
            name: self.name,
            status: self.status,
            date: self.date,
            notes_status: self.notes_status,
            room: self.room,
            location: self.location,
            collaborators: self.collaborators,
        }
    }
}

/// 部分更新模型
///
/// 每一列对应一个 `Option`，`None` 表示保持原值。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        rename = "collabrators",
        skip_serializing_if = "Option::is_none"
    )]
    pub collaborators: Option<String>,
}

impl PatientUpdate {
    /// 没有任何字段需要修改
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.date.is_none()
            && self.notes_status.is_none()
            && self.room.is_none()
            && self.location.is_none()
            && self.collaborators.is_none()
    }

    /// 将已提供的字段合并到现有记录上，ID 不受影响
    pub fn apply_to(self, patient: &mut Patient) {
        if let Some(name) = self.name {
            patient.name = name;
        }
        if let Some(status) = self.status {
            patient.status = status;
        }
        if let Some(date) = self.date {
            patient.date = date;
        }
        if let Some(notes_status) = self.notes_status {
            patient.notes_status = notes_status;
        }
        if let Some(room) = self.room {
            patient.room = room;
        }
        if let Some(location) = self.location {
            patient.location = location;
        }
        if let Some(collaborators) = self.collaborators {
            patient.collaborators = collaborators;
        }
    }
}

/// 列表查询条件
///
/// 字段保留请求中的原始文本，解析与校验由访问层完成。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PatientFilter {
    pub cursor: Option<String>,
    pub status: Option<String>,
    pub limit: Option<String>,
}

impl PatientFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit.to_string());
        self
    }
}

/// 删除结果，`deleted` 是上层唯一依赖的成功标志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub id: i64,
    pub deleted: bool,
}

impl DeleteOutcome {
    pub fn deleted(id: i64) -> Self {
        Self { id, deleted: true }
    }

    pub fn missing(id: i64) -> Self {
        Self { id, deleted: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_patient() -> Patient {
        Patient {
            id: 1,
            name: "John Doe".to_string(),
            status: "Active".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            notes_status: "Complete".to_string(),
            room: "Room 101".to_string(),
            location: "Wing A".to_string(),
            collaborators: "Dr. Smith".to_string(),
        }
    }

    #[test]
    fn test_patient_wire_format() {
        let value = serde_json::to_value(sample_patient()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "John Doe",
                "status": "Active",
                "date": "2025-01-01",
                "notes_status": "Complete",
                "room": "Room 101",
                "location": "Wing A",
                "collabrators": "Dr. Smith"
            })
        );
    }

    #[test]
    fn test_empty_update_leaves_record_unchanged() {
        let mut patient = sample_patient();
        let update = PatientUpdate::default();
        assert!(update.is_empty());

        update.apply_to(&mut patient);
        assert_eq!(patient, sample_patient());
    }

    #[test]
    fn test_update_only_touches_supplied_fields() {
        let mut patient = sample_patient();
        let update = PatientUpdate {
            status: Some("Inactive".to_string()),
            collaborators: Some("Dr. House, Dr. Wilson".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());

        update.apply_to(&mut patient);
        assert_eq!(patient.status, "Inactive");
        assert_eq!(patient.collaborators, "Dr. House, Dr. Wilson");
        assert_eq!(patient.name, "John Doe");
        assert_eq!(patient.room, "Room 101");
        assert_eq!(patient.id, 1);
    }

    #[test]
    fn test_new_patient_keeps_assigned_id() {
        let patient = sample_patient();
        let new_patient = NewPatient {
            name: patient.name.clone(),
            status: patient.status.clone(),
            date: patient.date,
            notes_status: patient.notes_status.clone(),
            room: patient.room.clone(),
            location: patient.location.clone(),
            collaborators: patient.collaborators.clone(),
        };

        assert_eq!(new_patient.into_patient(1), patient);
    }
}
