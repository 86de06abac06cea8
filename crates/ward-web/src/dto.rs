//! 请求体模型与校验
//!
//! 字段先按原始 JSON 值接收，逐字段检查类型和必填，所有错误合并为一条消息返回。

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use ward_core::{NewPatient, PatientUpdate, WardError};

/// 创建患者请求
#[derive(Debug, Default, Deserialize)]
pub struct CreatePatientRequest {
    pub name: Option<Value>,
    pub status: Option<Value>,
    pub date: Option<Value>,
    pub notes_status: Option<Value>,
    pub room: Option<Value>,
    pub location: Option<Value>,
    #[serde(rename = "collabrators")]
    pub collaborators: Option<Value>,
}

impl CreatePatientRequest {
    /// 所有字段必填且非空
    pub fn validate(self) -> Result<NewPatient, WardError> {
        let mut errors = FieldErrors::default();

        let name = errors.required_string("name", self.name);
        let status = errors.required_string("status", self.status);
        let date = errors.required_date("date", self.date);
        let notes_status = errors.required_string("notes_status", self.notes_status);
        let room = errors.required_string("room", self.room);
        let location = errors.required_string("location", self.location);
        let collaborators = errors.required_string("collabrators", self.collaborators);

        match (name, status, date, notes_status, room, location, collaborators) {
            (
                Some(name),
                Some(status),
                Some(date),
                Some(notes_status),
                Some(room),
                Some(location),
                Some(collaborators),
            ) => Ok(NewPatient {
                name,
                status,
                date,
                notes_status,
                room,
                location,
                collaborators,
            }),
            _ => Err(errors.into_error()),
        }
    }
}

/// 更新患者请求，任意字段子集
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<Value>,
    pub status: Option<Value>,
    pub date: Option<Value>,
    pub notes_status: Option<Value>,
    pub room: Option<Value>,
    pub location: Option<Value>,
    #[serde(rename = "collabrators")]
    pub collaborators: Option<Value>,
}

impl UpdatePatientRequest {
    /// 解析原始请求体；空白请求体等同于 `{}`
    pub fn from_body(body: &[u8]) -> Result<Self, WardError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body).map_err(|e| {
            WardError::Validation(format!("Failed to parse the request body as JSON: {}", e))
        })
    }

    /// 已提供的字段必须是字符串，`date` 必须可解析；`null` 视为未提供
    pub fn validate(self) -> Result<PatientUpdate, WardError> {
        let mut errors = FieldErrors::default();

        let update = PatientUpdate {
            name: errors.optional_string("name", self.name),
            status: errors.optional_string("status", self.status),
            date: errors.optional_date("date", self.date),
            notes_status: errors.optional_string("notes_status", self.notes_status),
            room: errors.optional_string("room", self.room),
            location: errors.optional_string("location", self.location),
            collaborators: errors.optional_string("collabrators", self.collaborators),
        };

        if errors.is_empty() {
            Ok(update)
        } else {
            Err(errors.into_error())
        }
    }
}

/// 解析日期：`YYYY-MM-DD`，或带时间的时间戳（保留日期部分）
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

#[derive(Debug, Default)]
struct FieldErrors(Vec<String>);

impl FieldErrors {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, message: String) {
        self.0.push(message);
    }

    fn required_string(&mut self, field: &str, value: Option<Value>) -> Option<String> {
        match value {
            None | Some(Value::Null) => {
                self.push(format!("{} should not be empty", field));
                None
            }
            Some(Value::String(text)) if text.is_empty() => {
                self.push(format!("{} should not be empty", field));
                None
            }
            Some(Value::String(text)) => Some(text),
            Some(_) => {
                self.push(format!("{} must be a string", field));
                None
            }
        }
    }

    fn optional_string(&mut self, field: &str, value: Option<Value>) -> Option<String> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(_) => {
                self.push(format!("{} must be a string", field));
                None
            }
        }
    }

    fn required_date(&mut self, field: &str, value: Option<Value>) -> Option<NaiveDate> {
        match value {
            None | Some(Value::Null) => {
                self.push(format!("{} should not be empty", field));
                None
            }
            Some(Value::String(text)) if text.is_empty() => {
                self.push(format!("{} should not be empty", field));
                None
            }
            other => self.optional_date(field, other),
        }
    }

    fn optional_date(&mut self, field: &str, value: Option<Value>) -> Option<NaiveDate> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => {
                let parsed = parse_date(&text);
                if parsed.is_none() {
                    self.push(format!("{} must be a valid date (YYYY-MM-DD)", field));
                }
                parsed
            }
            Some(_) => {
                self.push(format!("{} must be a valid date (YYYY-MM-DD)", field));
                None
            }
        }
    }

    fn into_error(self) -> WardError {
        WardError::Validation(self.0.join("; "))
    }
}
