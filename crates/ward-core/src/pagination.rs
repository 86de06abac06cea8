//! 游标分页
//!
//! 按 ID 升序做键集分页：多取一条用于判断是否存在下一页，
//! 不需要额外的计数查询。

use serde::{Deserialize, Serialize};

use crate::error::{Result, WardError};
use crate::models::{Patient, PatientFilter};

/// 默认每页条数
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// 每页条数上限
pub const MAX_PAGE_LIMIT: usize = 100;

/// 解析后的分页请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 只返回 ID 大于该值的记录
    pub after: Option<i64>,
    /// 状态精确匹配
    pub status: Option<String>,
    /// 实际页大小，范围 [1, 100]
    pub limit: usize,
}

impl PageRequest {
    /// 向存储层请求的行数（页大小 + 1）
    pub fn fetch_size(&self) -> usize {
        self.limit + 1
    }

    /// 判断一条记录是否满足过滤条件
    pub fn matches(&self, patient: &Patient) -> bool {
        let after_cursor = self.after.map_or(true, |after| patient.id > after);
        let status_matches = self
            .status
            .as_deref()
            .map_or(true, |status| patient.status == status);
        after_cursor && status_matches
    }
}

impl TryFrom<&PatientFilter> for PageRequest {
    type Error = WardError;

    fn try_from(filter: &PatientFilter) -> Result<Self> {
        Ok(Self {
            after: parse_cursor(filter.cursor.as_deref())?,
            status: filter
                .status
                .as_deref()
                .filter(|status| !status.is_empty())
                .map(str::to_string),
            limit: resolve_limit(filter.limit.as_deref()),
        })
    }
}

/// 计算页大小
///
/// 缺省、空串、非数字或 0 时取默认值，其余按 [1, 100] 截断。
/// 小数按整数部分处理。
pub fn resolve_limit(raw: Option<&str>) -> usize {
    let requested = raw
        .map(str::trim)
        .and_then(|text| {
            text.parse::<i64>().ok().or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .map(|value| value.trunc() as i64)
            })
        })
        .filter(|value| *value != 0);

    match requested {
        Some(value) => value.clamp(1, MAX_PAGE_LIMIT as i64) as usize,
        None => DEFAULT_PAGE_LIMIT,
    }
}

/// 解析游标
///
/// 空游标视为未提供；非数字游标返回校验错误，不会下发到存储层。
pub fn parse_cursor(raw: Option<&str>) -> Result<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse::<i64>().map(Some).map_err(|_| {
            WardError::Validation(format!("cursor must be a numeric patient id, got '{}'", text))
        }),
    }
}

/// 分页元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub has_next_page: bool,
    pub next_cursor: Option<String>,
}

/// 一页数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// 由多取一条的查询结果组装分页
    ///
    /// `rows` 必须已按键升序排列，最多 `limit + 1` 条。
    pub fn from_lookahead(mut rows: Vec<T>, limit: usize, key: impl Fn(&T) -> i64) -> Self {
        let has_next_page = rows.len() > limit;
        rows.truncate(limit);

        let next_cursor = rows.last().map(|row| key(row).to_string());

        Self {
            data: rows,
            pagination: Pagination {
                has_next_page,
                next_cursor,
            },
        }
    }
}

impl Page<Patient> {
    pub fn of_patients(rows: Vec<Patient>, limit: usize) -> Self {
        Self::from_lookahead(rows, limit, |patient| patient.id)
    }
}
