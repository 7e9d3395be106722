//! Typed list-query parameters
//!
//! The raw query string is parsed into an explicit struct once at the API
//! boundary; everything past that point works with validated, typed values
//! (no loosely-typed filter maps reaching the repository).

use serde::Deserialize;

use crate::error::MenuError;

/// Default page size when the client asks for paging without a limit
pub const DEFAULT_LIMIT: i64 = 20;
/// Upper bound on a single page
pub const MAX_LIMIT: i64 = 200;

/// Sortable columns, whitelisted so the ORDER BY clause is never built from
/// raw client input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    OrderIndex,
    KeyName,
    Label,
    Id,
    UpdatedAt,
}

impl SortField {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortField::OrderIndex => "order_index",
            SortField::KeyName => "key_name",
            SortField::Label => "label",
            SortField::Id => "id",
            SortField::UpdatedAt => "updated_at",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "order_index" => Some(SortField::OrderIndex),
            "key_name" => Some(SortField::KeyName),
            "label" => Some(SortField::Label),
            "id" => Some(SortField::Id),
            "updated_at" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Raw query string as it arrives on `GET /menus`
#[derive(Debug, Default, Deserialize)]
pub struct RawListParams {
    pub q: Option<String>,
    pub is_active: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Validated list query
#[derive(Debug, Clone)]
pub struct ListMenusQuery {
    /// Substring match against label and key_name
    pub q: Option<String>,
    /// Filter by is_active when set
    pub active: Option<bool>,
    pub sort: SortField,
    pub dir: SortDir,
    /// None means no paging (full result set)
    pub limit: Option<i64>,
    pub offset: i64,
}

impl Default for ListMenusQuery {
    fn default() -> Self {
        Self {
            q: None,
            active: None,
            sort: SortField::OrderIndex,
            dir: SortDir::Asc,
            limit: None,
            offset: 0,
        }
    }
}

impl ListMenusQuery {
    pub fn from_raw(raw: RawListParams) -> Result<Self, MenuError> {
        let mut errors = Vec::new();

        let q = raw.q.filter(|s| !s.is_empty());

        let active = match raw.is_active.as_deref() {
            None | Some("") => None,
            Some("1") | Some("true") => Some(true),
            Some("0") | Some("false") => Some(false),
            Some(other) => {
                errors.push(format!("is_active must be 0/1/true/false, got '{}'", other));
                None
            }
        };

        let sort = match raw.sort.as_deref() {
            None | Some("") => SortField::OrderIndex,
            Some(raw_sort) => match SortField::parse(raw_sort) {
                Some(field) => field,
                None => {
                    errors.push(format!("unknown sort field '{}'", raw_sort));
                    SortField::OrderIndex
                }
            },
        };

        let dir = match raw.dir.as_deref() {
            None | Some("") | Some("asc") => SortDir::Asc,
            Some("desc") => SortDir::Desc,
            Some(other) => {
                errors.push(format!("dir must be asc or desc, got '{}'", other));
                SortDir::Asc
            }
        };

        let limit = match raw.limit.as_deref() {
            None | Some("") => None,
            Some(raw_limit) => match raw_limit.parse::<i64>() {
                Ok(n) if n >= 1 => Some(n.min(MAX_LIMIT)),
                _ => {
                    errors.push(format!("limit must be a positive integer, got '{}'", raw_limit));
                    None
                }
            },
        };

        let offset = match raw.offset.as_deref() {
            None | Some("") => 0,
            Some(raw_offset) => match raw_offset.parse::<i64>() {
                Ok(n) if n >= 0 => n,
                _ => {
                    errors.push(format!(
                        "offset must be a non-negative integer, got '{}'",
                        raw_offset
                    ));
                    0
                }
            },
        };

        if !errors.is_empty() {
            return Err(MenuError::Validation(errors));
        }

        // An offset implies paging even without an explicit limit
        let limit = match (limit, offset) {
            (None, o) if o > 0 => Some(DEFAULT_LIMIT),
            (l, _) => l,
        };

        Ok(Self { q, active, sort, dir, limit, offset })
    }
}
