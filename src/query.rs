//! Query assembly, pagination and sorting
//!
//! [`SelectQuery`] accumulates WHERE fragments and their named parameters,
//! plus sort and pagination state, without knowing anything about execution.
//! [`FilterRequest`] is the ingress shape a list endpoint deserializes, and
//! [`Paginated`] the envelope it responds with.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::filters::{FilterNode, FilterValue};

/// Default page number when the request omits one
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when the request omits one
pub const DEFAULT_LIMIT: u32 = 10;
/// Maximum allowed page size
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Validator function for page parameter
pub fn validate_page(page: u32) -> Result<(), validator::ValidationError> {
    if page < 1 {
        return Err(validator::ValidationError::new("page_min")
            .with_message("Page must be >= 1".into()));
    }
    Ok(())
}

/// Validator function for limit parameter
pub fn validate_limit(limit: u32) -> Result<(), validator::ValidationError> {
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(validator::ValidationError::new("limit_range")
            .with_message(format!("Limit must be between 1 and {MAX_PAGE_LIMIT}").into()));
    }
    Ok(())
}

/// Row offset for a 1-based page number. Widened to u64 before multiplying
/// so page * limit cannot wrap.
pub fn page_offset(page: u32, limit: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(limit)
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One sort key. Field names pass through the same schema allow-list as
/// filter fields before they reach SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    pub field: String,
    #[serde(default)]
    pub order: OrderDirection,
}

impl SortOption {
    pub fn new(field: impl Into<String>, order: OrderDirection) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// Render an ORDER BY clause body for a list of sort keys.
pub fn order_clause(sorts: &[SortOption], alias: &str) -> String {
    sorts
        .iter()
        .map(|s| format!("{alias}.{} {}", s.field, s.order.as_sql()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ingress shape for a filtered list request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FilterRequest {
    #[serde(default)]
    pub filter: Option<FilterNode>,
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page: u32,
    #[serde(default = "default_limit")]
    #[validate(custom(function = "validate_limit"))]
    pub limit: u32,
    #[serde(default)]
    pub sort: Vec<SortOption>,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for FilterRequest {
    fn default() -> Self {
        Self {
            filter: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: Vec::new(),
        }
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            data,
            total,
            page,
            limit,
            total_pages: total.div_ceil(u64::from(limit.max(1))),
        }
    }
}

/// An accumulating SELECT query: WHERE fragments, named parameters, sort
/// keys, and pagination. Executors render it with [`SelectQuery::where_sql`]
/// and [`SelectQuery::order_sql`] and bind [`SelectQuery::parameters`].
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    clauses: Vec<String>,
    parameters: HashMap<String, FilterValue>,
    sorts: Vec<SortOption>,
    limit: Option<u32>,
    offset: Option<u64>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// AND another WHERE fragment onto the query, merging its parameters.
    /// Empty fragments are dropped.
    pub fn and_where(
        &mut self,
        clause: impl Into<String>,
        parameters: HashMap<String, FilterValue>,
    ) -> &mut Self {
        let clause = clause.into();
        if !clause.is_empty() {
            self.clauses.push(clause);
            self.parameters.extend(parameters);
        }
        self
    }

    /// Replace all sort keys with a single one.
    pub fn order_by(&mut self, sort: SortOption) -> &mut Self {
        self.sorts = vec![sort];
        self
    }

    /// Append a further sort key.
    pub fn then_order_by(&mut self, sort: SortOption) -> &mut Self {
        self.sorts.push(sort);
        self
    }

    pub fn paginate(&mut self, page: u32, limit: u32) -> &mut Self {
        self.limit = Some(limit);
        self.offset = Some(page_offset(page, limit));
        self
    }

    /// Derive the matching COUNT query: same WHERE fragments and parameters,
    /// no ordering or pagination.
    pub fn count_query(&self) -> Self {
        Self {
            clauses: self.clauses.clone(),
            parameters: self.parameters.clone(),
            sorts: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// WHERE clause body, or empty when no fragments were attached.
    pub fn where_sql(&self) -> String {
        self.clauses.join(" AND ")
    }

    /// ORDER BY clause body for the given alias, or empty when unsorted.
    pub fn order_sql(&self, alias: &str) -> String {
        order_clause(&self.sorts, alias)
    }

    pub fn parameters(&self) -> &HashMap<String, FilterValue> {
        &self.parameters
    }

    /// Number of parameters bound so far. Used to seed placeholder numbering
    /// when attaching a further compiled filter.
    pub fn param_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }
}
