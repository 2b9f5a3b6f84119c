//! Schema-driven filter engine for list endpoints
//!
//! Turns client-supplied JSON filter documents into parameterized SQL WHERE
//! fragments, guarded by per-entity field allow-lists. Identifiers reach SQL
//! text only off the schema allow-list; every client value is bound as a
//! named parameter.
//!
//! ```
//! use filterkit::{
//!     EntitySchema, FieldSchema, FieldType, SelectQuery, apply_filter, parse_filter,
//! };
//!
//! # fn main() -> Result<(), filterkit::FilterError> {
//! let schema = EntitySchema::builder("users")
//!     .field(FieldSchema::new("isActive", FieldType::Boolean))
//!     .field(FieldSchema::new("age", FieldType::Number))
//!     .build();
//!
//! let filter = parse_filter(
//!     r#"{"and": [
//!         {"field": "isActive", "operator": "eq", "value": true},
//!         {"field": "age", "operator": "gte", "value": 18}
//!     ]}"#,
//! )?;
//!
//! let mut query = SelectQuery::new();
//! apply_filter(&mut query, &filter, &schema, "user")?;
//!
//! assert_eq!(
//!     query.where_sql(),
//!     "(user.isActive = :param_0 AND user.age >= :param_1)"
//! );
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod filters;
pub mod query;
pub mod schema;

pub use engine::{apply_filter, apply_filter_from_source, validate_filter};
pub use error::{CompileError, FilterError, ValidationError};
pub use filters::{
    AndGroup, CompiledClause, FilterCondition, FilterNode, FilterValue, MAX_FILTER_JSON_SIZE,
    Operator, OperatorClass, OrGroup, ParamCounter, compile_filter, compile_filter_seeded,
    parse_filter, validate,
};
pub use query::{
    DEFAULT_LIMIT, DEFAULT_PAGE, FilterRequest, MAX_PAGE_LIMIT, OrderDirection, Paginated,
    SelectQuery, SortOption, order_clause, page_offset, validate_limit, validate_page,
};
pub use schema::{EntitySchema, EntitySchemaBuilder, FieldSchema, FieldType, SchemaSource};
