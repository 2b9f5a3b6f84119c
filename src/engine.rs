//! Filter engine facade
//!
//! The one entry point callers use: validate a filter tree against an entity
//! schema and, only if it passes, compile and attach it to a [`SelectQuery`].
//! Validation failures are the client's fault; a compile failure after
//! successful validation indicates an engine bug and is logged as such.

use tracing::{debug, warn};

use crate::error::FilterError;
use crate::filters::{FilterNode, compile_filter_seeded, validate};
use crate::query::SelectQuery;
use crate::schema::{EntitySchema, SchemaSource};

/// Validate `filter` against `schema` and attach the compiled WHERE fragment
/// to `query`, qualifying every field with `alias`.
///
/// Placeholder numbering continues from the parameters already bound on the
/// query, so repeated applications never collide.
pub fn apply_filter(
    query: &mut SelectQuery,
    filter: &FilterNode,
    schema: &EntitySchema,
    alias: &str,
) -> Result<(), FilterError> {
    validate(filter, schema)?;

    let clause = compile_filter_seeded(filter, alias, query.param_count()).map_err(|e| {
        warn!(
            entity = schema.entity_name(),
            error = %e,
            "filter compilation failed after validation"
        );
        e
    })?;

    if clause.is_empty() {
        return Ok(());
    }

    debug!(
        entity = schema.entity_name(),
        alias,
        clause = %clause.text,
        params = clause.parameters.len(),
        "applying filter"
    );
    query.and_where(clause.text, clause.parameters);
    Ok(())
}

/// [`apply_filter`] against whatever declares the schema.
pub fn apply_filter_from_source(
    query: &mut SelectQuery,
    filter: &FilterNode,
    source: &impl SchemaSource,
    alias: &str,
) -> Result<(), FilterError> {
    apply_filter(query, filter, source.entity_schema(), alias)
}

/// Validate without compiling. For endpoints that check a filter up front
/// and report errors before running anything.
pub fn validate_filter(filter: &FilterNode, schema: &EntitySchema) -> Result<(), FilterError> {
    validate(filter, schema)?;
    Ok(())
}
