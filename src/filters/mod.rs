//! Declarative query filter system
//!
//! Filters arrive as JSON documents describing a boolean tree of conditions:
//!
//! ```json
//! {
//!   "and": [
//!     {"field": "isActive", "operator": "eq", "value": true},
//!     {"field": "age", "operator": "gte", "value": 18}
//!   ]
//! }
//! ```
//!
//! [`parse_filter`] turns the document into a [`FilterNode`] tree,
//! [`validate`] checks it against an entity schema, and [`compile_filter`]
//! lowers it to a parameterized SQL fragment. Field names and operators only
//! ever appear in SQL text after passing the schema allow-list; every client
//! value travels as a named parameter.

mod compile;
mod parser;
mod types;
mod validate;

pub use compile::{CompiledClause, ParamCounter, compile_filter, compile_filter_seeded};
pub use parser::{MAX_FILTER_JSON_SIZE, parse_filter};
pub use types::{
    AndGroup, FilterCondition, FilterNode, FilterValue, Operator, OperatorClass, OrGroup,
};
pub use validate::validate;
