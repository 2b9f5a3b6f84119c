//! Filter expression model
//!
//! Defines the recursive filter AST: a condition leaf plus `and`/`or` groups
//! nesting to arbitrary depth, and the closed value variant conditions carry.
//! Node shapes are discriminated during deserialization; `deny_unknown_fields`
//! keeps them mutually exclusive so a document matching no shape (or carrying
//! keys from more than one) is rejected at the boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison, membership, pattern, and nullness operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    Between,
    Contains,
    StartsWith,
    EndsWith,
    IsNull,
    IsNotNull,
}

/// Value arity required by an operator, used to select validation and
/// compilation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    /// `is_null` / `is_not_null`: value must be absent
    NoValue,
    /// `in`: non-empty array of values
    Array,
    /// `between`: exactly two values
    Dual,
    /// Everything else: exactly one value
    Single,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::In => "in",
            Self::Between => "between",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
        }
    }

    pub fn class(self) -> OperatorClass {
        match self {
            Self::IsNull | Self::IsNotNull => OperatorClass::NoValue,
            Self::In => OperatorClass::Array,
            Self::Between => OperatorClass::Dual,
            _ => OperatorClass::Single,
        }
    }

    /// SQL symbol for the plain binary comparison operators.
    pub(crate) fn comparison_sql(self) -> Option<&'static str> {
        match self {
            Self::Eq => Some("="),
            Self::Neq => Some("!="),
            Self::Gt => Some(">"),
            Self::Lt => Some("<"),
            Self::Gte => Some(">="),
            Self::Lte => Some("<="),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition value, typed at the deserialization boundary so the validator
/// and compiler never re-inspect runtime type tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<FilterValue>),
}

impl FilterValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FilterValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl<V: Into<FilterValue>> From<Vec<V>> for FilterValue {
    fn from(items: Vec<V>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// A single filter condition
///
/// Example: `{ "field": "age", "operator": "gt", "value": 30 }`. The field's
/// type comes from the entity schema, not from the condition itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterCondition {
    pub field: String,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

/// Logical AND group: `{ "and": [condition, condition, nested group] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AndGroup {
    pub and: Vec<FilterNode>,
}

/// Logical OR group: `{ "or": [condition, condition, nested group] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrGroup {
    pub or: Vec<FilterNode>,
}

/// The root of any filter expression
///
/// Trees are finite; depth is unbounded and handled by plain recursion in the
/// validator and compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    And(AndGroup),
    Or(OrGroup),
    Condition(FilterCondition),
}

impl FilterNode {
    pub fn condition(
        field: impl Into<String>,
        operator: Operator,
        value: Option<FilterValue>,
    ) -> Self {
        Self::Condition(FilterCondition {
            field: field.into(),
            operator,
            value,
        })
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        Self::And(AndGroup { and: children })
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        Self::Or(OrGroup { or: children })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_serde_names() {
        let json = serde_json::to_string(&Operator::StartsWith).unwrap();
        assert_eq!(json, "\"starts_with\"");
        let op: Operator = serde_json::from_str("\"is_not_null\"").unwrap();
        assert_eq!(op, Operator::IsNotNull);
    }

    #[test]
    fn operator_classes() {
        assert_eq!(Operator::IsNull.class(), OperatorClass::NoValue);
        assert_eq!(Operator::IsNotNull.class(), OperatorClass::NoValue);
        assert_eq!(Operator::In.class(), OperatorClass::Array);
        assert_eq!(Operator::Between.class(), OperatorClass::Dual);
        assert_eq!(Operator::Eq.class(), OperatorClass::Single);
        assert_eq!(Operator::Contains.class(), OperatorClass::Single);
    }

    #[test]
    fn condition_deserializes() {
        let node: FilterNode =
            serde_json::from_str(r#"{"field": "age", "operator": "gt", "value": 30}"#).unwrap();
        assert_eq!(
            node,
            FilterNode::condition("age", Operator::Gt, Some(30i64.into()))
        );
    }

    #[test]
    fn condition_without_value_deserializes() {
        let node: FilterNode =
            serde_json::from_str(r#"{"field": "deletedAt", "operator": "is_null"}"#).unwrap();
        assert_eq!(
            node,
            FilterNode::condition("deletedAt", Operator::IsNull, None)
        );
    }

    #[test]
    fn groups_deserialize_nested() {
        let node: FilterNode = serde_json::from_str(
            r#"{"or": [
                {"field": "role", "operator": "eq", "value": "admin"},
                {"and": [{"field": "age", "operator": "gte", "value": 18}]}
            ]}"#,
        )
        .unwrap();
        let FilterNode::Or(group) = node else {
            panic!("expected or group");
        };
        assert_eq!(group.or.len(), 2);
        assert!(matches!(group.or[0], FilterNode::Condition(_)));
        assert!(matches!(group.or[1], FilterNode::And(_)));
    }

    #[test]
    fn node_matching_two_shapes_is_rejected() {
        // carries both a group key and condition keys
        let result: Result<FilterNode, _> = serde_json::from_str(
            r#"{"and": [], "field": "age", "operator": "eq", "value": 1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn node_matching_no_shape_is_rejected() {
        let result: Result<FilterNode, _> = serde_json::from_str(r#"{"nor": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let result: Result<FilterNode, _> =
            serde_json::from_str(r#"{"field": "age", "operator": "regex", "value": "a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn value_variants_deserialize() {
        let v: FilterValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FilterValue::Bool(true));
        let v: FilterValue = serde_json::from_str("18").unwrap();
        assert_eq!(v, FilterValue::Number(18.0));
        let v: FilterValue = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(v, FilterValue::List(vec!["a".into(), "b".into()]));
    }
}
