//! Clause compilation
//!
//! Turns a validated filter tree into a SQL WHERE fragment: clause text over
//! `:param_N` named placeholders plus the name-to-value binding map. Values
//! never reach the clause text; the only string manipulation on user input is
//! LIKE wildcard wrapping, which escapes `%`, `_`, and `\` first.
//!
//! The compiler performs no schema lookups and trusts its input's shape.
//! Defensive checks remain for malformed nodes reached despite validation;
//! those fail with a [`CompileError`] rather than emitting invalid SQL.

use std::collections::HashMap;

use crate::error::CompileError;

use super::types::{FilterCondition, FilterNode, FilterValue, Operator};

/// Generates unique placeholder names within one top-level compile call.
///
/// Local to a single invocation and threaded by reference through every
/// recursive step; never shared across independent compiles, so concurrent
/// calls stay independent without coordination.
#[derive(Debug, Default)]
pub struct ParamCounter(usize);

impl ParamCounter {
    pub fn new() -> Self {
        Self(0)
    }

    /// Start numbering above zero, for appending to a query that already
    /// holds parameters.
    pub fn starting_at(start: usize) -> Self {
        Self(start)
    }

    fn next_key(&mut self) -> String {
        let key = format!("param_{}", self.0);
        self.0 += 1;
        key
    }
}

/// A compiled WHERE fragment with its parameter bindings.
///
/// Produced fresh per compile call and owned by the caller. The text contains
/// `:name` placeholders only; `parameters` maps each name to its bound value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledClause {
    pub text: String,
    pub parameters: HashMap<String, FilterValue>,
}

impl CompiledClause {
    /// An empty clause means "no filter", not an error.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Compile a validated filter tree into a WHERE fragment for `alias`.
pub fn compile_filter(filter: &FilterNode, alias: &str) -> Result<CompiledClause, CompileError> {
    compile_filter_seeded(filter, alias, 0)
}

/// Like [`compile_filter`], but placeholder numbering starts at `start` so
/// the result can be merged into a query that already binds parameters.
pub fn compile_filter_seeded(
    filter: &FilterNode,
    alias: &str,
    start: usize,
) -> Result<CompiledClause, CompileError> {
    let mut counter = ParamCounter::starting_at(start);
    let mut parameters = HashMap::new();
    let text = compile_node(filter, alias, &mut counter, &mut parameters)?;
    Ok(CompiledClause { text, parameters })
}

fn compile_node(
    node: &FilterNode,
    alias: &str,
    counter: &mut ParamCounter,
    parameters: &mut HashMap<String, FilterValue>,
) -> Result<String, CompileError> {
    match node {
        FilterNode::Condition(condition) => {
            compile_condition(condition, alias, counter, parameters)
        }
        FilterNode::And(group) => compile_group(&group.and, " AND ", alias, counter, parameters),
        FilterNode::Or(group) => compile_group(&group.or, " OR ", alias, counter, parameters),
    }
}

fn compile_group(
    children: &[FilterNode],
    joiner: &str,
    alias: &str,
    counter: &mut ParamCounter,
    parameters: &mut HashMap<String, FilterValue>,
) -> Result<String, CompileError> {
    let mut clauses = Vec::with_capacity(children.len());
    for child in children {
        let clause = compile_node(child, alias, counter, parameters)?;
        if !clause.is_empty() {
            clauses.push(clause);
        }
    }
    // Only reachable when validation was bypassed; the caller treats an empty
    // clause as "no filter".
    if clauses.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("({})", clauses.join(joiner)))
}

fn compile_condition(
    condition: &FilterCondition,
    alias: &str,
    counter: &mut ParamCounter,
    parameters: &mut HashMap<String, FilterValue>,
) -> Result<String, CompileError> {
    if condition.field.is_empty() {
        return Err(CompileError::MissingField);
    }
    let field_path = format!("{alias}.{}", condition.field);
    let operator = condition.operator;

    // No-value operators bind nothing.
    match operator {
        Operator::IsNull => return Ok(format!("{field_path} IS NULL")),
        Operator::IsNotNull => return Ok(format!("{field_path} IS NOT NULL")),
        _ => {}
    }

    let value = condition
        .value
        .clone()
        .ok_or(CompileError::MissingValue(operator))?;

    if let Some(op) = operator.comparison_sql() {
        let key = counter.next_key();
        parameters.insert(key.clone(), value);
        return Ok(format!("{field_path} {op} :{key}"));
    }

    match operator {
        Operator::In => {
            let FilterValue::List(_) = value else {
                return Err(CompileError::ExpectedArray(operator));
            };
            let key = counter.next_key();
            parameters.insert(key.clone(), value);
            Ok(format!("{field_path} IN (:...{key})"))
        }
        Operator::Between => {
            let FilterValue::List(items) = value else {
                return Err(CompileError::ExpectedTwoValues);
            };
            let Ok([min, max]) = <[FilterValue; 2]>::try_from(items) else {
                return Err(CompileError::ExpectedTwoValues);
            };
            let key = counter.next_key();
            let min_key = format!("{key}_min");
            let max_key = format!("{key}_max");
            parameters.insert(min_key.clone(), min);
            parameters.insert(max_key.clone(), max);
            Ok(format!("{field_path} BETWEEN :{min_key} AND :{max_key}"))
        }
        Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
            let FilterValue::String(s) = value else {
                return Err(CompileError::ExpectedString(operator));
            };
            let escaped = escape_like_pattern(&s);
            let pattern = match operator {
                Operator::Contains => format!("%{escaped}%"),
                Operator::StartsWith => format!("{escaped}%"),
                _ => format!("%{escaped}"),
            };
            let key = counter.next_key();
            parameters.insert(key.clone(), FilterValue::String(pattern));
            Ok(format!("{field_path} LIKE :{key}"))
        }
        // Comparison and no-value operators were handled above; anything
        // falling through here is a validation bypass.
        _ => Err(CompileError::UnsupportedOperator(operator)),
    }
}

/// Escape SQL LIKE metacharacters (`%`, `_`, `\`) in user input before
/// wildcard wrapping, so user text matches literally.
fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
