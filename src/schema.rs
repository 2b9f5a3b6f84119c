//! Entity schema model
//!
//! The allow-list describing which fields of an entity may be filtered, their
//! value type, and the operators legal on them. Schemas are declared
//! explicitly through the builder (or assembled as a constant table) and are
//! immutable for the process lifetime; the validator and compiler only borrow
//! them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filters::Operator;

/// Supported field value types. Closed set; validator and compiler both
/// switch exhaustively on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Enum,
    Uuid,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Enum => "enum",
            Self::Uuid => "uuid",
        }
    }

    /// Default allowed operators for each field type. Applied whenever a
    /// field schema does not narrow the set explicitly.
    pub fn default_operators(self) -> &'static [Operator] {
        use Operator::*;
        match self {
            Self::String => &[
                Eq, Neq, In, Contains, StartsWith, EndsWith, IsNull, IsNotNull,
            ],
            Self::Number => &[Eq, Neq, Gt, Lt, Gte, Lte, In, Between, IsNull, IsNotNull],
            Self::Boolean => &[Eq, Neq, IsNull, IsNotNull],
            Self::Date => &[Eq, Neq, Gt, Lt, Gte, Lte, Between, IsNull, IsNotNull],
            Self::Enum | Self::Uuid => &[Eq, Neq, In, IsNull, IsNotNull],
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filterable field: name, type, optionally narrowed operator set, and
/// the enum domain for enum-typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    name: String,
    field_type: FieldType,
    allowed_operators: Option<Vec<Operator>>,
    enum_values: Option<Vec<String>>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            allowed_operators: None,
            enum_values: None,
        }
    }

    /// Narrow the operator set below the type default. Schema authors are
    /// trusted to keep the set sensible for the type; the engine does not
    /// re-narrow against the default table.
    pub fn with_operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.allowed_operators = Some(operators.into_iter().collect());
        self
    }

    /// Declare the enum domain. Enum-typed fields without a domain never
    /// validate any value.
    pub fn with_enum_values<S: Into<String>>(
        mut self,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }

    /// The explicitly narrowed operator set if present, else the type default.
    pub fn effective_operators(&self) -> &[Operator] {
        match &self.allowed_operators {
            Some(operators) => operators,
            None => self.field_type.default_operators(),
        }
    }
}

/// All filterable fields of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    entity_name: String,
    fields: Vec<FieldSchema>,
}

impl EntitySchema {
    pub fn builder(entity_name: impl Into<String>) -> EntitySchemaBuilder {
        EntitySchemaBuilder {
            entity_name: entity_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Look up a field by name; first declaration wins.
    pub fn resolve(&self, field: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn is_filterable(&self, field: &str) -> bool {
        self.resolve(field).is_some()
    }
}

/// Builder for explicit, statically-constructed schemas
#[derive(Debug)]
pub struct EntitySchemaBuilder {
    entity_name: String,
    fields: Vec<FieldSchema>,
}

impl EntitySchemaBuilder {
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> EntitySchema {
        EntitySchema {
            entity_name: self.entity_name,
            fields: self.fields,
        }
    }
}

/// Boundary to whatever declares schemas. The engine only ever needs the
/// resulting `EntitySchema` value, however it was produced.
pub trait SchemaSource {
    fn entity_schema(&self) -> &EntitySchema;
}

impl SchemaSource for EntitySchema {
    fn entity_schema(&self) -> &EntitySchema {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_schema() -> EntitySchema {
        EntitySchema::builder("users")
            .field(FieldSchema::new("name", FieldType::String))
            .field(
                FieldSchema::new("age", FieldType::Number)
                    .with_operators([Operator::Eq, Operator::Gt, Operator::Lt]),
            )
            .field(
                FieldSchema::new("role", FieldType::Enum)
                    .with_enum_values(["admin", "user", "guest"]),
            )
            .build()
    }

    #[test]
    fn resolve_finds_declared_fields() {
        let schema = user_schema();
        assert!(schema.resolve("name").is_some());
        assert!(schema.resolve("password").is_none());
        assert!(schema.is_filterable("role"));
        assert!(!schema.is_filterable("internalNotes"));
    }

    #[test]
    fn effective_operators_fall_back_to_type_defaults() {
        let schema = user_schema();
        let name = schema.resolve("name").unwrap();
        assert_eq!(
            name.effective_operators(),
            FieldType::String.default_operators()
        );
        let age = schema.resolve("age").unwrap();
        assert_eq!(
            age.effective_operators(),
            &[Operator::Eq, Operator::Gt, Operator::Lt]
        );
    }

    #[test]
    fn default_operator_table() {
        assert!(FieldType::String.default_operators().contains(&Operator::Contains));
        assert!(!FieldType::Number.default_operators().contains(&Operator::Contains));
        assert!(FieldType::Number.default_operators().contains(&Operator::Between));
        assert!(!FieldType::Boolean.default_operators().contains(&Operator::Gt));
        assert!(FieldType::Date.default_operators().contains(&Operator::Between));
        assert!(!FieldType::Date.default_operators().contains(&Operator::In));
        assert!(FieldType::Uuid.default_operators().contains(&Operator::In));
    }

    #[test]
    fn field_names_preserve_declaration_order() {
        let schema = user_schema();
        let names: Vec<&str> = schema.field_names().collect();
        assert_eq!(names, vec!["name", "age", "role"]);
    }
}
