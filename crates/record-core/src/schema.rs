//! Record schema definitions.
//!
//! This module defines the read-only reflection interface the generator
//! consumes, plus the YAML document those schemas are loaded from.
//!
//! ## Type Hierarchy
//!
//! **Compiled types** (what the generator walks):
//! - `FieldDefinition` - Field name, descriptor, required flag, default, constraints
//! - `RecordSchema` - Ordered fields of one record type
//! - `SchemaSet` - All records of a document, by name
//!
//! **Document types** (what YAML deserializes into):
//! - `FieldSpec` - Field as written, with a `TypeSpec`
//! - `RecordSpec` - Record as written
//! - `SchemaDocument` - Whole file
//!
//! Compilation resolves record references in dependency order. A record
//! may refer back to itself (directly or through other records) as long as
//! some field on the way can be left out; such back-references are linked
//! lazily and generation depth is bounded by the generator's `max_depth`.
//! A cycle in which every reference is required can never be generated and
//! is rejected.

use crate::constraint::Constraint;
use crate::types::{RecordRef, TypeDescriptor, TypeSpec};
use crate::values::Value;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock, Weak};

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Record not found in schema set
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Field not found in record schema
    #[error("Field '{field}' not found in record '{record}'")]
    FieldNotFound { record: String, field: String },

    /// Two records share a name
    #[error("Duplicate record name: {0}")]
    DuplicateRecord(String),

    /// Two fields of one record share a name
    #[error("Duplicate field '{field}' in record '{record}'")]
    DuplicateField { record: String, field: String },

    /// Required record references form a cycle
    #[error("Cyclic record reference: {}", .0.join(" -> "))]
    CyclicReference(Vec<String>),
}

// ============================================================================
// Compiled Types
// ============================================================================

/// A single declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Field name, unique within its record
    pub name: String,

    /// Declared shape; `None` when the field carries no resolvable type
    pub descriptor: Option<TypeDescriptor>,

    /// Whether the field must be present in every instance
    pub required: bool,

    /// Value used when the field is omitted
    pub default: Option<Value>,

    /// Declared bounds, in declaration order
    pub constraints: Vec<Constraint>,
}

impl FieldDefinition {
    /// Create a required field with no default.
    pub fn required(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor: Some(descriptor),
            required: true,
            default: None,
            constraints: Vec::new(),
        }
    }

    /// Create a field that may be omitted and has no default.
    pub fn optional(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        Self {
            required: false,
            ..Self::required(name, descriptor)
        }
    }

    /// Create a field with no type information.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: None,
            required: true,
            default: None,
            constraints: Vec::new(),
        }
    }

    /// Attach a default value. A field with a default is never required.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self.required = false;
        self
    }

    /// Attach a constraint.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Whether the field has a usable default.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Ordered field definitions of one record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    /// Record name
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<FieldDefinition>,
}

impl RecordSchema {
    /// Create an empty record schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field (builder style).
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the descriptor of a field by name.
    pub fn get_field_type(&self, name: &str) -> Result<Option<&TypeDescriptor>, SchemaError> {
        self.get_field(name)
            .map(|f| f.descriptor.as_ref())
            .ok_or_else(|| SchemaError::FieldNotFound {
                record: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// Get all field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

// ============================================================================
// Document Types
// ============================================================================

/// Field as written in a schema document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name
    pub name: String,

    /// Declared type
    #[serde(rename = "type", default)]
    pub field_type: Option<TypeSpec>,

    /// Whether the field is required (defaults to true). A field with a
    /// default is never required.
    #[serde(default)]
    pub required: Option<bool>,

    /// Default value
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,

    /// Declared bounds
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl FieldSpec {
    /// Whether every instance must carry a generated value for this field.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(true) && self.default.is_none()
    }
}

/// Record as written in a schema document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSpec {
    /// Record name
    pub name: String,

    /// Field definitions
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

fn default_version() -> u32 {
    1
}

/// A whole schema document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Record definitions
    pub records: Vec<RecordSpec>,
}

// ============================================================================
// Schema Set
// ============================================================================

/// All record schemas of one document, compiled.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    /// Schema version
    pub version: u32,

    /// Compiled records in document order
    records: Vec<Arc<RecordSchema>>,

    /// Record lookup by name
    record_map: HashMap<String, usize>,
}

impl SchemaSet {
    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_yaml::from_str(yaml)?;
        Self::compile(document)
    }

    /// Compile a parsed document.
    pub fn compile(document: SchemaDocument) -> Result<Self, SchemaError> {
        let mut specs: HashMap<&str, &RecordSpec> = HashMap::new();
        for record in &document.records {
            if specs.insert(record.name.as_str(), record).is_some() {
                return Err(SchemaError::DuplicateRecord(record.name.clone()));
            }
            let mut seen = HashSet::new();
            for field in &record.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        record: record.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        let mut done = HashSet::new();
        for record in &document.records {
            let mut path = Vec::new();
            check_required_cycles(record, &specs, &mut done, &mut path)?;
        }

        let mut compiled: HashMap<String, Arc<RecordSchema>> = HashMap::new();
        let mut pending: HashMap<String, LinkSlot> = HashMap::new();
        for record in &document.records {
            compile_record(record, &specs, &mut compiled, &mut pending);
        }

        let records: Vec<Arc<RecordSchema>> = document
            .records
            .iter()
            .filter_map(|r| compiled.get(&r.name).cloned())
            .collect();
        let record_map = records
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.name.clone(), idx))
            .collect();

        Ok(Self {
            version: document.version,
            records,
            record_map,
        })
    }

    /// Get a record schema by name.
    pub fn get_record(&self, name: &str) -> Option<&Arc<RecordSchema>> {
        self.record_map
            .get(name)
            .and_then(|&idx| self.records.get(idx))
    }

    /// Get a record schema by name, or fail.
    pub fn record(&self, name: &str) -> Result<&Arc<RecordSchema>, SchemaError> {
        self.get_record(name)
            .ok_or_else(|| SchemaError::RecordNotFound(name.to_string()))
    }

    /// Get all record names in document order.
    pub fn record_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Iterate over compiled records in document order.
    pub fn records(&self) -> impl Iterator<Item = &Arc<RecordSchema>> {
        self.records.iter()
    }
}

/// Depth-first search for a cycle made only of required references.
///
/// `path` holds the records currently being visited; meeting one of them
/// again means every record on the way needs the next one.
fn check_required_cycles<'a>(
    spec: &'a RecordSpec,
    specs: &HashMap<&'a str, &'a RecordSpec>,
    done: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Result<(), SchemaError> {
    if done.contains(spec.name.as_str()) {
        return Ok(());
    }
    if let Some(start) = path.iter().position(|name| *name == spec.name) {
        let mut cycle: Vec<String> = path[start..].iter().map(|name| name.to_string()).collect();
        cycle.push(spec.name.clone());
        return Err(SchemaError::CyclicReference(cycle));
    }
    path.push(&spec.name);

    for field in spec.fields.iter().filter(|f| f.is_required()) {
        if let Some(field_type) = &field.field_type {
            for name in field_type.required_names() {
                if let Some(dependency) = specs.get(name) {
                    check_required_cycles(dependency, specs, done, path)?;
                }
            }
        }
    }

    path.pop();
    done.insert(&spec.name);
    Ok(())
}

/// Slot a back-reference is linked through until its record is compiled.
type LinkSlot = Arc<OnceLock<Weak<RecordSchema>>>;

/// Depth-first compilation of one record and everything it references.
///
/// `pending` holds the records currently being compiled. A reference to
/// one of them becomes a [`RecordRef::Linked`], filled in when that record
/// is done; every other reference owns its compiled schema.
fn compile_record(
    spec: &RecordSpec,
    specs: &HashMap<&str, &RecordSpec>,
    compiled: &mut HashMap<String, Arc<RecordSchema>>,
    pending: &mut HashMap<String, LinkSlot>,
) -> Arc<RecordSchema> {
    if let Some(done) = compiled.get(&spec.name) {
        return done.clone();
    }
    pending.insert(spec.name.clone(), Arc::new(OnceLock::new()));

    for field in &spec.fields {
        if let Some(field_type) = &field.field_type {
            for name in field_type.referenced_names() {
                if pending.contains_key(name) {
                    continue;
                }
                if let Some(dependency) = specs.get(name) {
                    compile_record(dependency, specs, compiled, pending);
                }
            }
        }
    }

    let resolve = |name: &str| {
        if let Some(schema) = compiled.get(name) {
            return Some(RecordRef::Owned(schema.clone()));
        }
        pending.get(name).map(|slot| RecordRef::Linked {
            name: name.to_string(),
            target: slot.clone(),
        })
    };
    let fields = spec
        .fields
        .iter()
        .map(|field| {
            let descriptor = field.field_type.as_ref().map(|t| t.compile(&resolve));
            let default = match (&field.default, &descriptor) {
                (Some(yaml), Some(d)) => Some(Value::from_yaml_typed(yaml, d)),
                (Some(yaml), None) => Some(Value::from_yaml(yaml)),
                (None, _) => None,
            };
            FieldDefinition {
                name: field.name.clone(),
                required: field.is_required(),
                descriptor,
                default,
                constraints: field.constraints.clone(),
            }
        })
        .collect();

    let schema = Arc::new(RecordSchema {
        name: spec.name.clone(),
        fields,
    });
    if let Some(slot) = pending.remove(&spec.name) {
        // Only this call fills the slot.
        let _ = slot.set(Arc::downgrade(&schema));
    }
    compiled.insert(spec.name.clone(), schema.clone());
    schema
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    const SAMPLE_SCHEMA: &str = r#"
version: 1

records:
  - name: Outer
    fields:
      - name: id
        type: int
        constraints:
          - ge: 0
          - le: 100

      - name: inner
        type: Inner

      - name: extras
        type:
          type: list
          element: Inner

      - name: level
        type:
          type: literal
          values: [low, high]
        default: low

      - name: maybe
        type:
          type: optional
          inner: int
        required: false

  - name: Inner
    fields:
      - name: label
        type: text
        constraints:
          - min_length: 3
          - max_length: 10
"#;

    #[test]
    fn test_parse_schema_set() {
        let set = SchemaSet::from_yaml(SAMPLE_SCHEMA).unwrap();

        assert_eq!(set.version, 1);
        assert_eq!(set.record_names(), vec!["Outer", "Inner"]);

        let outer = set.record("Outer").unwrap();
        assert_eq!(outer.field_names(), vec!["id", "inner", "extras", "level", "maybe"]);
    }

    #[test]
    fn test_nested_reference_is_compiled() {
        let set = SchemaSet::from_yaml(SAMPLE_SCHEMA).unwrap();
        let outer = set.record("Outer").unwrap();
        let inner = set.record("Inner").unwrap();

        match outer.get_field_type("inner").unwrap() {
            Some(TypeDescriptor::Nested(RecordRef::Owned(schema))) => assert_eq!(schema, inner),
            other => panic!("Expected Nested, got {other:?}"),
        }
        match outer.get_field_type("extras").unwrap() {
            Some(TypeDescriptor::List(element)) => {
                assert!(matches!(element.as_ref(), TypeDescriptor::Nested(_)))
            }
            other => panic!("Expected List, got {other:?}"),
        }
    }

    #[test]
    fn test_required_flags_and_defaults() {
        let set = SchemaSet::from_yaml(SAMPLE_SCHEMA).unwrap();
        let outer = set.record("Outer").unwrap();

        let id = outer.get_field("id").unwrap();
        assert!(id.required);
        assert_eq!(
            id.constraints,
            vec![Constraint::GreaterEq(0.0), Constraint::LessEq(100.0)]
        );

        let level = outer.get_field("level").unwrap();
        assert!(!level.required);
        assert_eq!(level.default, Some(Value::Text("low".to_string())));

        let maybe = outer.get_field("maybe").unwrap();
        assert!(!maybe.required);
        assert!(!maybe.has_default());
    }

    #[test]
    fn test_missing_type_compiles_to_none() {
        let set = SchemaSet::from_yaml(
            r#"
records:
  - name: Loose
    fields:
      - name: anything
"#,
        )
        .unwrap();
        let loose = set.record("Loose").unwrap();
        assert_eq!(loose.get_field_type("anything").unwrap(), None);
    }

    #[test]
    fn test_optional_self_reference_is_linked() {
        let set = SchemaSet::from_yaml(
            r#"
records:
  - name: Node
    fields:
      - name: value
        type: int
      - name: next
        type: { type: optional, inner: Node }
        required: false
"#,
        )
        .unwrap();
        let node = set.record("Node").unwrap();

        match node.get_field_type("next").unwrap() {
            Some(TypeDescriptor::Optional(inner)) => match inner.as_ref() {
                TypeDescriptor::Nested(link @ RecordRef::Linked { .. }) => {
                    assert_eq!(link.name(), "Node");
                    assert!(Arc::ptr_eq(&link.resolve().unwrap(), node));
                }
                other => panic!("Expected linked Nested, got {other:?}"),
            },
            other => panic!("Expected Optional, got {other:?}"),
        }
        assert_eq!(node.get_field_type("next").unwrap().unwrap().to_string(), "optional[Node]");
    }

    #[test]
    fn test_mutual_reference_through_omittable_field() {
        let set = SchemaSet::from_yaml(
            r#"
records:
  - name: Parent
    fields:
      - name: child
        type: Child
  - name: Child
    fields:
      - name: parent
        type: { type: union, alternatives: [Parent, null] }
"#,
        )
        .unwrap();
        let parent = set.record("Parent").unwrap();
        let child = set.record("Child").unwrap();

        assert!(matches!(
            parent.get_field_type("child").unwrap(),
            Some(TypeDescriptor::Nested(RecordRef::Owned(_)))
        ));
        match child.get_field_type("parent").unwrap() {
            Some(TypeDescriptor::Optional(inner)) => match inner.as_ref() {
                TypeDescriptor::Nested(link) => {
                    assert!(Arc::ptr_eq(&link.resolve().unwrap(), parent))
                }
                other => panic!("Expected Nested, got {other:?}"),
            },
            other => panic!("Expected Optional, got {other:?}"),
        }
    }

    #[test]
    fn test_required_cycle_rejected() {
        let result = SchemaSet::from_yaml(
            r#"
records:
  - name: Node
    fields:
      - name: next
        type: Node
"#,
        );
        match result {
            Err(SchemaError::CyclicReference(cycle)) => {
                assert_eq!(cycle, vec!["Node".to_string(), "Node".to_string()])
            }
            other => panic!("Expected CyclicReference, got {other:?}"),
        }

        // A required optional-typed field still breaks the cycle.
        assert!(SchemaSet::from_yaml(
            r#"
records:
  - name: Node
    fields:
      - name: next
        type: { type: optional, inner: Node }
"#,
        )
        .is_ok());

        // So does a default.
        assert!(SchemaSet::from_yaml(
            r#"
records:
  - name: Node
    fields:
      - name: children
        type: { type: list, element: Node }
        default: []
"#,
        )
        .is_ok());
    }

    #[test]
    fn test_longer_required_cycle_reports_path() {
        let result = SchemaSet::from_yaml(
            r#"
records:
  - name: A
    fields:
      - { name: b, type: B }
  - name: B
    fields:
      - { name: c, type: { type: list, element: C } }
  - name: C
    fields:
      - { name: a, type: A }
"#,
        );
        match result {
            Err(SchemaError::CyclicReference(cycle)) => {
                assert_eq!(cycle, vec!["A", "B", "C", "A"])
            }
            other => panic!("Expected CyclicReference, got {other:?}"),
        }
    }

    #[test]
    fn test_required_with_default_is_not_required() {
        let set = SchemaSet::from_yaml(
            r#"
records:
  - name: Counter
    fields:
      - name: start
        type: int
        required: true
        default: 5
      - name: step
        type: int
        required: true
      - name: note
        type: text
        required: false
"#,
        )
        .unwrap();
        let counter = set.record("Counter").unwrap();

        let start = counter.get_field("start").unwrap();
        assert!(!start.required);
        assert_eq!(start.default, Some(Value::Int(5)));
        assert!(counter.get_field("step").unwrap().required);
        assert!(!counter.get_field("note").unwrap().required);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = SchemaSet::from_yaml(
            r#"
records:
  - name: A
    fields: []
  - name: A
    fields: []
"#,
        );
        assert!(matches!(result, Err(SchemaError::DuplicateRecord(_))));

        let result = SchemaSet::from_yaml(
            r#"
records:
  - name: A
    fields:
      - { name: x, type: int }
      - { name: x, type: text }
"#,
        );
        assert!(matches!(result, Err(SchemaError::DuplicateField { .. })));
    }

    #[test]
    fn test_record_not_found() {
        let set = SchemaSet::from_yaml(SAMPLE_SCHEMA).unwrap();
        assert!(matches!(
            set.record("Nope"),
            Err(SchemaError::RecordNotFound(_))
        ));
        let outer = set.record("Outer").unwrap();
        assert!(matches!(
            outer.get_field_type("nope"),
            Err(SchemaError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_builder_api() {
        let schema = RecordSchema::new("Reading")
            .field(FieldDefinition::required("celsius", TypeDescriptor::float()))
            .field(FieldDefinition::optional("note", TypeDescriptor::text()))
            .field(
                FieldDefinition::required("unit", TypeDescriptor::text())
                    .with_default(Value::Text("C".into())),
            );

        assert_eq!(
            schema.get_field_type("celsius").unwrap(),
            Some(&TypeDescriptor::Primitive(PrimitiveKind::Float))
        );
        assert!(!schema.get_field("note").unwrap().required);
        assert!(!schema.get_field("unit").unwrap().required);
    }
}
