//! Type descriptors for record fields.
//!
//! This module defines `TypeDescriptor`, the closed, recursive description
//! of what shape of value a field requires, and `TypeSpec`, the YAML form a
//! descriptor is compiled from.

use crate::schema::RecordSchema;
use crate::values::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// Scalar kinds a descriptor can bottom out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// Boolean value
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Text string
    Text,
    /// Raw bytes
    Bytes,
    /// Calendar date (YYYY-MM-DD)
    Date,
    /// Time of day (HH:MM:SS)
    Time,
    /// Date and time of day, no timezone
    DateTime,
}

impl PrimitiveKind {
    /// Parse a primitive type name as written in a schema document.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "text" | "str" => Some(Self::Text),
            "bytes" => Some(Self::Bytes),
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "datetime" | "date_time" => Some(Self::DateTime),
            _ => None,
        }
    }

    /// Canonical schema name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
        }
    }
}

/// Compiled description of a field's declared shape.
///
/// Descriptors are immutable and built once, either programmatically or by
/// compiling a [`TypeSpec`] from a schema document. Nested records are held
/// through a [`RecordRef`], so cloning a descriptor is cheap.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// A scalar value
    Primitive(PrimitiveKind),

    /// A value that may be absent
    Optional(Box<TypeDescriptor>),

    /// One of several alternatives
    Union(Vec<TypeDescriptor>),

    /// One of a fixed list of concrete values
    Literal(Vec<Value>),

    /// Ordered sequence of elements
    List(Box<TypeDescriptor>),

    /// Unordered collection of distinct elements
    Set(Box<TypeDescriptor>),

    /// Immutable unordered collection of distinct elements
    FrozenSet(Box<TypeDescriptor>),

    /// Key/value mapping
    Dict(Box<TypeDescriptor>, Box<TypeDescriptor>),

    /// Fixed-arity tuple, one descriptor per position
    FixedTuple(Vec<TypeDescriptor>),

    /// Tuple of any length with a single element type
    VariadicTuple(Box<TypeDescriptor>),

    /// Another record
    Nested(RecordRef),

    /// A declared type the compiler did not recognise
    Unknown(String),
}

impl TypeDescriptor {
    pub fn bool() -> Self {
        Self::Primitive(PrimitiveKind::Bool)
    }

    pub fn int() -> Self {
        Self::Primitive(PrimitiveKind::Int)
    }

    pub fn float() -> Self {
        Self::Primitive(PrimitiveKind::Float)
    }

    pub fn text() -> Self {
        Self::Primitive(PrimitiveKind::Text)
    }

    pub fn bytes() -> Self {
        Self::Primitive(PrimitiveKind::Bytes)
    }

    pub fn date() -> Self {
        Self::Primitive(PrimitiveKind::Date)
    }

    pub fn time() -> Self {
        Self::Primitive(PrimitiveKind::Time)
    }

    pub fn datetime() -> Self {
        Self::Primitive(PrimitiveKind::DateTime)
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn list(element: TypeDescriptor) -> Self {
        Self::List(Box::new(element))
    }

    pub fn set(element: TypeDescriptor) -> Self {
        Self::Set(Box::new(element))
    }

    pub fn frozen_set(element: TypeDescriptor) -> Self {
        Self::FrozenSet(Box::new(element))
    }

    pub fn dict(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Dict(Box::new(key), Box::new(value))
    }

    pub fn variadic_tuple(element: TypeDescriptor) -> Self {
        Self::VariadicTuple(Box::new(element))
    }

    pub fn nested(schema: RecordSchema) -> Self {
        Self::Nested(RecordRef::Owned(Arc::new(schema)))
    }

    /// Whether this descriptor admits an absent value.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Whether generating a value may descend into another record.
    pub fn references_records(&self) -> bool {
        match self {
            Self::Nested(_) => true,
            Self::Optional(inner)
            | Self::List(inner)
            | Self::Set(inner)
            | Self::FrozenSet(inner)
            | Self::VariadicTuple(inner) => inner.references_records(),
            Self::Union(items) | Self::FixedTuple(items) => {
                items.iter().any(TypeDescriptor::references_records)
            }
            Self::Dict(key, value) => key.references_records() || value.references_records(),
            Self::Primitive(_) | Self::Literal(_) | Self::Unknown(_) => false,
        }
    }
}

/// A nested record reference.
///
/// Most references own their schema. A reference back to a record that is
/// still being compiled (a record reaching itself through its own fields)
/// is `Linked`: it holds a weak pointer that is filled in once that record
/// is complete, so self-referential schemas do not keep themselves alive.
#[derive(Clone)]
pub enum RecordRef {
    /// Fully compiled schema
    Owned(Arc<RecordSchema>),

    /// Back-reference to an enclosing record
    Linked {
        name: String,
        target: Arc<OnceLock<Weak<RecordSchema>>>,
    },
}

impl RecordRef {
    /// Name of the referenced record.
    pub fn name(&self) -> &str {
        match self {
            Self::Owned(schema) => &schema.name,
            Self::Linked { name, .. } => name,
        }
    }

    /// Get the referenced schema.
    ///
    /// Returns `None` for a linked reference whose target has been dropped,
    /// which happens when the schema set it was compiled in no longer exists.
    pub fn resolve(&self) -> Option<Arc<RecordSchema>> {
        match self {
            Self::Owned(schema) => Some(schema.clone()),
            Self::Linked { target, .. } => target.get().and_then(Weak::upgrade),
        }
    }
}

// Linked references compare and print by name; following them would not
// terminate on self-referential schemas.
impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Owned(a), Self::Owned(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => self.name() == other.name(),
        }
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned(schema) => f.debug_tuple("Owned").field(schema).finish(),
            Self::Linked { name, .. } => f.debug_tuple("Linked").field(name).finish(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(items: &[TypeDescriptor]) -> String {
            items
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }

        match self {
            Self::Primitive(kind) => f.write_str(kind.name()),
            Self::Optional(inner) => write!(f, "optional[{inner}]"),
            Self::Union(alternatives) => write!(f, "union[{}]", join(alternatives)),
            Self::Literal(values) => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "literal[{}]", rendered.join(", "))
            }
            Self::List(element) => write!(f, "list[{element}]"),
            Self::Set(element) => write!(f, "set[{element}]"),
            Self::FrozenSet(element) => write!(f, "frozen_set[{element}]"),
            Self::Dict(key, value) => write!(f, "dict[{key}, {value}]"),
            Self::FixedTuple(elements) => write!(f, "tuple[{}]", join(elements)),
            Self::VariadicTuple(element) => write!(f, "tuple[{element}, ...]"),
            Self::Nested(record) => f.write_str(record.name()),
            Self::Unknown(name) => write!(f, "unknown[{name}]"),
        }
    }
}

/// Declared field type as written in a schema document.
///
/// Simple types are given as strings, either a primitive name or the name
/// of another record in the same document:
/// ```yaml
/// type: int
/// type: Address
/// ```
///
/// An unquoted `null` is accepted where a name is, and means the absent
/// value (useful inside a union).
///
/// Composite types use the object format:
/// ```yaml
/// type:
///   type: dict
///   key: text
///   value: { type: list, element: float }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    /// Primitive name, `"null"`, or record name
    Name(String),
    /// Unquoted YAML `null`
    Null,
    /// Composite type
    Composite(CompositeSpec),
}

/// Composite type forms, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompositeSpec {
    Optional { inner: Box<TypeSpec> },
    Union { alternatives: Vec<TypeSpec> },
    Literal { values: Vec<serde_yaml::Value> },
    List { element: Box<TypeSpec> },
    Set { element: Box<TypeSpec> },
    FrozenSet { element: Box<TypeSpec> },
    Dict { key: Box<TypeSpec>, value: Box<TypeSpec> },
    Tuple { elements: Vec<TypeSpec> },
    VariadicTuple { element: Box<TypeSpec> },
    Record { name: String },
}

/// Name of the absent-value alternative inside a union.
pub const NULL_TYPE_NAME: &str = "null";

impl TypeSpec {
    /// Names of records this spec refers to, in declaration order.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Name(name) => {
                if PrimitiveKind::from_name(name).is_none() && name != NULL_TYPE_NAME {
                    out.push(name);
                }
            }
            Self::Null => {}
            Self::Composite(composite) => match composite {
                CompositeSpec::Optional { inner } => inner.collect_names(out),
                CompositeSpec::Union { alternatives }
                | CompositeSpec::Tuple {
                    elements: alternatives,
                } => {
                    for alt in alternatives {
                        alt.collect_names(out);
                    }
                }
                CompositeSpec::Literal { .. } => {}
                CompositeSpec::List { element }
                | CompositeSpec::Set { element }
                | CompositeSpec::FrozenSet { element }
                | CompositeSpec::VariadicTuple { element } => element.collect_names(out),
                CompositeSpec::Dict { key, value } => {
                    key.collect_names(out);
                    value.collect_names(out);
                }
                CompositeSpec::Record { name } => out.push(name),
            },
        }
    }

    /// Names of records a value of this type cannot be generated without.
    ///
    /// References below an optional, or below a union with at least one
    /// alternative that needs no record, are left out. Collections always
    /// hold at least one element, so their element references count.
    pub fn required_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_required(&mut names);
        names
    }

    fn collect_required<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Name(_) => self.collect_names(out),
            Self::Null => {}
            Self::Composite(composite) => match composite {
                CompositeSpec::Optional { .. } | CompositeSpec::Literal { .. } => {}
                CompositeSpec::Union { alternatives } => {
                    if alternatives.iter().all(|alt| !alt.required_names().is_empty()) {
                        for alt in alternatives {
                            alt.collect_required(out);
                        }
                    }
                }
                CompositeSpec::Tuple { elements } => {
                    for element in elements {
                        element.collect_required(out);
                    }
                }
                CompositeSpec::List { element }
                | CompositeSpec::Set { element }
                | CompositeSpec::FrozenSet { element }
                | CompositeSpec::VariadicTuple { element } => element.collect_required(out),
                CompositeSpec::Dict { key, value } => {
                    key.collect_required(out);
                    value.collect_required(out);
                }
                CompositeSpec::Record { name } => out.push(name),
            },
        }
    }

    /// Whether this spec stands for the absent value.
    fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Name(name) => name == NULL_TYPE_NAME,
            Self::Composite(_) => false,
        }
    }

    /// Compile into a descriptor.
    ///
    /// `resolve` maps a record name to a reference to its schema; names it
    /// cannot resolve become [`TypeDescriptor::Unknown`]. A union listing
    /// `null` compiles to an optional over the remaining alternatives.
    pub fn compile<F>(&self, resolve: &F) -> TypeDescriptor
    where
        F: Fn(&str) -> Option<RecordRef>,
    {
        match self {
            Self::Name(name) => compile_name(name, resolve),
            Self::Null => TypeDescriptor::Unknown(NULL_TYPE_NAME.to_string()),
            Self::Composite(composite) => match composite {
                CompositeSpec::Optional { inner } => {
                    TypeDescriptor::optional(inner.compile(resolve))
                }
                CompositeSpec::Union { alternatives } => {
                    let mut nullable = false;
                    let mut compiled = Vec::with_capacity(alternatives.len());
                    for alt in alternatives {
                        if alt.is_null() {
                            nullable = true;
                        } else {
                            compiled.push(alt.compile(resolve));
                        }
                    }
                    let union = if compiled.len() == 1 {
                        compiled.remove(0)
                    } else {
                        TypeDescriptor::Union(compiled)
                    };
                    if nullable {
                        TypeDescriptor::optional(union)
                    } else {
                        union
                    }
                }
                CompositeSpec::Literal { values } => {
                    TypeDescriptor::Literal(values.iter().map(Value::from_yaml).collect())
                }
                CompositeSpec::List { element } => TypeDescriptor::list(element.compile(resolve)),
                CompositeSpec::Set { element } => TypeDescriptor::set(element.compile(resolve)),
                CompositeSpec::FrozenSet { element } => {
                    TypeDescriptor::frozen_set(element.compile(resolve))
                }
                CompositeSpec::Dict { key, value } => {
                    TypeDescriptor::dict(key.compile(resolve), value.compile(resolve))
                }
                CompositeSpec::Tuple { elements } => TypeDescriptor::FixedTuple(
                    elements.iter().map(|e| e.compile(resolve)).collect(),
                ),
                CompositeSpec::VariadicTuple { element } => {
                    TypeDescriptor::variadic_tuple(element.compile(resolve))
                }
                CompositeSpec::Record { name } => match resolve(name) {
                    Some(record) => TypeDescriptor::Nested(record),
                    None => TypeDescriptor::Unknown(name.clone()),
                },
            },
        }
    }
}

fn compile_name<F>(name: &str, resolve: &F) -> TypeDescriptor
where
    F: Fn(&str) -> Option<RecordRef>,
{
    if let Some(kind) = PrimitiveKind::from_name(name) {
        return TypeDescriptor::Primitive(kind);
    }
    match resolve(name) {
        Some(record) => TypeDescriptor::Nested(record),
        None => TypeDescriptor::Unknown(name.to_string()),
    }
}
