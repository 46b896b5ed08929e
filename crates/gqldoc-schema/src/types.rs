//! In-memory schema representation.
//!
//! [`SchemaGraph`] owns every named element of a loaded schema. Named types
//! are stored in a [`BTreeMap`] so iteration order (and therefore SDL
//! serialization and classification) is deterministic; field, argument and
//! enum-value order within a type is the declaration order of the source.

use std::collections::BTreeMap;
use std::fmt;

/// The five scalars every GraphQL schema carries implicitly.
///
/// Loaders seed these into the graph so type re-resolution (e.g. the "Type"
/// section of an operation page) always succeeds; the SDL serializer skips
/// them since SDL cannot redefine built-ins.
pub const BUILT_IN_SCALARS: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

/// Deprecation state of a field or enum value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deprecation {
    /// Whether the element carries `@deprecated`.
    pub is_deprecated: bool,
    /// Deprecation reason, when one was given.
    pub reason: Option<String>,
}

impl Deprecation {
    /// Deprecation with the spec-mandated default reason.
    #[must_use]
    pub fn deprecated(reason: Option<String>) -> Self {
        Self {
            is_deprecated: true,
            reason: reason.or_else(|| Some("No longer supported".to_owned())),
        }
    }
}

/// A constant value: argument defaults and directive arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    /// Numbers keep their source text so `0.0` does not collapse to `0`.
    Number(String),
    String(String),
    Enum(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Bare display form used when substituting defaults into generated
    /// example syntax: strings and enum names unquoted, lists comma-joined
    /// without brackets.
    #[must_use]
    pub fn display_bare(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Boolean(b) => b.to_string(),
            Self::Number(n) => n.clone(),
            Self::String(s) | Self::Enum(s) => s.clone(),
            Self::List(items) => items
                .iter()
                .map(Self::display_bare)
                .collect::<Vec<_>>()
                .join(","),
            Self::Object(fields) => fields
                .iter()
                .map(|(k, v)| format!("{k}: {}", v.display_bare()))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// SDL literal form, used by the canonical schema serializer.
    #[must_use]
    pub fn to_sdl(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Boolean(b) => b.to_string(),
            Self::Number(n) => n.clone(),
            Self::String(s) => format!("\"{}\"", escape_string(s)),
            Self::Enum(name) => name.clone(),
            Self::List(items) => {
                let inner = items.iter().map(Self::to_sdl).collect::<Vec<_>>();
                format!("[{}]", inner.join(", "))
            }
            Self::Object(fields) => {
                let inner = fields
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", v.to_sdl()))
                    .collect::<Vec<_>>();
                format!("{{{}}}", inner.join(", "))
            }
        }
    }

    /// Parse an SDL-shaped literal, as found in introspection `defaultValue`
    /// strings (`"\"asc\""`, `"0"`, `"[1, 2]"`, `"ASC"`).
    #[must_use]
    pub fn from_sdl_literal(literal: &str) -> Self {
        let text = literal.trim();
        if text.is_empty() || text == "null" {
            return Self::Null;
        }
        if text == "true" {
            return Self::Boolean(true);
        }
        if text == "false" {
            return Self::Boolean(false);
        }
        if let Some(inner) = text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return Self::String(unescape_string(inner));
        }
        if let Some(inner) = text
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let items = split_top_level(inner)
                .into_iter()
                .map(Self::from_sdl_literal)
                .collect();
            return Self::List(items);
        }
        if let Some(inner) = text
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            let fields = split_top_level(inner)
                .into_iter()
                .filter_map(|entry| {
                    let (key, value) = entry.split_once(':')?;
                    Some((key.trim().to_owned(), Self::from_sdl_literal(value)))
                })
                .collect();
            return Self::Object(fields);
        }
        if text.parse::<f64>().is_ok() {
            return Self::Number(text.to_owned());
        }
        Self::Enum(text.to_owned())
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn unescape_string(s: &str) -> String {
    s.replace("\\n", "\n")
        .replace("\\\"", "\"")
        .replace("\\\\", "\\")
}

/// Split `a, b, c` at top-level commas, respecting nested brackets, braces
/// and string literals.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '[' | '{' if !in_string => depth += 1,
            ']' | '}' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = &s[start..];
    if !tail.trim().is_empty() {
        parts.push(tail);
    }
    parts
}

/// Reference to a (possibly wrapped) type in field and argument positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Convenience constructor for a named type reference.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Unwrap every list/non-null decoration down to the named type.
    #[must_use]
    pub fn named_type(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    /// Strip a single outer non-null wrapper, if present.
    #[must_use]
    pub fn strip_non_null(&self) -> &Self {
        match self {
            Self::NonNull(inner) => inner,
            _ => self,
        }
    }

    /// Whether this reference (ignoring an outer non-null) is a list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self.strip_non_null(), Self::List(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// Argument of a field or directive, or field of an input object.
#[derive(Clone, Debug, PartialEq)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
}

/// Field of an object or interface type, or a root operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub args: Vec<InputValue>,
    pub ty: TypeRef,
    pub deprecation: Deprecation,
}

/// A single enum member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Deprecation,
}

/// Scalar type definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
}

/// Object type definition.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub interfaces: Vec<String>,
}

/// Interface type definition.
#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub interfaces: Vec<String>,
}

/// Union type definition. `types` holds the member type names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub types: Vec<String>,
}

/// Enum type definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

/// Input object type definition.
#[derive(Clone, Debug, PartialEq)]
pub struct InputObjectType {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputValue>,
}

/// Directive definition. Locations are SDL location names
/// (`FIELD_DEFINITION`, `OBJECT`, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveDef {
    pub name: String,
    pub description: Option<String>,
    pub args: Vec<InputValue>,
    pub locations: Vec<String>,
}

/// Closed union over the named type kinds of a schema.
///
/// Classification and printing dispatch over this enum, so an unhandled
/// kind is a compile error rather than a runtime fallthrough.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeDef {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl TypeDef {
    /// Display name of the type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(t) => &t.name,
            Self::Object(t) => &t.name,
            Self::Interface(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::Enum(t) => &t.name,
            Self::InputObject(t) => &t.name,
        }
    }

    /// Description, when the schema carries one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Scalar(t) => t.description.as_deref(),
            Self::Object(t) => t.description.as_deref(),
            Self::Interface(t) => t.description.as_deref(),
            Self::Union(t) => t.description.as_deref(),
            Self::Enum(t) => t.description.as_deref(),
            Self::InputObject(t) => t.description.as_deref(),
        }
    }
}

/// A loaded, navigable schema.
///
/// The graph owns all elements; the documentation pipeline only reads it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaGraph {
    types: BTreeMap<String, TypeDef>,
    directives: Vec<DirectiveDef>,
    /// Name of the query root type, when the schema has one.
    pub query_type: Option<String>,
    /// Name of the mutation root type, when the schema has one.
    pub mutation_type: Option<String>,
    /// Name of the subscription root type, when the schema has one.
    pub subscription_type: Option<String>,
}

impl SchemaGraph {
    /// Insert a named type, replacing any previous definition of that name.
    pub fn insert_type(&mut self, def: TypeDef) {
        self.types.insert(def.name().to_owned(), def);
    }

    /// Register a directive definition.
    pub fn add_directive(&mut self, directive: DirectiveDef) {
        self.directives.push(directive);
    }

    /// Look up a named type.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// All named types, in name order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// All directive definitions, in registration order.
    #[must_use]
    pub fn directives(&self) -> &[DirectiveDef] {
        &self.directives
    }

    /// Resolve a root operation type to its object definition.
    #[must_use]
    pub fn root_object(&self, root: Option<&str>) -> Option<&ObjectType> {
        match self.get_type(root?) {
            Some(TypeDef::Object(object)) => Some(object),
            _ => None,
        }
    }
}
