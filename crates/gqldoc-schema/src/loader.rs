//! Schema loading.
//!
//! [`load_schema`] resolves a location string through one of three
//! interchangeable strategies:
//!
//! - a local schema-definition (SDL) file,
//! - a remote URL, queried with the standard introspection query over HTTP,
//! - a local introspection-JSON file (anything ending in `.json`).
//!
//! All three normalize into one [`SchemaGraph`]. Loader failures are fatal
//! and carry the offending location; they surface before any output
//! directory is touched.

use std::path::Path;

use async_graphql_parser::{Positioned, parse_schema, types as ast};
use async_graphql_value::ConstValue;

use crate::introspection;
use crate::types::{
    BUILT_IN_SCALARS, Deprecation, DirectiveDef, EnumType, EnumValue, Field, InputObjectType,
    InputValue, InterfaceType, ObjectType, ScalarType, SchemaGraph, TypeDef, TypeRef, UnionType,
    Value,
};

/// Error raised while loading a schema.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The schema location could not be read.
    #[error("Cannot read schema \"{location}\": {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    /// The SDL text failed to parse.
    #[error("Cannot parse schema \"{location}\": {message}")]
    Parse { location: String, message: String },
    /// The introspection endpoint could not be queried.
    #[error("Introspection request to \"{url}\" failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    /// The introspection payload did not decode.
    #[error("Invalid introspection result from \"{location}\": {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a schema from a location string, picking the loader strategy from
/// its shape.
pub fn load_schema(location: &str) -> Result<SchemaGraph, LoaderError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return load_from_url(location);
    }
    if Path::new(location)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        return load_from_json_file(location);
    }
    load_from_sdl_file(location)
}

fn load_from_sdl_file(location: &str) -> Result<SchemaGraph, LoaderError> {
    let sdl = std::fs::read_to_string(location).map_err(|source| LoaderError::Io {
        location: location.to_owned(),
        source,
    })?;
    tracing::debug!(location, bytes = sdl.len(), "loaded SDL file");
    parse_sdl(&sdl, location)
}

fn load_from_json_file(location: &str) -> Result<SchemaGraph, LoaderError> {
    let text = std::fs::read_to_string(location).map_err(|source| LoaderError::Io {
        location: location.to_owned(),
        source,
    })?;
    let value = serde_json::from_str(&text).map_err(|source| LoaderError::Json {
        location: location.to_owned(),
        source,
    })?;
    introspection::schema_from_value(value, location)
}

fn load_from_url(url: &str) -> Result<SchemaGraph, LoaderError> {
    tracing::info!(url, "running introspection query");
    let payload = serde_json::json!({ "query": introspection::INTROSPECTION_QUERY });
    let mut response = ureq::post(url)
        .send_json(&payload)
        .map_err(|source| LoaderError::Http {
            url: url.to_owned(),
            source: Box::new(source),
        })?;
    let value: serde_json::Value =
        response
            .body_mut()
            .read_json()
            .map_err(|source| LoaderError::Http {
                url: url.to_owned(),
                source: Box::new(source),
            })?;
    introspection::schema_from_value(value, url)
}

/// Build a [`SchemaGraph`] directly from SDL text. Used by the file loader
/// and by tests that construct schemas inline.
pub fn schema_from_sdl(sdl: &str) -> Result<SchemaGraph, LoaderError> {
    parse_sdl(sdl, "<inline>")
}

fn parse_sdl(sdl: &str, location: &str) -> Result<SchemaGraph, LoaderError> {
    let document = parse_schema(sdl).map_err(|err| LoaderError::Parse {
        location: location.to_owned(),
        message: err.to_string(),
    })?;
    Ok(graph_from_document(document))
}

fn graph_from_document(document: ast::ServiceDocument) -> SchemaGraph {
    let mut graph = SchemaGraph::default();
    for definition in document.definitions {
        match definition {
            ast::TypeSystemDefinition::Schema(schema_def) => {
                let node = schema_def.node;
                if let Some(query) = node.query {
                    graph.query_type = Some(query.node.to_string());
                }
                if let Some(mutation) = node.mutation {
                    graph.mutation_type = Some(mutation.node.to_string());
                }
                if let Some(subscription) = node.subscription {
                    graph.subscription_type = Some(subscription.node.to_string());
                }
            }
            ast::TypeSystemDefinition::Type(type_def) => {
                graph.insert_type(convert_type(type_def.node));
            }
            ast::TypeSystemDefinition::Directive(directive) => {
                graph.add_directive(convert_directive(directive.node));
            }
        }
    }
    finalize(&mut graph);
    graph
}

/// Resolve conventional root names and seed the implicit built-in scalars.
pub(crate) fn finalize(graph: &mut SchemaGraph) {
    if graph.query_type.is_none() && graph.get_type("Query").is_some() {
        graph.query_type = Some("Query".to_owned());
    }
    if graph.mutation_type.is_none() && graph.get_type("Mutation").is_some() {
        graph.mutation_type = Some("Mutation".to_owned());
    }
    if graph.subscription_type.is_none() && graph.get_type("Subscription").is_some() {
        graph.subscription_type = Some("Subscription".to_owned());
    }
    for name in BUILT_IN_SCALARS {
        if graph.get_type(name).is_none() {
            graph.insert_type(TypeDef::Scalar(ScalarType {
                name: name.to_owned(),
                description: None,
            }));
        }
    }
}

fn convert_type(def: ast::TypeDefinition) -> TypeDef {
    let name = def.name.node.to_string();
    let description = def.description.map(|d| d.node);
    match def.kind {
        ast::TypeKind::Scalar => TypeDef::Scalar(ScalarType { name, description }),
        ast::TypeKind::Object(object) => TypeDef::Object(ObjectType {
            name,
            description,
            interfaces: names(&object.implements),
            fields: object
                .fields
                .into_iter()
                .map(|field| convert_field(field.node))
                .collect(),
        }),
        ast::TypeKind::Interface(interface) => TypeDef::Interface(InterfaceType {
            name,
            description,
            interfaces: names(&interface.implements),
            fields: interface
                .fields
                .into_iter()
                .map(|field| convert_field(field.node))
                .collect(),
        }),
        ast::TypeKind::Union(union) => TypeDef::Union(UnionType {
            name,
            description,
            types: names(&union.members),
        }),
        ast::TypeKind::Enum(def) => TypeDef::Enum(EnumType {
            name,
            description,
            values: def
                .values
                .into_iter()
                .map(|value| convert_enum_value(value.node))
                .collect(),
        }),
        ast::TypeKind::InputObject(input) => TypeDef::InputObject(InputObjectType {
            name,
            description,
            fields: input
                .fields
                .into_iter()
                .map(|field| convert_input_value(field.node))
                .collect(),
        }),
    }
}

fn convert_field(field: ast::FieldDefinition) -> Field {
    Field {
        name: field.name.node.to_string(),
        description: field.description.map(|d| d.node),
        args: field
            .arguments
            .into_iter()
            .map(|arg| convert_input_value(arg.node))
            .collect(),
        ty: convert_type_ref(&field.ty.node),
        deprecation: deprecation_from(&field.directives),
    }
}

fn convert_enum_value(value: ast::EnumValueDefinition) -> EnumValue {
    EnumValue {
        name: value.value.node.to_string(),
        description: value.description.map(|d| d.node),
        deprecation: deprecation_from(&value.directives),
    }
}

fn convert_input_value(value: ast::InputValueDefinition) -> InputValue {
    InputValue {
        name: value.name.node.to_string(),
        description: value.description.map(|d| d.node),
        ty: convert_type_ref(&value.ty.node),
        default_value: value.default_value.map(|v| convert_value(v.node)),
    }
}

fn convert_directive(directive: ast::DirectiveDefinition) -> DirectiveDef {
    DirectiveDef {
        name: directive.name.node.to_string(),
        description: directive.description.map(|d| d.node),
        args: directive
            .arguments
            .into_iter()
            .map(|arg| convert_input_value(arg.node))
            .collect(),
        locations: directive
            .locations
            .iter()
            .map(|location| location_name(&format!("{:?}", location.node)))
            .collect(),
    }
}

fn convert_type_ref(ty: &ast::Type) -> TypeRef {
    let base = match &ty.base {
        ast::BaseType::Named(name) => TypeRef::Named(name.to_string()),
        ast::BaseType::List(inner) => TypeRef::List(Box::new(convert_type_ref(inner))),
    };
    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}

fn convert_value(value: ConstValue) -> Value {
    match value {
        ConstValue::Null | ConstValue::Binary(_) => Value::Null,
        ConstValue::Boolean(b) => Value::Boolean(b),
        ConstValue::Number(n) => Value::Number(n.to_string()),
        ConstValue::String(s) => Value::String(s),
        ConstValue::Enum(name) => Value::Enum(name.to_string()),
        ConstValue::List(items) => Value::List(items.into_iter().map(convert_value).collect()),
        ConstValue::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), convert_value(value)))
                .collect(),
        ),
    }
}

fn deprecation_from(directives: &[Positioned<ast::ConstDirective>]) -> Deprecation {
    for directive in directives {
        if directive.node.name.node.as_str() == "deprecated" {
            let reason = directive
                .node
                .get_argument("reason")
                .and_then(|value| match &value.node {
                    ConstValue::String(reason) => Some(reason.clone()),
                    _ => None,
                });
            return Deprecation::deprecated(reason);
        }
    }
    Deprecation::default()
}

fn names(list: &[Positioned<async_graphql_value::Name>]) -> Vec<String> {
    list.iter().map(|name| name.node.to_string()).collect()
}

/// `FieldDefinition` -> `FIELD_DEFINITION`.
fn location_name(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for (i, c) in camel.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_sdl_conversion_preserves_field_order() {
        let schema = schema_from_sdl(
            r"
            type User {
              zeta: String
              alpha: String
              mid: String
            }
            ",
        )
        .unwrap();
        let Some(TypeDef::Object(user)) = schema.get_type("User") else {
            panic!("User should be an object type");
        };
        let fields: Vec<_> = user.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_sdl_conversion_reads_defaults_and_deprecation() {
        let schema = schema_from_sdl(
            r#"
            type Query {
              users(limit: Int = 25, sort: Sort = ASC): [User]
              old: String @deprecated(reason: "Gone.")
              older: String @deprecated
            }

            enum Sort { ASC DESC }
            type User { id: ID }
            "#,
        )
        .unwrap();
        let Some(TypeDef::Object(query)) = schema.get_type("Query") else {
            panic!("Query should be an object type");
        };

        let users = &query.fields[0];
        assert_eq!(
            users.args[0].default_value,
            Some(Value::Number("25".to_owned()))
        );
        assert_eq!(
            users.args[1].default_value,
            Some(Value::Enum("ASC".to_owned()))
        );

        let old = &query.fields[1];
        assert!(old.deprecation.is_deprecated);
        assert_eq!(old.deprecation.reason.as_deref(), Some("Gone."));

        let older = &query.fields[2];
        assert_eq!(older.deprecation.reason.as_deref(), Some("No longer supported"));
    }

    #[test]
    fn test_conventional_roots_resolved_without_schema_block() {
        let schema = schema_from_sdl("type Query { ping: String }").unwrap();
        assert_eq!(schema.query_type.as_deref(), Some("Query"));
        assert_eq!(schema.mutation_type, None);
    }

    #[test]
    fn test_built_in_scalars_seeded() {
        let schema = schema_from_sdl("type Query { ping: String }").unwrap();
        for name in BUILT_IN_SCALARS {
            assert!(schema.get_type(name).is_some(), "{name} should be seeded");
        }
    }

    #[test]
    fn test_parse_error_carries_location() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "type {{ nope").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let err = load_schema(&path).unwrap_err();
        assert!(matches!(err, LoaderError::Parse { .. }));
        assert!(err.to_string().contains(&path));
    }

    #[test]
    fn test_missing_file_is_io_error_with_location() {
        let err = load_schema("./does-not-exist.graphql").unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
        assert!(err.to_string().contains("does-not-exist.graphql"));
    }

    #[test]
    fn test_location_name_conversion() {
        assert_eq!(location_name("FieldDefinition"), "FIELD_DEFINITION");
        assert_eq!(location_name("Object"), "OBJECT");
    }

    #[test]
    fn test_json_strategy_selected_by_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        write!(file, "not json").unwrap();

        let err = load_schema(&file.path().to_string_lossy()).unwrap_err();
        assert!(matches!(err, LoaderError::Json { .. }));
    }
}
