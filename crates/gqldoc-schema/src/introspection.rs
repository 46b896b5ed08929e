//! Introspection-result decoding.
//!
//! Turns the JSON produced by the standard introspection query into a
//! [`SchemaGraph`]. The payload may arrive as a full response envelope
//! (`{"data": {"__schema": ...}}`), a bare `{"__schema": ...}` object, or
//! the `__schema` object itself; all three shapes are accepted.

use serde::Deserialize;

use crate::loader::{LoaderError, finalize};
use crate::types::{
    Deprecation, DirectiveDef, EnumType, EnumValue, Field, InputObjectType, InputValue,
    InterfaceType, ObjectType, ScalarType, SchemaGraph, TypeDef, TypeRef, UnionType, Value,
};

/// The standard introspection query, deprecated members included.
pub(crate) const INTROSPECTION_QUERY: &str = r"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types { ...FullType }
    directives {
      name
      description
      locations
      args { ...InputValue }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args { ...InputValue }
    type { ...TypeRef }
    isDeprecated
    deprecationReason
  }
  inputFields { ...InputValue }
  interfaces { ...TypeRef }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes { ...TypeRef }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType { kind name }
            }
          }
        }
      }
    }
  }
}
";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionSchema {
    query_type: Option<NamedTypeRef>,
    mutation_type: Option<NamedTypeRef>,
    subscription_type: Option<NamedTypeRef>,
    #[serde(default)]
    types: Vec<IntrospectionType>,
    #[serde(default)]
    directives: Vec<IntrospectionDirective>,
}

#[derive(Debug, Deserialize)]
struct NamedTypeRef {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionType {
    kind: String,
    name: Option<String>,
    description: Option<String>,
    fields: Option<Vec<IntrospectionField>>,
    input_fields: Option<Vec<IntrospectionInputValue>>,
    interfaces: Option<Vec<IntrospectionTypeRef>>,
    enum_values: Option<Vec<IntrospectionEnumValue>>,
    possible_types: Option<Vec<IntrospectionTypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionField {
    name: String,
    description: Option<String>,
    #[serde(default)]
    args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    ty: IntrospectionTypeRef,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionInputValue {
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    ty: IntrospectionTypeRef,
    /// SDL-shaped literal, e.g. `"\"asc\""` or `"0"`.
    default_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionEnumValue {
    name: String,
    description: Option<String>,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionTypeRef {
    kind: String,
    name: Option<String>,
    of_type: Option<Box<IntrospectionTypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionDirective {
    name: String,
    description: Option<String>,
    #[serde(default)]
    locations: Vec<String>,
    #[serde(default)]
    args: Vec<IntrospectionInputValue>,
}

/// Decode any accepted introspection payload shape into a schema graph.
pub(crate) fn schema_from_value(
    value: serde_json::Value,
    location: &str,
) -> Result<SchemaGraph, LoaderError> {
    let schema_value = value
        .get("data")
        .and_then(|data| data.get("__schema"))
        .or_else(|| value.get("__schema"))
        .unwrap_or(&value);
    let schema: IntrospectionSchema =
        serde_json::from_value(schema_value.clone()).map_err(|source| LoaderError::Json {
            location: location.to_owned(),
            source,
        })?;
    tracing::debug!(location, types = schema.types.len(), "decoded introspection result");
    Ok(convert_schema(schema))
}

fn convert_schema(schema: IntrospectionSchema) -> SchemaGraph {
    let mut graph = SchemaGraph::default();
    graph.query_type = schema.query_type.map(|t| t.name);
    graph.mutation_type = schema.mutation_type.map(|t| t.name);
    graph.subscription_type = schema.subscription_type.map(|t| t.name);

    for ty in schema.types {
        if let Some(def) = convert_type(ty) {
            graph.insert_type(def);
        }
    }
    for directive in schema.directives {
        graph.add_directive(DirectiveDef {
            name: directive.name,
            description: directive.description,
            args: directive.args.into_iter().map(convert_input_value).collect(),
            locations: directive.locations,
        });
    }
    finalize(&mut graph);
    graph
}

fn convert_type(ty: IntrospectionType) -> Option<TypeDef> {
    let name = ty.name?;
    let description = ty.description;
    let def = match ty.kind.as_str() {
        "SCALAR" => TypeDef::Scalar(ScalarType { name, description }),
        "OBJECT" => TypeDef::Object(ObjectType {
            name,
            description,
            fields: convert_fields(ty.fields),
            interfaces: named_refs(ty.interfaces),
        }),
        "INTERFACE" => TypeDef::Interface(InterfaceType {
            name,
            description,
            fields: convert_fields(ty.fields),
            interfaces: named_refs(ty.interfaces),
        }),
        "UNION" => TypeDef::Union(UnionType {
            name,
            description,
            types: named_refs(ty.possible_types),
        }),
        "ENUM" => TypeDef::Enum(EnumType {
            name,
            description,
            values: ty
                .enum_values
                .unwrap_or_default()
                .into_iter()
                .map(|value| EnumValue {
                    name: value.name,
                    description: value.description,
                    deprecation: deprecation(value.is_deprecated, value.deprecation_reason),
                })
                .collect(),
        }),
        "INPUT_OBJECT" => TypeDef::InputObject(InputObjectType {
            name,
            description,
            fields: ty
                .input_fields
                .unwrap_or_default()
                .into_iter()
                .map(convert_input_value)
                .collect(),
        }),
        other => {
            tracing::warn!(kind = other, type_name = name, "skipping unrecognized type kind");
            return None;
        }
    };
    Some(def)
}

fn convert_fields(fields: Option<Vec<IntrospectionField>>) -> Vec<Field> {
    fields
        .unwrap_or_default()
        .into_iter()
        .map(|field| Field {
            name: field.name,
            description: field.description,
            args: field.args.into_iter().map(convert_input_value).collect(),
            ty: convert_type_ref(&field.ty),
            deprecation: deprecation(field.is_deprecated, field.deprecation_reason),
        })
        .collect()
}

fn convert_input_value(value: IntrospectionInputValue) -> InputValue {
    InputValue {
        name: value.name,
        description: value.description,
        ty: convert_type_ref(&value.ty),
        default_value: value
            .default_value
            .as_deref()
            .map(Value::from_sdl_literal),
    }
}

fn convert_type_ref(ty: &IntrospectionTypeRef) -> TypeRef {
    match (ty.kind.as_str(), &ty.of_type) {
        ("NON_NULL", Some(inner)) => TypeRef::NonNull(Box::new(convert_type_ref(inner))),
        ("LIST", Some(inner)) => TypeRef::List(Box::new(convert_type_ref(inner))),
        _ => TypeRef::Named(ty.name.clone().unwrap_or_default()),
    }
}

fn named_refs(refs: Option<Vec<IntrospectionTypeRef>>) -> Vec<String> {
    refs.unwrap_or_default()
        .into_iter()
        .filter_map(|r| r.name)
        .collect()
}

fn deprecation(is_deprecated: bool, reason: Option<String>) -> Deprecation {
    if is_deprecated {
        Deprecation {
            is_deprecated: true,
            reason,
        }
    } else {
        Deprecation::default()
    }
}
