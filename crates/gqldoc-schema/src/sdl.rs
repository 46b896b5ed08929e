//! Canonical SDL serialization.
//!
//! Produces deterministic schema-definition-language text from a
//! [`SchemaGraph`]: directives sorted by name, named types in name order,
//! built-in scalars and meta types skipped. The change-detection gate hashes
//! and snapshots this text, so byte-for-byte stability across runs of an
//! unchanged schema is the one property that matters here.

use crate::types::{
    BUILT_IN_SCALARS, Deprecation, DirectiveDef, EnumType, Field, InputObjectType, InputValue,
    InterfaceType, ObjectType, SchemaGraph, TypeDef, UnionType,
};

/// Directives every GraphQL implementation provides; redefining them in SDL
/// is invalid, so they are skipped like the built-in scalars.
const BUILT_IN_DIRECTIVES: [&str; 4] = ["deprecated", "include", "skip", "specifiedBy"];

impl SchemaGraph {
    /// Serialize the schema as canonical SDL.
    #[must_use]
    pub fn to_sdl(&self) -> String {
        let mut blocks = Vec::new();

        if let Some(block) = schema_block(self) {
            blocks.push(block);
        }

        let mut directives: Vec<&DirectiveDef> = self
            .directives()
            .iter()
            .filter(|d| !BUILT_IN_DIRECTIVES.contains(&d.name.as_str()))
            .collect();
        directives.sort_by(|a, b| a.name.cmp(&b.name));
        for directive in directives {
            blocks.push(directive_sdl(directive));
        }

        for def in self.types() {
            let name = def.name();
            if name.starts_with("__") {
                continue;
            }
            if matches!(def, TypeDef::Scalar(_)) && BUILT_IN_SCALARS.contains(&name) {
                continue;
            }
            blocks.push(type_sdl(def));
        }

        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }
}

/// Explicit `schema { ... }` block, emitted only when a root type deviates
/// from its conventional name.
fn schema_block(schema: &SchemaGraph) -> Option<String> {
    let roots = [
        ("query", schema.query_type.as_deref(), "Query"),
        ("mutation", schema.mutation_type.as_deref(), "Mutation"),
        (
            "subscription",
            schema.subscription_type.as_deref(),
            "Subscription",
        ),
    ];
    if roots
        .iter()
        .all(|(_, name, conventional)| name.is_none() || *name == Some(conventional))
    {
        return None;
    }

    let mut block = String::from("schema {\n");
    for (operation, name, _) in roots {
        if let Some(name) = name {
            block.push_str(&format!("  {operation}: {name}\n"));
        }
    }
    block.push('}');
    Some(block)
}

fn directive_sdl(directive: &DirectiveDef) -> String {
    let mut out = String::new();
    push_description(&mut out, directive.description.as_deref(), "");
    out.push_str(&format!("directive @{}", directive.name));
    out.push_str(&arguments_sdl(&directive.args));
    if !directive.locations.is_empty() {
        out.push_str(&format!(" on {}", directive.locations.join(" | ")));
    }
    out
}

fn type_sdl(def: &TypeDef) -> String {
    match def {
        TypeDef::Scalar(scalar) => {
            let mut out = String::new();
            push_description(&mut out, scalar.description.as_deref(), "");
            out.push_str(&format!("scalar {}", scalar.name));
            out
        }
        TypeDef::Object(object) => fielded_type_sdl(
            "type",
            &object.name,
            object.description.as_deref(),
            &object.interfaces,
            &object.fields,
        ),
        TypeDef::Interface(interface) => fielded_type_sdl(
            "interface",
            &interface.name,
            interface.description.as_deref(),
            &interface.interfaces,
            &interface.fields,
        ),
        TypeDef::Union(union) => union_sdl(union),
        TypeDef::Enum(def) => enum_sdl(def),
        TypeDef::InputObject(input) => input_object_sdl(input),
    }
}

fn fielded_type_sdl(
    keyword: &str,
    name: &str,
    description: Option<&str>,
    interfaces: &[String],
    fields: &[Field],
) -> String {
    let mut out = String::new();
    push_description(&mut out, description, "");
    out.push_str(&format!("{keyword} {name}"));
    if !interfaces.is_empty() {
        out.push_str(&format!(" implements {}", interfaces.join(" & ")));
    }
    out.push_str(" {\n");
    for field in fields {
        push_description(&mut out, field.description.as_deref(), "  ");
        out.push_str(&format!("  {}", field.name));
        out.push_str(&arguments_sdl(&field.args));
        out.push_str(&format!(": {}", field.ty));
        out.push_str(&deprecated_sdl(&field.deprecation));
        out.push('\n');
    }
    out.push('}');
    out
}

fn union_sdl(union: &UnionType) -> String {
    let mut out = String::new();
    push_description(&mut out, union.description.as_deref(), "");
    out.push_str(&format!(
        "union {} = {}",
        union.name,
        union.types.join(" | ")
    ));
    out
}

fn enum_sdl(def: &EnumType) -> String {
    let mut out = String::new();
    push_description(&mut out, def.description.as_deref(), "");
    out.push_str(&format!("enum {} {{\n", def.name));
    for value in &def.values {
        push_description(&mut out, value.description.as_deref(), "  ");
        out.push_str(&format!("  {}", value.name));
        out.push_str(&deprecated_sdl(&value.deprecation));
        out.push('\n');
    }
    out.push('}');
    out
}

fn input_object_sdl(input: &InputObjectType) -> String {
    let mut out = String::new();
    push_description(&mut out, input.description.as_deref(), "");
    out.push_str(&format!("input {} {{\n", input.name));
    for field in &input.fields {
        push_description(&mut out, field.description.as_deref(), "  ");
        out.push_str(&format!("  {}\n", input_value_sdl(field)));
    }
    out.push('}');
    out
}

fn arguments_sdl(args: &[InputValue]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = args.iter().map(input_value_sdl).collect();
    format!("({})", rendered.join(", "))
}

fn input_value_sdl(value: &InputValue) -> String {
    match &value.default_value {
        Some(default) => format!("{}: {} = {}", value.name, value.ty, default.to_sdl()),
        None => format!("{}: {}", value.name, value.ty),
    }
}

fn deprecated_sdl(deprecation: &Deprecation) -> String {
    if !deprecation.is_deprecated {
        return String::new();
    }
    match &deprecation.reason {
        Some(reason) => format!(" @deprecated(reason: \"{}\")", reason.replace('"', "\\\"")),
        None => " @deprecated".to_owned(),
    }
}

fn push_description(out: &mut String, description: Option<&str>, indent: &str) {
    let Some(description) = description else {
        return;
    };
    if description.contains('\n') {
        out.push_str(&format!("{indent}\"\"\"\n"));
        for line in description.lines() {
            out.push_str(&format!("{indent}{line}\n"));
        }
        out.push_str(&format!("{indent}\"\"\"\n"));
    } else {
        out.push_str(&format!("{indent}\"\"\"{description}\"\"\"\n"));
    }
}

#[cfg(test)]
mod tests {
    use crate::loader::schema_from_sdl;
    use pretty_assertions::assert_eq;

    const SDL: &str = r#"
        "A person."
        type User implements Node {
          id: ID!
          "Display name."
          name: String @deprecated(reason: "Use fullName.")
        }

        interface Node {
          id: ID!
        }

        enum Sort {
          ASC
          DESC
        }

        input UserFilter {
          limit: Int = 10
        }

        directive @internal on FIELD_DEFINITION | OBJECT

        type Query {
          user(id: ID!): User
        }
    "#;

    #[test]
    fn test_to_sdl_is_deterministic() {
        let first = schema_from_sdl(SDL).unwrap().to_sdl();
        let second = schema_from_sdl(SDL).unwrap().to_sdl();
        assert_eq!(first, second);
    }

    #[test]
    fn test_to_sdl_round_trips_through_parser() {
        let sdl = schema_from_sdl(SDL).unwrap().to_sdl();
        let reparsed = schema_from_sdl(&sdl).unwrap();
        assert_eq!(reparsed.to_sdl(), sdl);
    }

    #[test]
    fn test_to_sdl_renders_type_shapes() {
        let sdl = schema_from_sdl(SDL).unwrap().to_sdl();

        assert!(sdl.contains("type User implements Node {"));
        assert!(sdl.contains("name: String @deprecated(reason: \"Use fullName.\")"));
        assert!(sdl.contains("enum Sort {"));
        assert!(sdl.contains("limit: Int = 10"));
        assert!(sdl.contains("directive @internal on FIELD_DEFINITION | OBJECT"));
        assert!(sdl.contains("user(id: ID!): User"));
    }

    #[test]
    fn test_to_sdl_skips_built_in_scalars() {
        let sdl = schema_from_sdl(SDL).unwrap().to_sdl();
        assert!(!sdl.contains("scalar String"));
        assert!(!sdl.contains("scalar ID"));
    }

    #[test]
    fn test_to_sdl_omits_conventional_schema_block() {
        let sdl = schema_from_sdl(SDL).unwrap().to_sdl();
        assert!(!sdl.contains("schema {"));
    }

    #[test]
    fn test_to_sdl_keeps_custom_root_names() {
        let schema = schema_from_sdl(
            r"
            schema {
              query: RootQuery
            }

            type RootQuery {
              ping: String
            }
            ",
        )
        .unwrap();
        let sdl = schema.to_sdl();
        assert!(sdl.contains("schema {\n  query: RootQuery\n}"));
    }

    #[test]
    fn test_to_sdl_renders_descriptions() {
        let sdl = schema_from_sdl(SDL).unwrap().to_sdl();
        assert!(sdl.contains("\"\"\"A person.\"\"\"\ntype User"));
        assert!(sdl.contains("  \"\"\"Display name.\"\"\"\n  name: String"));
    }
}
