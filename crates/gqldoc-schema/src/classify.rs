//! Schema classification.
//!
//! [`SchemaMap::of`] partitions every named element of a [`SchemaGraph`]
//! into the fixed documentation categories. Root operation fields are pulled
//! from the field maps of the root types; everything else is bucketed by its
//! runtime kind after excluding the root type names themselves and meta
//! (`__`-prefixed) names.

use crate::types::{DirectiveDef, Field, SchemaGraph, TypeDef};

/// Prefix reserved for introspection meta types.
const META_PREFIX: &str = "__";

/// Conventional root type names, used when a schema has no explicit
/// `schema { ... }` block.
const CONVENTIONAL_ROOTS: [&str; 3] = ["Query", "Mutation", "Subscription"];

/// The fixed documentation categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Queries,
    Mutations,
    Subscriptions,
    Directives,
    Objects,
    Unions,
    Interfaces,
    Enums,
    Inputs,
    Scalars,
}

impl Category {
    /// All categories, in classification order.
    pub const ALL: [Self; 10] = [
        Self::Queries,
        Self::Mutations,
        Self::Subscriptions,
        Self::Directives,
        Self::Objects,
        Self::Unions,
        Self::Interfaces,
        Self::Enums,
        Self::Inputs,
        Self::Scalars,
    ];

    /// Lowercase category name, used for directory names and link paths.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queries => "queries",
            Self::Mutations => "mutations",
            Self::Subscriptions => "subscriptions",
            Self::Directives => "directives",
            Self::Objects => "objects",
            Self::Unions => "unions",
            Self::Interfaces => "interfaces",
            Self::Enums => "enums",
            Self::Inputs => "inputs",
            Self::Scalars => "scalars",
        }
    }

    /// Category of a named type, determined by its runtime kind.
    #[must_use]
    pub fn of_type(def: &TypeDef) -> Self {
        match def {
            TypeDef::Scalar(_) => Self::Scalars,
            TypeDef::Object(_) => Self::Objects,
            TypeDef::Interface(_) => Self::Interfaces,
            TypeDef::Union(_) => Self::Unions,
            TypeDef::Enum(_) => Self::Enums,
            TypeDef::InputObject(_) => Self::Inputs,
        }
    }
}

/// A documentable element: a named type, a directive definition, or a root
/// operation field.
#[derive(Clone, Copy, Debug)]
pub enum SchemaElement<'a> {
    /// A field of one of the root operation types.
    Operation(&'a Field),
    /// A directive definition.
    Directive(&'a DirectiveDef),
    /// A named type.
    Type(&'a TypeDef),
}

impl<'a> SchemaElement<'a> {
    /// Display name of the element.
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            Self::Operation(field) => &field.name,
            Self::Directive(directive) => &directive.name,
            Self::Type(def) => def.name(),
        }
    }

    /// Description, when present.
    #[must_use]
    pub fn description(&self) -> Option<&'a str> {
        match self {
            Self::Operation(field) => field.description.as_deref(),
            Self::Directive(directive) => directive.description.as_deref(),
            Self::Type(def) => def.description(),
        }
    }
}

/// The classified view of a schema: one entry per category, holding that
/// category's elements.
///
/// Absent root types and empty categories are represented as empty entries,
/// never as errors.
pub struct SchemaMap<'a> {
    entries: Vec<(Category, Vec<SchemaElement<'a>>)>,
}

impl<'a> SchemaMap<'a> {
    /// Classify every named element of `schema`.
    #[must_use]
    pub fn of(schema: &'a SchemaGraph) -> Self {
        let roots = resolved_roots(schema);

        let mut objects = Vec::new();
        let mut unions = Vec::new();
        let mut interfaces = Vec::new();
        let mut enums = Vec::new();
        let mut inputs = Vec::new();
        let mut scalars = Vec::new();

        for def in schema.types() {
            let name = def.name();
            if name.starts_with(META_PREFIX) || roots.contains(&Some(name)) {
                continue;
            }
            let bucket = match def {
                TypeDef::Object(_) => &mut objects,
                TypeDef::Union(_) => &mut unions,
                TypeDef::Interface(_) => &mut interfaces,
                TypeDef::Enum(_) => &mut enums,
                TypeDef::InputObject(_) => &mut inputs,
                TypeDef::Scalar(_) => &mut scalars,
            };
            bucket.push(SchemaElement::Type(def));
        }

        let directives = schema
            .directives()
            .iter()
            .map(SchemaElement::Directive)
            .collect();

        let entries = vec![
            (Category::Queries, root_fields(schema, roots[0])),
            (Category::Mutations, root_fields(schema, roots[1])),
            (Category::Subscriptions, root_fields(schema, roots[2])),
            (Category::Directives, directives),
            (Category::Objects, objects),
            (Category::Unions, unions),
            (Category::Interfaces, interfaces),
            (Category::Enums, enums),
            (Category::Inputs, inputs),
            (Category::Scalars, scalars),
        ];
        tracing::debug!(
            types = entries.iter().map(|(_, e)| e.len()).sum::<usize>(),
            "classified schema elements"
        );
        Self { entries }
    }

    /// All category entries, in classification order.
    #[must_use]
    pub fn entries(&self) -> &[(Category, Vec<SchemaElement<'a>>)] {
        &self.entries
    }

    /// Elements of one category.
    #[must_use]
    pub fn category(&self, category: Category) -> &[SchemaElement<'a>] {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(&[], |(_, elements)| elements.as_slice())
    }
}

/// Root type names after falling back to the conventional names for roots
/// the schema did not declare explicitly.
fn resolved_roots(schema: &SchemaGraph) -> [Option<&str>; 3] {
    [
        resolve_root(schema, schema.query_type.as_ref(), CONVENTIONAL_ROOTS[0]),
        resolve_root(schema, schema.mutation_type.as_ref(), CONVENTIONAL_ROOTS[1]),
        resolve_root(
            schema,
            schema.subscription_type.as_ref(),
            CONVENTIONAL_ROOTS[2],
        ),
    ]
}

fn resolve_root<'a>(
    schema: &'a SchemaGraph,
    explicit: Option<&'a String>,
    conventional: &'static str,
) -> Option<&'a str> {
    explicit.map(String::as_str).or_else(|| {
        schema
            .get_type(conventional)
            .is_some()
            .then_some(conventional)
    })
}

/// Operation fields of a root type, or empty when the root is absent.
fn root_fields<'a>(schema: &'a SchemaGraph, root: Option<&str>) -> Vec<SchemaElement<'a>> {
    schema.root_object(root).map_or_else(Vec::new, |object| {
        object.fields.iter().map(SchemaElement::Operation).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::schema_from_sdl;

    const SDL: &str = r#"
        "A person."
        type User implements Node {
          id: ID!
          name: String
        }

        interface Node {
          id: ID!
        }

        union SearchResult = User

        enum Sort {
          ASC
          DESC
        }

        input UserFilter {
          name: String
        }

        scalar DateTime

        directive @internal on FIELD_DEFINITION

        type Query {
          user(id: ID!): User
        }

        type Mutation {
          createUser(name: String!): User
        }
    "#;

    fn names<'a>(elements: &[SchemaElement<'a>]) -> Vec<&'a str> {
        elements.iter().map(SchemaElement::name).collect()
    }

    #[test]
    fn test_types_partitioned_by_kind() {
        let schema = schema_from_sdl(SDL).unwrap();
        let map = SchemaMap::of(&schema);

        assert_eq!(names(map.category(Category::Objects)), vec!["User"]);
        assert_eq!(names(map.category(Category::Unions)), vec!["SearchResult"]);
        assert_eq!(names(map.category(Category::Interfaces)), vec!["Node"]);
        assert_eq!(names(map.category(Category::Enums)), vec!["Sort"]);
        assert_eq!(names(map.category(Category::Inputs)), vec!["UserFilter"]);
    }

    #[test]
    fn test_root_types_excluded_from_objects() {
        let schema = schema_from_sdl(SDL).unwrap();
        let map = SchemaMap::of(&schema);

        let objects = names(map.category(Category::Objects));
        assert!(!objects.contains(&"Query"));
        assert!(!objects.contains(&"Mutation"));
    }

    #[test]
    fn test_operations_extracted_from_root_fields() {
        let schema = schema_from_sdl(SDL).unwrap();
        let map = SchemaMap::of(&schema);

        assert_eq!(names(map.category(Category::Queries)), vec!["user"]);
        assert_eq!(names(map.category(Category::Mutations)), vec!["createUser"]);
        assert!(map.category(Category::Subscriptions).is_empty());
    }

    #[test]
    fn test_custom_root_name_excluded() {
        let sdl = r"
            schema {
              query: RootQuery
            }

            type RootQuery {
              ping: String
            }
        ";
        let schema = schema_from_sdl(sdl).unwrap();
        let map = SchemaMap::of(&schema);

        assert_eq!(names(map.category(Category::Queries)), vec!["ping"]);
        assert!(!names(map.category(Category::Objects)).contains(&"RootQuery"));
    }

    #[test]
    fn test_directives_listed() {
        let schema = schema_from_sdl(SDL).unwrap();
        let map = SchemaMap::of(&schema);

        assert_eq!(names(map.category(Category::Directives)), vec!["internal"]);
    }

    #[test]
    fn test_built_in_scalars_are_documented() {
        let schema = schema_from_sdl(SDL).unwrap();
        let map = SchemaMap::of(&schema);

        let scalars = names(map.category(Category::Scalars));
        assert!(scalars.contains(&"DateTime"));
        assert!(scalars.contains(&"String"));
    }

    #[test]
    fn test_empty_schema_yields_empty_categories() {
        let schema = SchemaGraph::default();
        let map = SchemaMap::of(&schema);

        for category in Category::ALL {
            assert!(map.category(category).is_empty(), "{category:?}");
        }
        assert_eq!(map.entries().len(), Category::ALL.len());
    }
}
