//! GraphQL schema object graph for gqldoc.
//!
//! This crate owns everything that happens before documents are rendered:
//!
//! - [`SchemaGraph`]: a validated, navigable in-memory representation of a
//!   GraphQL schema (types, root operations, directives)
//! - [`load_schema`]: three interchangeable loader strategies (SDL file,
//!   introspection over HTTP, introspection JSON file) all normalizing into
//!   one [`SchemaGraph`]
//! - [`SchemaMap`]: the classifier partitioning named elements into the
//!   fixed documentation categories
//! - [`SchemaGraph::to_sdl`]: deterministic canonical SDL serialization,
//!   used by the change-detection gate for fingerprints and snapshots
//!
//! The graph is read-only to consumers; the rendering pipeline only ever
//! borrows from it.

mod classify;
mod introspection;
mod loader;
mod sdl;
mod types;

pub use classify::{Category, SchemaElement, SchemaMap};
pub use loader::{LoaderError, load_schema, schema_from_sdl};
pub use types::{
    BUILT_IN_SCALARS, Deprecation, DirectiveDef, EnumType, EnumValue, Field, InputObjectType,
    InputValue, InterfaceType, ObjectType, ScalarType, SchemaGraph, TypeDef, TypeRef, UnionType,
    Value,
};
