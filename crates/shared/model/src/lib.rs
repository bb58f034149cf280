//! # Object Graph Model
//!
//! The data side of the runtime: metadata-carrying values, symbolic references,
//! the schema of types and enumerations, the arena-backed object graph, the
//! per-call object registry and the attribute resolver.
//!
//! Objects are created first and wired afterwards, so documents with forward
//! references and cycles are built by handle:
//!
//! ```rust
//! use rune_model::{FieldDef, Graph, Navigable, Reference, ScalarKind, Schema, TypeDef};
//!
//! let schema = Schema::builder("demo")
//!     .data_type(
//!         TypeDef::new("Node")
//!             .field(FieldDef::scalar("name", ScalarKind::String))
//!             .field(FieldDef::object("next", "Node")),
//!     )
//!     .build()?;
//!
//! let mut graph = Graph::new(schema);
//! let a = graph.create("Node")?;
//! let b = graph.create("Node")?;
//! graph.set_meta(a, rune_model::Meta::default().with_key(rune_model::KeyKind::Internal, "a"))?;
//! graph.set(a, "name", "first")?;
//! graph.set(a, "next", b)?;
//! graph.set(b, "name", "second")?;
//! graph.set(b, "next", Reference::new("a"))?;
//! graph.resolve_references()?;
//!
//! let names = graph.object(a)?.path("next.next.name")?;
//! assert_eq!(names.scalars()[0].as_str(), Some("first"));
//! # Ok::<(), rune_model::ModelError>(())
//! ```

mod condition;
mod error;
mod graph;
mod meta;
mod reference;
mod registry;
mod resolver;
mod scalar;
mod schema;

pub use condition::{Check, ChoiceKind, ChoiceRule, Condition, Phase, Predicate, Scope};
pub use error::{ModelError, ModelErrorExt};
pub use graph::{DataObject, Document, FieldDraft, Graph, ObjectId, ObjectRef, Value};
pub use meta::{Meta, WithMeta};
pub use reference::{Handle, Reference, Resolution, ValueLoc};
pub use registry::ObjectRegistry;
pub use resolver::{Item, Navigable, Necessity, Projection, resolve};
pub use rune_domain::roles::{KeyKind, MetaRoles};
pub use scalar::{EnumValue, Scalar, ScalarKind};
pub use schema::{Cardinality, EnumDef, FieldDef, Schema, SchemaBuilder, TypeDef, ValueKind};
