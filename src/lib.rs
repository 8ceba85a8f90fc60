//! # Portrait
//!
//! Declarative object-to-JSON serialization.
//!
//! A class declares a schema: an ordered mapping of output keys to type
//! descriptors or nested schemas. Serializing an instance walks that schema,
//! resolves each key through the instance's bound methods, checks the value
//! against the active type system and produces a JSON document.
//!
//! ## Features
//!
//! - Nested schemas, resolved against the same instance or an association
//! - Builtin and composable type systems, selectable per call
//! - Key camelization, explicit roots and class-derived root or namespace keys
//! - Aliases, schema delegation and inheritance
//! - Serializer classes with their own methods, context and tags
//! - Self-reference detection that nulls out repeated classes
//! - Process-wide defaults with per-call overrides
//!
//! ## Quick Example
//!
//! ```rust
//! use portrait::prelude::*;
//! use serde_json::json;
//!
//! struct Cat {
//!     name: &'static str,
//!     lives_left: i64,
//! }
//!
//! let cats = Class::<Cat>::builder("Zoo::Cat")
//!     .schema(schema! {
//!         name: T::String,
//!         stats: { lives_left: T::Integer },
//!     })
//!     .method("name", |cat: &Cat| cat.name)
//!     .method("lives_left", |cat: &Cat| cat.lives_left)
//!     .build()
//!     .unwrap();
//! let cat = cats.instance(Cat { name: "Tom", lives_left: 9 });
//!
//! let options = Options::new().camelize(true).include_root(true);
//! assert_eq!(
//!     cat.build_schema(&options).unwrap(),
//!     json!({"cat": {"name": "Tom", "stats": {"livesLeft": 9}}})
//! );
//! ```

pub mod conf;
pub mod core;
pub mod serializers;

pub use portrait_conf::{Config, Options, configure, configure_with};
pub use portrait_core::{
	ArgumentError, Class, Error, Object, Result, Schema, SerializerDef, TypeDescriptor, Value,
	schema,
};
pub use portrait_serializers::{
	Serializable, build_collection, build_schema, build_serializer, serialize,
	serialize_collection,
};

/// Everything needed to declare classes and serialize them.
pub mod prelude {
	pub use crate::{
		Class, Config, Error, Object, Options, Result, Schema, Serializable, SerializerDef, Value,
		build_collection, build_schema, build_serializer, configure, configure_with, schema,
		serialize, serialize_collection,
	};
	pub use portrait_core::registry::SerializerScope;
	pub use portrait_core::types::{TypeDescriptor as T, compose};
}
