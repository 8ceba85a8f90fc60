//! # portrait-serializers
//!
//! The Portrait engine: walks a declared schema against an instance,
//! resolves and validates every value, and wraps the resulting mapping.
//!
//! ## Pipeline
//!
//! 1. Merge the call's options over the process-wide defaults
//! 2. Resolve the schema: tagged serializer, own, delegated or inherited
//! 3. Walk it, assigning each leaf through the active type system and
//!    expanding nested records and collections; a call-scoped skip-set breaks
//!    self-references
//! 4. Camelize keys and wrap the mapping in root or namespace keys
//!
//! ## Example
//!
//! ```rust
//! use portrait_conf::Options;
//! use portrait_core::registry::Class;
//! use portrait_core::schema;
//! use portrait_core::types::TypeDescriptor as T;
//! use portrait_serializers::{build_schema, serialize};
//! use serde_json::json;
//!
//! struct Note;
//!
//! let notes = Class::<Note>::builder("Note")
//!     .schema(schema! {
//!         foo: T::Integer,
//!         bar: T::Array,
//!         nested: { left: T::String, right: T::Bool },
//!     })
//!     .method("foo", |_: &Note| 4)
//!     .method("bar", |_: &Note| vec![1, 3, 5])
//!     .method("left", |_: &Note| "left")
//!     .method("right", |_: &Note| true)
//!     .build()
//!     .unwrap();
//! let note = notes.instance(Note);
//!
//! assert_eq!(
//!     build_schema(&note, &Options::new()).unwrap(),
//!     json!({"foo": 4, "bar": [1, 3, 5], "nested": {"left": "left", "right": true}})
//! );
//! assert_eq!(
//!     serialize(&note, &Options::new().root("note")).unwrap(),
//!     r#"{"note":{"foo":4,"bar":[1,3,5],"nested":{"left":"left","right":true}}}"#
//! );
//! ```

pub mod api;
pub mod assign;
pub mod context;
pub mod subject;
pub mod walker;
pub mod wrapper;

pub use api::{
	Serializable, build_collection, build_collection_with, build_schema, build_schema_with,
	build_serializer, build_serializer_with, serialize, serialize_collection,
};
pub use context::SerializationContext;
pub use subject::Subject;
