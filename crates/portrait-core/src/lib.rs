//! # portrait-core
//!
//! Foundational types for Portrait, a declarative object-to-JSON serializer.
//!
//! A class declares a [`Schema`](schema::Schema) (an ordered mapping of output
//! keys to [`TypeDescriptor`](types::TypeDescriptor)s or nested schemas) and
//! binds each key to an accessor. The engine in `portrait-serializers` walks
//! the schema against an [`Object`](registry::Object), validates every value
//! with the active [`TypeSystem`](types::TypeSystem) and assembles the output.
//!
//! This crate holds everything the engine consumes:
//!
//! - **Values**: the runtime [`Value`](value::Value) returned by accessors
//! - **Type systems**: [`BuiltinTypes`](types::BuiltinTypes) and the pluggable
//!   [`ComposableTypes`](types::ComposableTypes)
//! - **Schemas**: declaration, the [`schema!`] macro and dynamic (JSON) schemas
//! - **Registry**: per-class schema, aliases, delegation and tagged serializers
//! - **Casing**: `camelize`, `underscore` and namespace splitting
//! - **Errors**: the shared [`Error`] taxonomy
//!
//! ## Examples
//!
//! ```
//! use portrait_core::registry::Class;
//! use portrait_core::schema;
//! use portrait_core::types::TypeDescriptor as T;
//!
//! struct Note {
//!     foo: i64,
//! }
//!
//! let notes = Class::<Note>::builder("Note")
//!     .schema(schema! { foo: T::Integer })
//!     .method("foo", |note: &Note| note.foo)
//!     .build()
//!     .unwrap();
//!
//! let note = notes.instance(Note { foo: 4 });
//! assert_eq!(note.class_name(), "Note");
//! assert!(note.responds_to("foo"));
//! ```

pub mod casing;
pub mod error;
pub mod registry;
pub mod schema;
pub mod types;
pub mod value;

pub use error::{ArgumentError, Error, MethodLookupError, Result};
pub use registry::{
	Class, ClassBuilder, ClassDef, DEFAULT_TAG, Object, SchemaStorage, Serializer,
	SerializerBuilder, SerializerDef, SerializerScope,
};
pub use schema::{Schema, SchemaNode};
pub use types::{BuiltinTypes, ComposableTypes, TypeDescriptor, TypeMismatch, TypeSpec, TypeSystem};
pub use value::Value;
