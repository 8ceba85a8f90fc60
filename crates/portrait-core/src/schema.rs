//! Declared schemas: ordered mappings of output keys to types.

use crate::error::{Error, Result};
use crate::types::TypeDescriptor;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// The value side of a schema entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
	/// A leaf, resolved through an accessor and checked against the descriptor.
	Leaf(TypeDescriptor),
	/// A nested schema, walked recursively.
	Nested(Schema),
}

impl From<TypeDescriptor> for SchemaNode {
	fn from(descriptor: TypeDescriptor) -> Self {
		SchemaNode::Leaf(descriptor)
	}
}

impl From<Schema> for SchemaNode {
	fn from(schema: Schema) -> Self {
		SchemaNode::Nested(schema)
	}
}

/// An ordered mapping from output key to type descriptor or nested schema.
///
/// Declaration order is preserved and becomes the field order of the output.
///
/// # Examples
///
/// ```
/// use portrait_core::schema::Schema;
/// use portrait_core::types::TypeDescriptor;
///
/// let schema = Schema::new()
///     .field("foo", TypeDescriptor::Integer)
///     .nested("nested", Schema::new().field("left", TypeDescriptor::String));
///
/// assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["foo", "nested"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
	entries: IndexMap<String, SchemaNode>,
}

impl Schema {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a leaf entry.
	pub fn field(mut self, key: impl Into<String>, descriptor: impl Into<TypeDescriptor>) -> Self {
		self.entries
			.insert(key.into(), SchemaNode::Leaf(descriptor.into()));
		self
	}

	/// Add a nested schema entry.
	pub fn nested(mut self, key: impl Into<String>, schema: Schema) -> Self {
		self.entries.insert(key.into(), SchemaNode::Nested(schema));
		self
	}

	/// Add an entry of either kind.
	pub fn entry(mut self, key: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
		self.entries.insert(key.into(), node.into());
		self
	}

	pub fn get(&self, key: &str) -> Option<&SchemaNode> {
		self.entries.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Parse a schema declared as JSON.
	///
	/// Leaves are type names understood by [`TypeDescriptor::from_name`];
	/// nested objects become nested schemas.
	///
	/// # Examples
	///
	/// ```
	/// use portrait_core::schema::Schema;
	/// use serde_json::json;
	///
	/// let schema = Schema::from_json(&json!({
	///     "name": "String",
	///     "stats": { "age": "Integer" }
	/// }))
	/// .unwrap();
	/// assert_eq!(schema.len(), 2);
	///
	/// assert!(Schema::from_json(&json!("String")).is_err());
	/// ```
	pub fn from_json(json: &serde_json::Value) -> Result<Self> {
		let serde_json::Value::Object(map) = json else {
			return Err(Error::InvalidSchema {
				reason: format!("schema should be defined as a mapping, got {}", json_kind(json)),
			});
		};
		let mut schema = Schema::new();
		for (key, value) in map {
			let node = match value {
				serde_json::Value::String(name) => {
					let descriptor =
						TypeDescriptor::from_name(name).ok_or_else(|| Error::InvalidSchema {
							reason: format!("unknown type `{name}` for key `{key}`"),
						})?;
					SchemaNode::Leaf(descriptor)
				}
				serde_json::Value::Object(_) => SchemaNode::Nested(Schema::from_json(value)?),
				other => {
					return Err(Error::InvalidSchema {
						reason: format!(
							"key `{key}` should map to a type name or a nested schema, got {}",
							json_kind(other)
						),
					});
				}
			};
			schema.entries.insert(key.clone(), node);
		}
		Ok(schema)
	}
}

fn json_kind(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "a boolean",
		serde_json::Value::Number(_) => "a number",
		serde_json::Value::String(_) => "a string",
		serde_json::Value::Array(_) => "an array",
		serde_json::Value::Object(_) => "a mapping",
	}
}

impl Serialize for SchemaNode {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			SchemaNode::Leaf(descriptor) => descriptor.serialize(serializer),
			SchemaNode::Nested(schema) => schema.serialize(serializer),
		}
	}
}

impl Serialize for Schema {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (key, node) in &self.entries {
			map.serialize_entry(key, node)?;
		}
		map.end()
	}
}

impl<'a> IntoIterator for &'a Schema {
	type Item = (&'a String, &'a SchemaNode);
	type IntoIter = indexmap::map::Iter<'a, String, SchemaNode>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

/// Declare a [`Schema`] inline.
///
/// Leaves take any expression convertible into a
/// [`TypeDescriptor`]; braces open a nested schema.
///
/// # Examples
///
/// ```
/// use portrait_core::schema;
/// use portrait_core::types::TypeDescriptor as T;
///
/// let schema = schema! {
///     foo: T::Integer,
///     bar: T::Array,
///     nested: {
///         left: T::String,
///         right: T::Bool,
///     },
/// };
///
/// assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["foo", "bar", "nested"]);
/// ```
#[macro_export]
macro_rules! schema {
	(@entries $schema:expr;) => {
		$schema
	};
	(@entries $schema:expr; $key:ident : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
		$crate::schema!(
			@entries $schema.nested(stringify!($key), $crate::schema!($($inner)*));
			$($($rest)*)?
		)
	};
	(@entries $schema:expr; $key:ident : $ty:expr $(, $($rest:tt)*)?) => {
		$crate::schema!(
			@entries $schema.field(stringify!($key), $ty);
			$($($rest)*)?
		)
	};
	() => {
		$crate::schema::Schema::new()
	};
	($($body:tt)+) => {
		$crate::schema!(@entries $crate::schema::Schema::new(); $($body)+)
	};
}
