//! Runtime values returned by accessors.
//!
//! Accessors produce a [`Value`]; the engine type-checks it, coerces it and
//! either expands it (objects and collections of objects) or converts it to
//! JSON as-is.

use crate::error::MethodLookupError;
use crate::registry::Object;
use indexmap::IndexMap;
use std::fmt;

/// A value produced by an accessor.
#[derive(Clone, Default)]
pub enum Value {
	#[default]
	Null,
	Bool(bool),
	Integer(i64),
	Float(f64),
	String(String),
	Array(Vec<Value>),
	Map(IndexMap<String, Value>),
	Object(Object),
}

impl Value {
	/// Build a map value from key/value pairs, preserving their order.
	///
	/// # Examples
	///
	/// ```
	/// use portrait_core::value::Value;
	///
	/// let map = Value::map([("name", "Alice"), ("city", "Paris")]);
	/// assert_eq!(map.type_name(), "Map");
	/// ```
	pub fn map<K, V, I>(entries: I) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
		I: IntoIterator<Item = (K, V)>,
	{
		Value::Map(
			entries
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}

	/// Runtime type name, as reported in type mismatch messages.
	///
	/// Objects report their qualified class name.
	pub fn type_name(&self) -> String {
		match self {
			Value::Null => "Null".to_string(),
			Value::Bool(_) => "Bool".to_string(),
			Value::Integer(_) => "Integer".to_string(),
			Value::Float(_) => "Float".to_string(),
			Value::String(_) => "String".to_string(),
			Value::Array(_) => "Array".to_string(),
			Value::Map(_) => "Map".to_string(),
			Value::Object(object) => object.class_name().to_string(),
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Integer(i) => Some(*i as f64),
			Value::Float(f) => Some(*f),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Value::Object(object) => Some(object),
			_ => None,
		}
	}

	/// Whether this value is an object that can build its own schema.
	pub fn is_schema_bearing(&self) -> bool {
		self.as_object().is_some_and(Object::is_schema_bearing)
	}

	/// Resolve `method` against this value.
	///
	/// Objects invoke their bound accessor; maps look the key up directly.
	/// Any other value has no methods.
	pub fn call(&self, method: &str) -> Result<Value, MethodLookupError> {
		match self {
			Value::Object(object) => object.call(method),
			Value::Map(map) => map
				.get(method)
				.cloned()
				.ok_or_else(|| MethodLookupError::new(method, "Map")),
			other => Err(MethodLookupError::new(method, other.type_name())),
		}
	}

	pub fn responds_to(&self, method: &str) -> bool {
		match self {
			Value::Object(object) => object.responds_to(method),
			Value::Map(map) => map.contains_key(method),
			_ => false,
		}
	}

	/// Elements of a collection-like value: arrays and iterable objects.
	pub fn collection_items(&self) -> Option<Vec<Value>> {
		match self {
			Value::Array(items) => Some(items.clone()),
			Value::Object(object) => object.iter(),
			_ => None,
		}
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("Null"),
			Value::Bool(b) => write!(f, "Bool({b})"),
			Value::Integer(i) => write!(f, "Integer({i})"),
			Value::Float(x) => write!(f, "Float({x})"),
			Value::String(s) => write!(f, "String({s:?})"),
			Value::Array(items) => f.debug_list().entries(items).finish(),
			Value::Map(map) => f.debug_map().entries(map).finish(),
			Value::Object(object) => write!(f, "Object(#<{}>)", object.class_name()),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Integer(a), Value::Integer(b)) => a == b,
			(Value::Float(a), Value::Float(b)) => a == b,
			(Value::String(a), Value::String(b)) => a == b,
			(Value::Array(a), Value::Array(b)) => a == b,
			(Value::Map(a), Value::Map(b)) => a == b,
			(Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
			_ => false,
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

macro_rules! impl_from_integer {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Value::Integer(i64::from(value))
				}
			}
		)*
	};
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		i64::try_from(value)
			.map(Value::Integer)
			.unwrap_or(Value::Float(value as f64))
	}
}

impl From<usize> for Value {
	fn from(value: usize) -> Self {
		i64::try_from(value)
			.map(Value::Integer)
			.unwrap_or(Value::Float(value as f64))
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Value::Float(f64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<&String> for Value {
	fn from(value: &String) -> Self {
		Value::String(value.clone())
	}
}

impl From<()> for Value {
	fn from(_: ()) -> Self {
		Value::Null
	}
}

impl From<Object> for Value {
	fn from(value: Object) -> Self {
		Value::Object(value)
	}
}

impl From<&Object> for Value {
	fn from(value: &Object) -> Self {
		Value::Object(value.clone())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(value: Vec<T>) -> Self {
		Value::Array(value.into_iter().map(Into::into).collect())
	}
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
	fn from(value: &[T]) -> Self {
		Value::Array(value.iter().cloned().map(Into::into).collect())
	}
}

impl<V: Into<Value>> From<IndexMap<String, V>> for Value {
	fn from(value: IndexMap<String, V>) -> Self {
		Value::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Integer(i),
				None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Array(items) => {
				Value::Array(items.into_iter().map(Value::from).collect())
			}
			serde_json::Value::Object(map) => {
				Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
			}
		}
	}
}

impl FromIterator<Value> for Value {
	fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
		Value::Array(iter.into_iter().collect())
	}
}
