//! Type systems: validation and coercion of resolved values.
//!
//! A type system exposes two operations, [`TypeSystem::check_type`] and
//! [`TypeSystem::coerce`]. The engine treats the active system
//! polymorphically; any type implementing the trait can be plugged into the
//! configuration.
//!
//! Two systems ship with Portrait:
//!
//! - [`BuiltinTypes`]: nullable-by-default, never coerces
//! - [`ComposableTypes`]: strict, delegates custom descriptors to their
//!   [`TypeSpec`] (optional, constrained and coercible types)

pub mod builtin;
pub mod composable;

pub use builtin::BuiltinTypes;
pub use composable::{ComposableTypes, compose};

use crate::value::Value;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Failure of a type check, carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
	message: String,
}

impl TypeMismatch {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	/// The standard "Expected <descriptor>, got <runtime type>" mismatch.
	pub fn expected(expected: impl fmt::Display, value: &Value) -> Self {
		Self::new(format!("Expected {}, got {}", expected, value.type_name()))
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

impl fmt::Display for TypeMismatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)
	}
}

impl std::error::Error for TypeMismatch {}

/// A pluggable validation and coercion system.
pub trait TypeSystem: fmt::Debug + Send + Sync {
	/// Name used in dynamic configuration (`"builtin"`, `"composable"`).
	fn name(&self) -> &str;

	/// Check that `value` satisfies `descriptor`.
	fn check_type(&self, value: &Value, descriptor: &TypeDescriptor) -> Result<(), TypeMismatch>;

	/// Transform a value that already passed [`check_type`](Self::check_type).
	fn coerce(&self, value: Value, _descriptor: &TypeDescriptor) -> Value {
		value
	}
}

/// A self-describing type understood by pluggable type systems.
pub trait TypeSpec: fmt::Debug + Send + Sync {
	/// Human-readable type name, used in mismatch messages.
	fn name(&self) -> String;

	fn check(&self, value: &Value) -> Result<(), TypeMismatch>;

	fn coerce(&self, value: Value) -> Value {
		value
	}
}

/// Token describing the expected type of a schema leaf.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
	/// Always passes, never coerces.
	Any,
	/// Passes only for literal `true` or `false`.
	Bool,
	Null,
	String,
	Integer,
	Float,
	/// Integer or float.
	Numeric,
	Array,
	Map,
	/// An object whose class is, or inherits from, the named class.
	Instance(String),
	/// A type defined by a pluggable type library.
	Custom(Arc<dyn TypeSpec>),
}

impl TypeDescriptor {
	pub fn instance(class: impl Into<String>) -> Self {
		TypeDescriptor::Instance(class.into())
	}

	pub fn custom(spec: impl TypeSpec + 'static) -> Self {
		TypeDescriptor::Custom(Arc::new(spec))
	}

	/// Parse a descriptor from its name, as used by dynamic schemas.
	///
	/// Builtin names are recognized directly; any other capitalized path
	/// (`Zoo::Animals::Cat`) names an instance type.
	///
	/// # Examples
	///
	/// ```
	/// use portrait_core::types::TypeDescriptor;
	///
	/// assert_eq!(TypeDescriptor::from_name("Integer"), Some(TypeDescriptor::Integer));
	/// assert_eq!(TypeDescriptor::from_name("Hash"), Some(TypeDescriptor::Map));
	/// assert_eq!(
	///     TypeDescriptor::from_name("Zoo::Cat"),
	///     Some(TypeDescriptor::instance("Zoo::Cat"))
	/// );
	/// assert_eq!(TypeDescriptor::from_name("not a type"), None);
	/// ```
	pub fn from_name(name: &str) -> Option<Self> {
		let descriptor = match name {
			"Any" => TypeDescriptor::Any,
			"Bool" | "Boolean" => TypeDescriptor::Bool,
			"Null" | "Nil" | "NilClass" => TypeDescriptor::Null,
			"String" => TypeDescriptor::String,
			"Integer" => TypeDescriptor::Integer,
			"Float" => TypeDescriptor::Float,
			"Numeric" => TypeDescriptor::Numeric,
			"Array" => TypeDescriptor::Array,
			"Map" | "Hash" => TypeDescriptor::Map,
			other if is_class_path(other) => TypeDescriptor::Instance(other.to_string()),
			_ => return None,
		};
		Some(descriptor)
	}

	/// Structural match of a value against a builtin descriptor.
	///
	/// `Any` and custom descriptors are handled by the type systems.
	pub(crate) fn matches_kind(&self, value: &Value) -> bool {
		match (self, value) {
			(TypeDescriptor::Any, _) => true,
			(TypeDescriptor::Bool, Value::Bool(_)) => true,
			(TypeDescriptor::Null, Value::Null) => true,
			(TypeDescriptor::String, Value::String(_)) => true,
			(TypeDescriptor::Integer, Value::Integer(_)) => true,
			(TypeDescriptor::Float, Value::Float(_)) => true,
			(TypeDescriptor::Numeric, Value::Integer(_) | Value::Float(_)) => true,
			(TypeDescriptor::Array, Value::Array(_)) => true,
			(TypeDescriptor::Map, Value::Map(_)) => true,
			(TypeDescriptor::Instance(class), Value::Object(object)) => object.is_a(class),
			_ => false,
		}
	}
}

fn is_class_path(name: &str) -> bool {
	!name.is_empty()
		&& name.split("::").all(|segment| {
			let mut chars = segment.chars();
			chars.next().is_some_and(|c| c.is_ascii_uppercase())
				&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		})
}

impl fmt::Display for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TypeDescriptor::Any => f.write_str("Any"),
			TypeDescriptor::Bool => f.write_str("Bool"),
			TypeDescriptor::Null => f.write_str("Null"),
			TypeDescriptor::String => f.write_str("String"),
			TypeDescriptor::Integer => f.write_str("Integer"),
			TypeDescriptor::Float => f.write_str("Float"),
			TypeDescriptor::Numeric => f.write_str("Numeric"),
			TypeDescriptor::Array => f.write_str("Array"),
			TypeDescriptor::Map => f.write_str("Map"),
			TypeDescriptor::Instance(class) => f.write_str(class),
			TypeDescriptor::Custom(spec) => f.write_str(&spec.name()),
		}
	}
}

impl PartialEq for TypeDescriptor {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(TypeDescriptor::Instance(a), TypeDescriptor::Instance(b)) => a == b,
			(TypeDescriptor::Custom(a), TypeDescriptor::Custom(b)) => Arc::ptr_eq(a, b),
			_ => std::mem::discriminant(self) == std::mem::discriminant(other),
		}
	}
}

impl Serialize for TypeDescriptor {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// Look up a shipped type system by name.
///
/// # Examples
///
/// ```
/// use portrait_core::types::type_system_by_name;
///
/// assert_eq!(type_system_by_name("composable").unwrap().name(), "composable");
/// assert!(type_system_by_name("dry").is_none());
/// ```
pub fn type_system_by_name(name: &str) -> Option<Arc<dyn TypeSystem>> {
	match name {
		"builtin" => Some(Arc::new(BuiltinTypes)),
		"composable" => Some(Arc::new(ComposableTypes)),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("Any", TypeDescriptor::Any)]
	#[case("Boolean", TypeDescriptor::Bool)]
	#[case("NilClass", TypeDescriptor::Null)]
	#[case("Numeric", TypeDescriptor::Numeric)]
	#[case("Hash", TypeDescriptor::Map)]
	#[case("Animals::Cat", TypeDescriptor::instance("Animals::Cat"))]
	fn test_from_name(#[case] name: &str, #[case] expected: TypeDescriptor) {
		assert_eq!(TypeDescriptor::from_name(name), Some(expected));
	}

	#[rstest]
	#[case("")]
	#[case("integer")]
	#[case("Animals::")]
	#[case("Big Cat")]
	fn test_from_name_rejects_non_types(#[case] name: &str) {
		assert_eq!(TypeDescriptor::from_name(name), None);
	}

	#[rstest]
	fn test_display_uses_descriptor_names() {
		assert_eq!(TypeDescriptor::Integer.to_string(), "Integer");
		assert_eq!(TypeDescriptor::instance("Zoo::Cat").to_string(), "Zoo::Cat");
		assert_eq!(
			compose::optional(compose::strict(TypeDescriptor::String)).to_string(),
			"Optional<Strict<String>>"
		);
	}

	#[rstest]
	fn test_type_mismatch_expected_message() {
		let mismatch = TypeMismatch::expected(TypeDescriptor::Integer, &Value::from("string"));
		assert_eq!(mismatch.message(), "Expected Integer, got String");
	}
}
