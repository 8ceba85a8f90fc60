//! A strict type system with composable, self-describing types.
//!
//! Descriptors built with [`compose`] carry their own check and coercion
//! logic, so schemas can express optional, constrained and coercible fields.

use super::{TypeDescriptor, TypeMismatch, TypeSpec, TypeSystem};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Strict type checking for composable descriptors.
///
/// Unlike [`BuiltinTypes`](super::BuiltinTypes), `Null` only satisfies `Any`,
/// `Null` and optional types. Custom descriptors check and coerce themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposableTypes;

impl TypeSystem for ComposableTypes {
	fn name(&self) -> &str {
		"composable"
	}

	fn check_type(&self, value: &Value, descriptor: &TypeDescriptor) -> Result<(), TypeMismatch> {
		check_strict(descriptor, value)
	}

	fn coerce(&self, value: Value, descriptor: &TypeDescriptor) -> Value {
		coerce_strict(descriptor, value)
	}
}

fn check_strict(descriptor: &TypeDescriptor, value: &Value) -> Result<(), TypeMismatch> {
	match descriptor {
		TypeDescriptor::Custom(spec) => spec.check(value),
		other if other.matches_kind(value) => Ok(()),
		other => Err(TypeMismatch::expected(other, value)),
	}
}

fn coerce_strict(descriptor: &TypeDescriptor, value: Value) -> Value {
	match descriptor {
		TypeDescriptor::Custom(spec) => spec.coerce(value),
		_ => value,
	}
}

/// Constructors for composable descriptors.
///
/// # Examples
///
/// ```
/// use portrait_core::types::{ComposableTypes, TypeDescriptor, TypeSystem, compose};
/// use portrait_core::value::Value;
///
/// let age = compose::optional(compose::coercible_integer());
/// let types = ComposableTypes;
///
/// assert!(types.check_type(&Value::Null, &age).is_ok());
/// assert_eq!(types.coerce(Value::from("42"), &age), Value::from(42));
/// ```
pub mod compose {
	use super::*;

	/// The descriptor with strict (non-nullable) semantics.
	pub fn strict(inner: TypeDescriptor) -> TypeDescriptor {
		TypeDescriptor::Custom(Arc::new(Strict(inner)))
	}

	/// Accepts `Null` in addition to whatever `inner` accepts.
	pub fn optional(inner: TypeDescriptor) -> TypeDescriptor {
		TypeDescriptor::Custom(Arc::new(Optional(inner)))
	}

	/// Accepts values of `inner` for which `predicate` holds.
	pub fn constrained<F>(inner: TypeDescriptor, description: impl Into<String>, predicate: F) -> TypeDescriptor
	where
		F: Fn(&Value) -> bool + Send + Sync + 'static,
	{
		TypeDescriptor::Custom(Arc::new(Constrained {
			inner,
			description: description.into(),
			predicate: Arc::new(predicate),
		}))
	}

	/// Accepts any scalar and coerces it to a string.
	pub fn coercible_string() -> TypeDescriptor {
		TypeDescriptor::Custom(Arc::new(Coercible::String))
	}

	/// Accepts integers, integral floats and numeric strings; coerces to an integer.
	pub fn coercible_integer() -> TypeDescriptor {
		TypeDescriptor::Custom(Arc::new(Coercible::Integer))
	}

	/// Accepts numbers and numeric strings; coerces to a float.
	pub fn coercible_float() -> TypeDescriptor {
		TypeDescriptor::Custom(Arc::new(Coercible::Float))
	}
}

#[derive(Debug)]
struct Strict(TypeDescriptor);

impl TypeSpec for Strict {
	fn name(&self) -> String {
		format!("Strict<{}>", self.0)
	}

	fn check(&self, value: &Value) -> Result<(), TypeMismatch> {
		check_strict(&self.0, value).map_err(|_| TypeMismatch::expected(self.name(), value))
	}

	fn coerce(&self, value: Value) -> Value {
		coerce_strict(&self.0, value)
	}
}

#[derive(Debug)]
struct Optional(TypeDescriptor);

impl TypeSpec for Optional {
	fn name(&self) -> String {
		format!("Optional<{}>", self.0)
	}

	fn check(&self, value: &Value) -> Result<(), TypeMismatch> {
		if value.is_null() {
			return Ok(());
		}
		check_strict(&self.0, value).map_err(|_| TypeMismatch::expected(self.name(), value))
	}

	fn coerce(&self, value: Value) -> Value {
		if value.is_null() {
			value
		} else {
			coerce_strict(&self.0, value)
		}
	}
}

struct Constrained {
	inner: TypeDescriptor,
	description: String,
	predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl fmt::Debug for Constrained {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Constrained")
			.field("inner", &self.inner)
			.field("description", &self.description)
			.finish_non_exhaustive()
	}
}

impl TypeSpec for Constrained {
	fn name(&self) -> String {
		format!("{} ({})", self.inner, self.description)
	}

	fn check(&self, value: &Value) -> Result<(), TypeMismatch> {
		check_strict(&self.inner, value)?;
		// Constraints see the coerced value, so "18" passes `coercible_integer() >= 18`.
		let coerced = coerce_strict(&self.inner, value.clone());
		if (self.predicate)(&coerced) {
			Ok(())
		} else {
			Err(TypeMismatch::new(format!(
				"Expected {}, got {} violating the constraint",
				self.name(),
				value.type_name()
			)))
		}
	}

	fn coerce(&self, value: Value) -> Value {
		coerce_strict(&self.inner, value)
	}
}

#[derive(Debug, Clone, Copy)]
enum Coercible {
	String,
	Integer,
	Float,
}

impl Coercible {
	fn target(self) -> &'static str {
		match self {
			Coercible::String => "String",
			Coercible::Integer => "Integer",
			Coercible::Float => "Float",
		}
	}
}

impl TypeSpec for Coercible {
	fn name(&self) -> String {
		format!("Coercible<{}>", self.target())
	}

	fn check(&self, value: &Value) -> Result<(), TypeMismatch> {
		let accepted = match (self, value) {
			(Coercible::String, Value::String(_) | Value::Integer(_) | Value::Float(_) | Value::Bool(_)) => true,
			(Coercible::Integer, Value::Integer(_)) => true,
			(Coercible::Integer, Value::Float(f)) => {
				f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f)
			}
			(Coercible::Integer, Value::String(s)) => s.trim().parse::<i64>().is_ok(),
			(Coercible::Float, Value::Integer(_) | Value::Float(_)) => true,
			(Coercible::Float, Value::String(s)) => s.trim().parse::<f64>().is_ok(),
			_ => false,
		};
		if accepted {
			Ok(())
		} else {
			Err(TypeMismatch::expected(self.name(), value))
		}
	}

	fn coerce(&self, value: Value) -> Value {
		match (self, value) {
			(Coercible::String, Value::Integer(i)) => Value::String(i.to_string()),
			(Coercible::String, Value::Float(f)) => Value::String(format!("{f:?}")),
			(Coercible::String, Value::Bool(b)) => Value::String(b.to_string()),
			(Coercible::Integer, Value::Float(f)) => Value::Integer(f as i64),
			(Coercible::Integer, Value::String(s)) => match s.trim().parse::<i64>() {
				Ok(i) => Value::Integer(i),
				Err(_) => Value::String(s),
			},
			(Coercible::Float, Value::Integer(i)) => Value::Float(i as f64),
			(Coercible::Float, Value::String(s)) => match s.trim().parse::<f64>() {
				Ok(f) => Value::Float(f),
				Err(_) => Value::String(s),
			},
			(_, value) => value,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_null_fails_plain_descriptors() {
		// Act
		let err = ComposableTypes
			.check_type(&Value::Null, &TypeDescriptor::String)
			.unwrap_err();

		// Assert
		assert_eq!(err.message(), "Expected String, got Null");
	}

	#[rstest]
	fn test_optional_accepts_null() {
		let descriptor = compose::optional(TypeDescriptor::String);

		assert!(ComposableTypes.check_type(&Value::Null, &descriptor).is_ok());
		assert!(ComposableTypes.check_type(&Value::from("x"), &descriptor).is_ok());
		let err = ComposableTypes
			.check_type(&Value::from(1), &descriptor)
			.unwrap_err();
		assert_eq!(err.message(), "Expected Optional<String>, got Integer");
	}

	#[rstest]
	#[case(Value::from("42"), Value::from(42))]
	#[case(Value::from(" 7 "), Value::from(7))]
	#[case(Value::from(3.0), Value::from(3))]
	#[case(Value::from(5), Value::from(5))]
	fn test_coercible_integer(#[case] input: Value, #[case] expected: Value) {
		// Arrange
		let descriptor = compose::coercible_integer();

		// Act
		ComposableTypes.check_type(&input, &descriptor).unwrap();
		let coerced = ComposableTypes.coerce(input, &descriptor);

		// Assert
		assert_eq!(coerced, expected);
	}

	#[rstest]
	#[case(Value::from("forty-two"))]
	#[case(Value::from(2.5))]
	#[case(Value::from(1e20))]
	#[case(Value::from(-1e19))]
	#[case(Value::from(f64::INFINITY))]
	#[case(Value::Null)]
	fn test_coercible_integer_rejects(#[case] input: Value) {
		assert!(
			ComposableTypes
				.check_type(&input, &compose::coercible_integer())
				.is_err()
		);
	}

	#[rstest]
	fn test_coercible_string_stringifies_scalars() {
		let descriptor = compose::coercible_string();

		assert_eq!(ComposableTypes.coerce(Value::from(12), &descriptor), Value::from("12"));
		assert_eq!(ComposableTypes.coerce(Value::from(true), &descriptor), Value::from("true"));
		assert_eq!(ComposableTypes.coerce(Value::from(1.0), &descriptor), Value::from("1.0"));
		assert_eq!(ComposableTypes.coerce(Value::from(2.5), &descriptor), Value::from("2.5"));
		assert!(ComposableTypes.check_type(&Value::from(vec![1]), &descriptor).is_err());
	}

	#[rstest]
	fn test_constrained_checks_coerced_value() {
		// Arrange
		let adult = compose::constrained(compose::coercible_integer(), "gteq 18", |value| {
			value.as_i64().is_some_and(|age| age >= 18)
		});

		// Act / Assert
		assert!(ComposableTypes.check_type(&Value::from("21"), &adult).is_ok());
		assert_eq!(ComposableTypes.coerce(Value::from("21"), &adult), Value::from(21));
		let err = ComposableTypes
			.check_type(&Value::from(12), &adult)
			.unwrap_err();
		assert_eq!(
			err.message(),
			"Expected Coercible<Integer> (gteq 18), got Integer violating the constraint"
		);
	}

	#[rstest]
	fn test_strict_wraps_builtin_descriptor() {
		let descriptor = compose::strict(TypeDescriptor::Bool);

		assert!(ComposableTypes.check_type(&Value::from(false), &descriptor).is_ok());
		let err = ComposableTypes
			.check_type(&Value::Null, &descriptor)
			.unwrap_err();
		assert_eq!(err.message(), "Expected Strict<Bool>, got Null");
	}
}
