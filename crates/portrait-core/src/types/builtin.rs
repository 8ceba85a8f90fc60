//! The default, nullable-by-default type system.

use super::{TypeDescriptor, TypeMismatch, TypeSystem};
use crate::value::Value;

/// Builtin type checking.
///
/// - `Any` always passes
/// - any other descriptor passes for `Null` (every field may be omitted)
/// - `Bool` passes only for `true` / `false`
/// - other descriptors pass when the value is of the described kind
///
/// Custom descriptors are checked by their own [`TypeSpec`](super::TypeSpec),
/// after the null policy above. Values are never coerced.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTypes;

impl TypeSystem for BuiltinTypes {
	fn name(&self) -> &str {
		"builtin"
	}

	fn check_type(&self, value: &Value, descriptor: &TypeDescriptor) -> Result<(), TypeMismatch> {
		if matches!(descriptor, TypeDescriptor::Any) || value.is_null() {
			return Ok(());
		}
		if let TypeDescriptor::Custom(spec) = descriptor {
			return spec.check(value);
		}
		if descriptor.matches_kind(value) {
			Ok(())
		} else {
			Err(TypeMismatch::expected(descriptor, value))
		}
	}
}
