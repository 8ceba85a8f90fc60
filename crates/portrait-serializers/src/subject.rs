//! The receiver schema keys are resolved against.

use indexmap::IndexMap;
use portrait_core::registry::{Object, Serializer};
use portrait_core::schema::Schema;
use portrait_core::value::Value;
use portrait_core::{Error, MethodLookupError, Result};

/// What a schema is being walked against.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
	/// An instance of a declared class.
	Object(&'a Object),
	/// A serializer wrapping a value.
	Serializer(&'a Serializer),
	/// A plain associative structure; keys are looked up directly.
	Map(&'a IndexMap<String, Value>),
}

impl<'a> Subject<'a> {
	/// Resolve the raw value for `key`.
	///
	/// An alias `key -> target` is tried first, unless the schema level being
	/// walked declares `target` itself. The literal `key` is tried next.
	///
	/// # Errors
	///
	/// [`Error::UndefinedMethod`] naming `key` when neither resolves; the
	/// first lookup failure is kept as its source.
	pub fn resolve(&self, key: &str, level: &Schema) -> Result<Value> {
		let alias = self
			.aliases()
			.and_then(|aliases| aliases.get(key))
			.filter(|target| !level.contains_key(target.as_str()));

		let mut first_failure = None;
		for method in alias.map(String::as_str).into_iter().chain([key]) {
			match self.lookup(method) {
				Ok(value) => return Ok(value),
				Err(failure) => {
					first_failure.get_or_insert(failure);
				}
			}
		}
		Err(Error::UndefinedMethod {
			key: key.to_string(),
			source: first_failure.unwrap_or_else(|| MethodLookupError::new(key, self.receiver())),
		})
	}

	/// Resolve `method` without alias handling.
	///
	/// Serializers resolve through their own methods, then declared context
	/// keys (absent entries are `null`), then the wrapped value.
	pub fn lookup(&self, method: &str) -> std::result::Result<Value, MethodLookupError> {
		match self {
			Subject::Object(object) => object.call(method),
			Subject::Map(map) => map
				.get(method)
				.cloned()
				.ok_or_else(|| MethodLookupError::new(method, "Map")),
			Subject::Serializer(serializer) => {
				let def = serializer.def();
				if let Some(compute) = def.method(method) {
					return Ok(compute(&serializer.scope()));
				}
				if def.declares_context(method) {
					return Ok(serializer.context().get(method).cloned().unwrap_or_default());
				}
				serializer.object().call(method)
			}
		}
	}

	pub fn responds_to(&self, method: &str) -> bool {
		match self {
			Subject::Object(object) => object.responds_to(method),
			Subject::Map(map) => map.contains_key(method),
			Subject::Serializer(serializer) => {
				serializer.def().method(method).is_some()
					|| serializer.def().declares_context(method)
					|| serializer.object().responds_to(method)
			}
		}
	}

	/// Class recorded in the skip-set while this subject's nested values expand.
	pub fn class_key(&self) -> Option<&'a str> {
		match self {
			Subject::Object(object) => Some(object.class_name()),
			Subject::Serializer(serializer) => serializer.class_name(),
			Subject::Map(_) => None,
		}
	}

	fn aliases(&self) -> Option<&'a IndexMap<String, String>> {
		match self {
			Subject::Object(object) => Some(object.class().aliases()),
			Subject::Serializer(serializer) => Some(serializer.def().aliases()),
			Subject::Map(_) => None,
		}
	}

	fn receiver(&self) -> String {
		match self {
			Subject::Object(object) => format!("#<{}>", object.class_name()),
			Subject::Serializer(serializer) => format!("#<{}>", serializer.def().name()),
			Subject::Map(_) => "Map".to_string(),
		}
	}
}
