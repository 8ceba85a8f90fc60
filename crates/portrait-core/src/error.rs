//! Error taxonomy shared by every Portrait crate.
//!
//! Every failure aborts the serialization call that raised it; there is no
//! partial output. Each kind is a distinct variant so callers can catch the
//! ones they are prepared for.

use thiserror::Error;

/// Result type for Portrait operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while declaring schemas or serializing objects.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
	/// No schema could be resolved through declaration, delegation or inheritance.
	#[error("Can't serialize {class} - no schema was provided")]
	UnknownSchema { class: String },

	/// The declared schema is not a mapping, or one of its leaves is not a type.
	#[error("Invalid schema: {reason}")]
	InvalidSchema { reason: String },

	/// Aliases were not declared as a mapping of output keys to method names.
	#[error("Aliases should be defined as a mapping of keys to method names, got {found}")]
	InvalidAliases { found: String },

	/// The delegation target can't produce a schema.
	#[error("Can't delegate serialization of {class} to {target}: {target} declares no schema")]
	InvalidSchemaDelegation { class: String, target: String },

	/// A schema key has no accessor reachable from the instance.
	#[error(
		"{source}. You have probably defined a key `{key}` in the schema that doesn't have a corresponding method"
	)]
	UndefinedMethod {
		key: String,
		source: MethodLookupError,
	},

	/// A resolved value failed the active type system's check.
	#[error("Wrong type for key `{key}`. {message}.")]
	InvalidType { key: String, message: String },

	/// Root or namespace wrapping was requested without a class name.
	#[error("Can't wrap schema in root key - class name was not passed")]
	UnknownRoot,

	/// A non-default serializer tag was requested but never registered.
	#[error("The tag specified ({tag}) has no corresponding serializer")]
	UnknownTag { tag: String },

	/// A collection operation received something that can't be iterated.
	#[error("Can't serialize collection - {found} is not iterable")]
	InvalidCollection { found: String },

	/// An instance-level schema was attached to a class with class-scoped storage.
	#[error("Can't attach a schema to an instance of {class}: schema storage is class-scoped")]
	InstanceSchemaNotAllowed { class: String },

	/// A configuration option was rejected.
	#[error(transparent)]
	InvalidArgument(#[from] ArgumentError),

	/// JSON encoding failed.
	#[error("JSON encoding failed: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// The schema key this error is about, if any.
	pub fn key(&self) -> Option<&str> {
		match self {
			Error::UndefinedMethod { key, .. } | Error::InvalidType { key, .. } => Some(key),
			_ => None,
		}
	}

	pub fn is_unknown_schema(&self) -> bool {
		matches!(self, Error::UnknownSchema { .. })
	}

	pub fn is_undefined_method(&self) -> bool {
		matches!(self, Error::UndefinedMethod { .. })
	}

	pub fn is_invalid_type(&self) -> bool {
		matches!(self, Error::InvalidType { .. })
	}

	pub fn is_invalid_argument(&self) -> bool {
		matches!(self, Error::InvalidArgument(_))
	}
}

/// Failure to find an accessor on a receiver.
///
/// Kept as the [`source`](std::error::Error::source) of
/// [`Error::UndefinedMethod`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("undefined method `{method}` for {receiver}")]
pub struct MethodLookupError {
	pub method: String,
	pub receiver: String,
}

impl MethodLookupError {
	pub fn new(method: impl Into<String>, receiver: impl Into<String>) -> Self {
		Self {
			method: method.into(),
			receiver: receiver.into(),
		}
	}
}

/// Invalid configuration arguments, raised before any schema walking begins.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
	#[error("Expected `{option}` to be either true, false or nil, got {found}")]
	NotBoolean { option: String, found: String },

	#[error("Expected namespaces nesting level to be a positive integer, got: {found}")]
	InvalidNestingLevel { found: String },

	#[error("Expected `root` to be a non-empty string, or symbol, got: {found}")]
	InvalidRoot { found: String },

	#[error("Expected `tag` to be a non-empty string, got: {found}")]
	InvalidTag { found: String },

	#[error("Unknown option `{0}`")]
	UnknownOption(String),

	#[error("Unknown type system `{0}`")]
	UnknownTypeSystem(String),

	#[error("Expected options to be a mapping, got {0}")]
	NotAMapping(String),
}
