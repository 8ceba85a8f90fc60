//! Immutable serialization settings and per-call overrides.

use portrait_core::ArgumentError;
use portrait_core::registry::DEFAULT_TAG;
use portrait_core::types::{BuiltinTypes, TypeSystem, type_system_by_name};
use std::fmt;
use std::sync::Arc;

/// Nesting level meaning "every namespace segment".
pub const DEFAULT_NESTING_LEVEL: usize = 666;

/// Serialization settings.
///
/// Never mutated in place: every `with_*` method returns a new value.
///
/// # Examples
///
/// ```
/// use portrait_conf::Config;
///
/// let config = Config::default().with_camelize(true).with_root("kitten");
/// assert!(config.camelize());
/// assert_eq!(config.root(), Some("kitten"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Config {
	camelize: bool,
	include_root: bool,
	include_namespaces: bool,
	root: Option<String>,
	namespaces_nesting_level: usize,
	type_system: Arc<dyn TypeSystem>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			camelize: false,
			include_root: false,
			include_namespaces: false,
			root: None,
			namespaces_nesting_level: DEFAULT_NESTING_LEVEL,
			type_system: Arc::new(BuiltinTypes),
		}
	}
}

impl Config {
	pub fn camelize(&self) -> bool {
		self.camelize
	}

	pub fn include_root(&self) -> bool {
		self.include_root
	}

	pub fn include_namespaces(&self) -> bool {
		self.include_namespaces
	}

	pub fn root(&self) -> Option<&str> {
		self.root.as_deref()
	}

	pub fn namespaces_nesting_level(&self) -> usize {
		self.namespaces_nesting_level
	}

	pub fn type_system(&self) -> &Arc<dyn TypeSystem> {
		&self.type_system
	}

	/// Namespace wrapping applies when requested explicitly or implied by a
	/// non-default nesting level.
	pub fn is_namespaced(&self) -> bool {
		self.include_namespaces || self.namespaces_nesting_level != DEFAULT_NESTING_LEVEL
	}

	pub fn with_camelize(mut self, camelize: bool) -> Self {
		self.camelize = camelize;
		self
	}

	pub fn with_include_root(mut self, include_root: bool) -> Self {
		self.include_root = include_root;
		self
	}

	pub fn with_include_namespaces(mut self, include_namespaces: bool) -> Self {
		self.include_namespaces = include_namespaces;
		self
	}

	pub fn with_root(mut self, root: impl Into<String>) -> Self {
		self.root = Some(root.into());
		self
	}

	pub fn without_root(mut self) -> Self {
		self.root = None;
		self
	}

	pub fn with_namespaces_nesting_level(mut self, level: usize) -> Self {
		self.namespaces_nesting_level = level;
		self
	}

	pub fn with_type_system(mut self, type_system: impl TypeSystem + 'static) -> Self {
		self.type_system = Arc::new(type_system);
		self
	}

	/// Check the invariants every configuration must hold.
	///
	/// # Errors
	///
	/// - [`ArgumentError::InvalidRoot`] if `root` is blank
	/// - [`ArgumentError::InvalidNestingLevel`] if the nesting level is zero
	pub fn validate(&self) -> Result<(), ArgumentError> {
		if let Some(root) = &self.root
			&& root.trim().is_empty()
		{
			return Err(ArgumentError::InvalidRoot {
				found: format!("{root:?}"),
			});
		}
		if self.namespaces_nesting_level == 0 {
			return Err(ArgumentError::InvalidNestingLevel {
				found: self.namespaces_nesting_level.to_string(),
			});
		}
		Ok(())
	}

	/// Derive the configuration for one call.
	///
	/// Every option that is set overrides the corresponding setting; unset
	/// options inherit it. The result is validated before it is returned.
	///
	/// # Examples
	///
	/// ```
	/// use portrait_conf::{Config, Options};
	///
	/// let defaults = Config::default().with_camelize(true);
	/// let merged = defaults.merge(&Options::new().include_root(true)).unwrap();
	/// assert!(merged.camelize());
	/// assert!(merged.include_root());
	///
	/// assert!(defaults.merge(&Options::new().namespaces_nesting_level(0)).is_err());
	/// ```
	pub fn merge(&self, options: &Options) -> Result<Config, ArgumentError> {
		let merged = Config {
			camelize: options.camelize.unwrap_or(self.camelize),
			include_root: options.include_root.unwrap_or(self.include_root),
			include_namespaces: options
				.include_namespaces
				.unwrap_or(self.include_namespaces),
			root: options.root.clone().or_else(|| self.root.clone()),
			namespaces_nesting_level: options
				.namespaces_nesting_level
				.unwrap_or(self.namespaces_nesting_level),
			type_system: options
				.type_system
				.clone()
				.unwrap_or_else(|| Arc::clone(&self.type_system)),
		};
		merged.validate()?;
		Ok(merged)
	}
}

impl fmt::Debug for Config {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("camelize", &self.camelize)
			.field("include_root", &self.include_root)
			.field("include_namespaces", &self.include_namespaces)
			.field("root", &self.root)
			.field("namespaces_nesting_level", &self.namespaces_nesting_level)
			.field("type_system", &self.type_system.name())
			.finish()
	}
}

impl PartialEq for Config {
	fn eq(&self, other: &Self) -> bool {
		self.camelize == other.camelize
			&& self.include_root == other.include_root
			&& self.include_namespaces == other.include_namespaces
			&& self.root == other.root
			&& self.namespaces_nesting_level == other.namespaces_nesting_level
			&& self.type_system.name() == other.type_system.name()
	}
}

/// Per-call overrides of a [`Config`].
///
/// Unset options inherit the active configuration.
#[derive(Debug, Clone, Default)]
pub struct Options {
	pub camelize: Option<bool>,
	pub include_root: Option<bool>,
	pub include_namespaces: Option<bool>,
	pub root: Option<String>,
	pub namespaces_nesting_level: Option<usize>,
	pub type_system: Option<Arc<dyn TypeSystem>>,
	/// Serializer tag used for the call.
	pub tag: Option<String>,
}

impl Options {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn camelize(mut self, camelize: bool) -> Self {
		self.camelize = Some(camelize);
		self
	}

	pub fn include_root(mut self, include_root: bool) -> Self {
		self.include_root = Some(include_root);
		self
	}

	pub fn include_namespaces(mut self, include_namespaces: bool) -> Self {
		self.include_namespaces = Some(include_namespaces);
		self
	}

	pub fn root(mut self, root: impl Into<String>) -> Self {
		self.root = Some(root.into());
		self
	}

	pub fn namespaces_nesting_level(mut self, level: usize) -> Self {
		self.namespaces_nesting_level = Some(level);
		self
	}

	pub fn type_system(mut self, type_system: impl TypeSystem + 'static) -> Self {
		self.type_system = Some(Arc::new(type_system));
		self
	}

	pub fn tag(mut self, tag: impl Into<String>) -> Self {
		self.tag = Some(tag.into());
		self
	}

	/// The requested serializer tag, [`DEFAULT_TAG`] when unset.
	pub fn tag_or_default(&self) -> &str {
		self.tag.as_deref().unwrap_or(DEFAULT_TAG)
	}
}

impl TryFrom<&serde_json::Value> for Options {
	type Error = ArgumentError;

	/// Parse options arriving as untyped JSON.
	///
	/// # Examples
	///
	/// ```
	/// use portrait_conf::Options;
	/// use serde_json::json;
	///
	/// let options = Options::try_from(&json!({"camelize": true, "root": "kitten"})).unwrap();
	/// assert_eq!(options.camelize, Some(true));
	///
	/// assert!(Options::try_from(&json!({"camelize": "yes"})).is_err());
	/// assert!(Options::try_from(&json!({"namespaces_nesting_level": 0})).is_err());
	/// ```
	fn try_from(json: &serde_json::Value) -> Result<Self, Self::Error> {
		let serde_json::Value::Object(map) = json else {
			return Err(ArgumentError::NotAMapping(json.to_string()));
		};

		let mut options = Options::new();
		for (key, value) in map {
			match key.as_str() {
				"camelize" => options.camelize = parse_bool(key, value)?,
				"include_root" => options.include_root = parse_bool(key, value)?,
				"include_namespaces" => options.include_namespaces = parse_bool(key, value)?,
				"root" => options.root = parse_root(value)?,
				"namespaces_nesting_level" => {
					options.namespaces_nesting_level = parse_nesting_level(value)?
				}
				"type_system" => options.type_system = parse_type_system(value)?,
				"tag" => options.tag = parse_tag(value)?,
				other => return Err(ArgumentError::UnknownOption(other.to_string())),
			}
		}
		Ok(options)
	}
}

fn parse_bool(option: &str, value: &serde_json::Value) -> Result<Option<bool>, ArgumentError> {
	match value {
		serde_json::Value::Null => Ok(None),
		serde_json::Value::Bool(b) => Ok(Some(*b)),
		other => Err(ArgumentError::NotBoolean {
			option: option.to_string(),
			found: other.to_string(),
		}),
	}
}

fn parse_root(value: &serde_json::Value) -> Result<Option<String>, ArgumentError> {
	match value {
		serde_json::Value::Null => Ok(None),
		serde_json::Value::String(root) if !root.trim().is_empty() => Ok(Some(root.clone())),
		other => Err(ArgumentError::InvalidRoot {
			found: other.to_string(),
		}),
	}
}

fn parse_nesting_level(value: &serde_json::Value) -> Result<Option<usize>, ArgumentError> {
	if value.is_null() {
		return Ok(None);
	}
	value
		.as_u64()
		.filter(|level| *level > 0)
		.and_then(|level| usize::try_from(level).ok())
		.map(Some)
		.ok_or_else(|| ArgumentError::InvalidNestingLevel {
			found: value.to_string(),
		})
}

fn parse_type_system(
	value: &serde_json::Value,
) -> Result<Option<Arc<dyn TypeSystem>>, ArgumentError> {
	match value {
		serde_json::Value::Null => Ok(None),
		serde_json::Value::String(name) => type_system_by_name(name)
			.map(Some)
			.ok_or_else(|| ArgumentError::UnknownTypeSystem(name.clone())),
		other => Err(ArgumentError::UnknownTypeSystem(other.to_string())),
	}
}

fn parse_tag(value: &serde_json::Value) -> Result<Option<String>, ArgumentError> {
	match value {
		serde_json::Value::Null => Ok(None),
		serde_json::Value::String(tag) if !tag.is_empty() => Ok(Some(tag.clone())),
		other => Err(ArgumentError::InvalidTag {
			found: other.to_string(),
		}),
	}
}
