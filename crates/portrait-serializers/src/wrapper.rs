//! Key transformation and root/namespace wrapping of resolved mappings.

use portrait_conf::Config;
use portrait_core::casing::{camelize, extract_class, namespace_keys, underscore};
use portrait_core::{Error, Result};
use serde_json::{Map, Value as Json};

/// Camelize every mapping key, recursively through arrays.
pub fn camelize_keys(value: Json) -> Json {
	match value {
		Json::Object(map) => Json::Object(
			map.into_iter()
				.map(|(key, value)| (camelize(&key, false), camelize_keys(value)))
				.collect(),
		),
		Json::Array(items) => Json::Array(items.into_iter().map(camelize_keys).collect()),
		other => other,
	}
}

/// Wrap a resolved mapping according to `config`.
///
/// Precedence: an explicit `root` wraps under that key; without wrapping
/// options the value is returned as is; otherwise a class name is needed,
/// used for namespace wrapping (outermost segment first) or, with
/// `include_root`, for the unqualified root key.
///
/// # Errors
///
/// - [`Error::UnknownRoot`] if wrapping needs `class_name` and none is given
/// - [`Error::InvalidArgument`] for a zero namespace nesting level
///
/// # Examples
///
/// ```
/// use portrait_conf::Config;
/// use portrait_serializers::wrapper::wrap;
/// use serde_json::json;
///
/// let config = Config::default().with_include_namespaces(true);
/// let wrapped = wrap(json!({"age": 2}), Some("Zoo::Cat"), &config).unwrap();
/// assert_eq!(wrapped, json!({"zoo": {"cat": {"age": 2}}}));
/// ```
pub fn wrap(value: Json, class_name: Option<&str>, config: &Config) -> Result<Json> {
	if let Some(root) = config.root() {
		return Ok(single(cased(root, config.camelize()), value));
	}
	if !config.is_namespaced() && !config.include_root() {
		return Ok(value);
	}

	let class = class_name.ok_or(Error::UnknownRoot)?;
	if config.is_namespaced() {
		let keys = namespace_keys(class, config.camelize(), config.namespaces_nesting_level())?;
		return Ok(keys.into_iter().rev().fold(value, |inner, key| single(key, inner)));
	}
	Ok(single(cased(&extract_class(class), config.camelize()), value))
}

/// Camelize (when enabled) then wrap a resolved mapping.
pub fn finish(map: Map<String, Json>, class_name: Option<&str>, config: &Config) -> Result<Json> {
	let mut value = Json::Object(map);
	if config.camelize() {
		value = camelize_keys(value);
	}
	wrap(value, class_name, config)
}

fn cased(key: &str, camelize_keys: bool) -> String {
	if camelize_keys {
		camelize(key, false)
	} else {
		underscore(key)
	}
}

fn single(key: String, value: Json) -> Json {
	let mut map = Map::with_capacity(1);
	map.insert(key, value);
	Json::Object(map)
}
