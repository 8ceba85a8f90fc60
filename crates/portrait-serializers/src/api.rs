//! Top-level serialization entry points.
//!
//! Each call merges its [`Options`] over the process-wide defaults once, then
//! hands the resulting [`Config`] to the engine explicitly.

use crate::context::SerializationContext;
use crate::subject::Subject;
use crate::walker::walk;
use crate::wrapper::finish;
use portrait_conf::{Config, Options, merged};
use portrait_core::registry::{Object, Serializer};
use portrait_core::value::Value;
use portrait_core::{Error, Result};
use serde_json::Value as Json;

/// Build the wrapped output mapping of `object`.
///
/// # Examples
///
/// ```
/// use portrait_conf::Options;
/// use portrait_core::registry::Class;
/// use portrait_core::schema;
/// use portrait_core::types::TypeDescriptor as T;
/// use serde_json::json;
///
/// struct Kitten {
///     name: &'static str,
/// }
///
/// let kittens = Class::<Kitten>::builder("Kitten")
///     .schema(schema! { name: T::String })
///     .method("name", |kitten: &Kitten| kitten.name)
///     .build()
///     .unwrap();
/// let kitten = kittens.instance(Kitten { name: "Tom" });
///
/// let json = portrait_serializers::build_schema_with(
///     &kitten,
///     &portrait_conf::Config::default().with_include_root(true),
///     "default",
/// )
/// .unwrap();
/// assert_eq!(json, json!({"kitten": {"name": "Tom"}}));
/// ```
pub fn build_schema(object: &Object, options: &Options) -> Result<Json> {
	let config = merged(options)?;
	build_schema_with(object, &config, options.tag_or_default())
}

/// [`build_schema`] against an explicit configuration and serializer tag.
pub fn build_schema_with(object: &Object, config: &Config, tag: &str) -> Result<Json> {
	tracing::debug!(class = object.class_name(), tag, "building schema");

	if let Some(def) = object.class().find_serializer(tag)? {
		return build_serializer_with(&def.wrap(object), config);
	}

	let schema = object.resolve_schema()?;
	let mut ctx = SerializationContext::new(config);
	let map = walk(&schema, Subject::Object(object), &mut ctx)?;
	finish(map, Some(object.class_name()), config)
}

/// Serialize `object` to JSON text.
pub fn serialize(object: &Object, options: &Options) -> Result<String> {
	Ok(serde_json::to_string(&build_schema(object, options)?)?)
}

/// Build the output of a serializer.
///
/// A serializer over a collection builds every element with the same
/// definition and context.
pub fn build_serializer(serializer: &Serializer, options: &Options) -> Result<Json> {
	let config = merged(options)?;
	build_serializer_with(serializer, &config)
}

/// [`build_serializer`] against an explicit configuration.
pub fn build_serializer_with(serializer: &Serializer, config: &Config) -> Result<Json> {
	tracing::debug!(serializer = serializer.def().name(), "building serializer");

	if let Some(items) = serializer_items(serializer.object()) {
		return items
			.into_iter()
			.map(|item| build_serializer_with(&serializer.rewrap(item), config))
			.collect::<Result<Vec<_>>>()
			.map(Json::Array);
	}

	let mut ctx = SerializationContext::new(config);
	let map = walk(serializer.def().schema(), Subject::Serializer(serializer), &mut ctx)?;
	finish(map, serializer.class_name(), config)
}

fn serializer_items(object: &Value) -> Option<Vec<Value>> {
	match object {
		Value::Array(items) => Some(items.clone()),
		Value::Object(object) if !object.is_schema_bearing() => object.iter(),
		_ => None,
	}
}

/// Build the output of every element of `collection`, in iteration order.
///
/// # Errors
///
/// - [`Error::InvalidCollection`] if `collection` is neither an array nor an
///   iterable object
/// - [`Error::UnknownSchema`] for elements that are not objects
pub fn build_collection(collection: &Value, options: &Options) -> Result<Json> {
	let config = merged(options)?;
	build_collection_with(collection, &config, options.tag_or_default())
}

/// [`build_collection`] against an explicit configuration and serializer tag.
pub fn build_collection_with(collection: &Value, config: &Config, tag: &str) -> Result<Json> {
	let items = match collection {
		Value::Array(items) => items.clone(),
		Value::Object(object) => object.iter().ok_or_else(|| Error::InvalidCollection {
			found: object.class_name().to_string(),
		})?,
		other => {
			return Err(Error::InvalidCollection {
				found: other.type_name(),
			});
		}
	};
	tracing::debug!(len = items.len(), tag, "building collection");

	items
		.iter()
		.map(|item| match item {
			Value::Object(object) => build_schema_with(object, config, tag),
			other => Err(Error::UnknownSchema {
				class: other.type_name(),
			}),
		})
		.collect::<Result<Vec<_>>>()
		.map(Json::Array)
}

/// Serialize every element of `collection` to a JSON array.
pub fn serialize_collection(collection: &Value, options: &Options) -> Result<String> {
	Ok(serde_json::to_string(&build_collection(collection, options)?)?)
}

/// Types that can serialize themselves.
pub trait Serializable {
	/// Build the wrapped output mapping.
	fn build_schema(&self, options: &Options) -> Result<Json>;

	/// Serialize to JSON text.
	fn serialize(&self, options: &Options) -> Result<String> {
		Ok(serde_json::to_string(&self.build_schema(options)?)?)
	}
}

impl Serializable for Object {
	fn build_schema(&self, options: &Options) -> Result<Json> {
		build_schema(self, options)
	}
}

impl Serializable for Serializer {
	fn build_schema(&self, options: &Options) -> Result<Json> {
		build_serializer(self, options)
	}
}
