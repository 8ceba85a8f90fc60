//! Value assignment: resolve, check, coerce and expand one schema leaf.

use crate::context::SerializationContext;
use crate::subject::Subject;
use crate::walker::walk;
use portrait_core::registry::{DEFAULT_TAG, Object};
use portrait_core::schema::Schema;
use portrait_core::types::TypeDescriptor;
use portrait_core::value::Value;
use portrait_core::{Error, Result};
use serde_json::Value as Json;

/// Produce the output value of the leaf `key` of `level`.
///
/// # Errors
///
/// - [`Error::UndefinedMethod`] if `key` resolves to nothing
/// - [`Error::InvalidType`] if the value fails the active type system
pub fn assign(
	key: &str,
	descriptor: &TypeDescriptor,
	subject: Subject<'_>,
	level: &Schema,
	ctx: &mut SerializationContext<'_>,
) -> Result<Json> {
	let raw = subject.resolve(key, level)?;

	let type_system = ctx.config().type_system();
	type_system
		.check_type(&raw, descriptor)
		.map_err(|mismatch| Error::InvalidType {
			key: key.to_string(),
			message: mismatch.message().to_string(),
		})?;
	let coerced = type_system.coerce(raw, descriptor);

	expand(coerced, subject.class_key(), ctx)
}

/// Convert a checked value to JSON, expanding nested records and collections.
///
/// `container` is the class of the instance owning the value; it is held in
/// the skip-set while nested values expand.
pub fn expand(value: Value, container: Option<&str>, ctx: &mut SerializationContext<'_>) -> Result<Json> {
	match value {
		Value::Object(object) if object.is_schema_bearing() => nested_record(&object, container, ctx),
		Value::Object(object) => match object.iter() {
			Some(items) => expand_items(items, container, ctx),
			None => Err(Error::UnknownSchema {
				class: object.class_name().to_string(),
			}),
		},
		Value::Array(items) => expand_items(items, container, ctx),
		Value::Map(map) => {
			let mut out = serde_json::Map::with_capacity(map.len());
			for (key, value) in map {
				out.insert(key, expand(value, container, ctx)?);
			}
			Ok(Json::Object(out))
		}
		scalar => Ok(scalar_to_json(scalar)),
	}
}

fn nested_record(
	object: &Object,
	container: Option<&str>,
	ctx: &mut SerializationContext<'_>,
) -> Result<Json> {
	if ctx.is_skipped(object.class_name()) {
		tracing::trace!(class = object.class_name(), "skipping self-referencing record");
		return Ok(Json::Null);
	}
	match container {
		Some(class) => ctx.with_skip_set(class, |ctx| build_record(object, ctx)),
		None => build_record(object, ctx),
	}
}

fn expand_items(
	items: Vec<Value>,
	container: Option<&str>,
	ctx: &mut SerializationContext<'_>,
) -> Result<Json> {
	let nested_collection = !items.is_empty() && items.iter().all(Value::is_schema_bearing);
	if !nested_collection {
		return items
			.into_iter()
			.map(|item| expand(item, container, ctx))
			.collect::<Result<Vec<_>>>()
			.map(Json::Array);
	}

	let element_class = items
		.first()
		.and_then(Value::as_object)
		.map(|object| object.class_name().to_string())
		.unwrap_or_default();
	if ctx.is_skipped(&element_class) {
		tracing::trace!(class = %element_class, "skipping self-referencing collection");
		return Ok(Json::Null);
	}

	let build_all = |ctx: &mut SerializationContext<'_>| {
		items
			.iter()
			.filter_map(Value::as_object)
			.map(|object| build_record(object, ctx))
			.collect::<Result<Vec<_>>>()
			.map(Json::Array)
	};
	match container {
		Some(class) => ctx.with_skip_set(class, build_all),
		None => build_all(ctx),
	}
}

/// Build a nested record, through the default serializer when the class
/// registers one.
fn build_record(object: &Object, ctx: &mut SerializationContext<'_>) -> Result<Json> {
	if let Some(def) = object.class().find_serializer(DEFAULT_TAG)? {
		let serializer = def.wrap(object);
		return walk(def.schema(), Subject::Serializer(&serializer), ctx).map(Json::Object);
	}
	let schema = object.resolve_schema()?;
	walk(&schema, Subject::Object(object), ctx).map(Json::Object)
}

/// JSON for a scalar; non-finite floats become `null`.
fn scalar_to_json(value: Value) -> Json {
	match value {
		Value::Null => Json::Null,
		Value::Bool(b) => Json::Bool(b),
		Value::Integer(i) => Json::from(i),
		Value::Float(f) => serde_json::Number::from_f64(f).map_or(Json::Null, Json::Number),
		Value::String(s) => Json::String(s),
		Value::Array(_) | Value::Map(_) | Value::Object(_) => Json::Null,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use portrait_conf::Config;
	use portrait_core::registry::Class;
	use portrait_core::schema;
	use portrait_core::types::TypeDescriptor as T;
	use rstest::rstest;
	use serde_json::json;

	struct Tag {
		label: &'static str,
	}

	fn tags() -> Class<Tag> {
		Class::<Tag>::builder("Tag")
			.schema(schema! { label: T::String })
			.method("label", |tag: &Tag| tag.label)
			.build()
			.unwrap()
	}

	#[rstest]
	#[case(Value::from(f64::NAN), json!(null))]
	#[case(Value::from(f64::INFINITY), json!(null))]
	#[case(Value::from(2.5), json!(2.5))]
	#[case(Value::from(vec![1, 2]), json!([1, 2]))]
	#[case(Value::map([("a", Value::from(true))]), json!({"a": true}))]
	fn test_expand_plain_values(#[case] value: Value, #[case] expected: Json) {
		let config = Config::default();
		let mut ctx = SerializationContext::new(&config);

		assert_eq!(expand(value, None, &mut ctx).unwrap(), expected);
	}

	#[rstest]
	fn test_expand_collection_of_records() {
		// Arrange
		let tags = tags();
		let value = Value::from(vec![
			tags.instance(Tag { label: "rust" }),
			tags.instance(Tag { label: "json" }),
		]);
		let config = Config::default();
		let mut ctx = SerializationContext::new(&config);

		// Act
		let json = expand(value, Some("Post"), &mut ctx).unwrap();

		// Assert
		assert_eq!(json, json!([{"label": "rust"}, {"label": "json"}]));
		assert!(!ctx.is_skipped("Post"));
	}

	#[rstest]
	fn test_skipped_class_becomes_null() {
		let tags = tags();
		let config = Config::default();
		let mut ctx = SerializationContext::new(&config);

		let json = ctx.with_skip_set("Tag", |ctx| {
			let single = expand(Value::from(tags.instance(Tag { label: "a" })), None, ctx);
			let many = expand(Value::from(vec![tags.instance(Tag { label: "b" })]), None, ctx);
			(single.unwrap(), many.unwrap())
		});

		assert_eq!(json, (Json::Null, Json::Null));
	}

	#[rstest]
	fn test_object_without_schema_is_unknown_schema() {
		struct Opaque;
		let opaque = Class::<Opaque>::builder("Opaque").build().unwrap();
		let config = Config::default();
		let mut ctx = SerializationContext::new(&config);

		let err = expand(Value::from(opaque.instance(Opaque)), None, &mut ctx).unwrap_err();

		assert!(err.is_unknown_schema());
	}

	#[rstest]
	fn test_assign_reports_invalid_type() {
		// Arrange
		struct Note;
		let notes = Class::<Note>::builder("Note")
			.schema(schema! { foo: T::Integer })
			.method("foo", |_: &Note| "string")
			.build()
			.unwrap();
		let note = notes.instance(Note);
		let level = schema! { foo: T::Integer };
		let config = Config::default();
		let mut ctx = SerializationContext::new(&config);

		// Act
		let err = assign("foo", &T::Integer, Subject::Object(&note), &level, &mut ctx).unwrap_err();

		// Assert
		assert_eq!(
			err.to_string(),
			"Wrong type for key `foo`. Expected Integer, got String."
		);
	}
}
