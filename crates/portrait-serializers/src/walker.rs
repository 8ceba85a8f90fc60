//! Recursive schema walking.

use crate::assign::assign;
use crate::context::SerializationContext;
use crate::subject::Subject;
use portrait_core::Result;
use portrait_core::schema::{Schema, SchemaNode};
use portrait_core::value::Value;
use serde_json::{Map, Value as Json};

/// Walk `schema` against `subject`, producing the resolved mapping.
///
/// Entries keep their declaration order. The first failing key aborts the
/// walk.
pub fn walk(
	schema: &Schema,
	subject: Subject<'_>,
	ctx: &mut SerializationContext<'_>,
) -> Result<Map<String, Json>> {
	let mut out = Map::with_capacity(schema.len());
	for (key, node) in schema.iter() {
		let value = match node {
			SchemaNode::Leaf(descriptor) => assign(key, descriptor, subject, schema, ctx)?,
			SchemaNode::Nested(inner) => walk_nested(key, inner, subject, schema, ctx)?,
		};
		out.insert(key.to_string(), value);
	}
	Ok(out)
}

/// Walk a nested schema.
///
/// When the subject exposes `key` and its value is an object, a map or a
/// collection of those, the nested schema is walked against that value.
/// Otherwise it is walked against the same subject.
fn walk_nested(
	key: &str,
	inner: &Schema,
	subject: Subject<'_>,
	level: &Schema,
	ctx: &mut SerializationContext<'_>,
) -> Result<Json> {
	if !subject.responds_to(key) {
		return walk(inner, subject, ctx).map(Json::Object);
	}

	match subject.resolve(key, level)? {
		Value::Object(object) => match object.iter() {
			Some(items) => match association(&items) {
				Some(subjects) => walk_each(inner, subjects, ctx),
				None => walk(inner, Subject::Object(&object), ctx).map(Json::Object),
			},
			None => walk(inner, Subject::Object(&object), ctx).map(Json::Object),
		},
		Value::Map(map) => walk(inner, Subject::Map(&map), ctx).map(Json::Object),
		Value::Array(items) => match association(&items) {
			Some(subjects) => walk_each(inner, subjects, ctx),
			None => walk(inner, subject, ctx).map(Json::Object),
		},
		_ => walk(inner, subject, ctx).map(Json::Object),
	}
}

/// Subjects of a non-empty collection holding only objects and maps.
fn association(items: &[Value]) -> Option<Vec<Subject<'_>>> {
	if items.is_empty() {
		return None;
	}
	items
		.iter()
		.map(|item| match item {
			Value::Object(object) => Some(Subject::Object(object)),
			Value::Map(map) => Some(Subject::Map(map)),
			_ => None,
		})
		.collect()
}

fn walk_each(
	inner: &Schema,
	subjects: Vec<Subject<'_>>,
	ctx: &mut SerializationContext<'_>,
) -> Result<Json> {
	subjects
		.into_iter()
		.map(|subject| walk(inner, subject, ctx).map(Json::Object))
		.collect::<Result<Vec<_>>>()
		.map(Json::Array)
}
