use super::{ClassDef, SchemaStorage};
use crate::error::{Error, MethodLookupError, Result};
use crate::schema::Schema;
use crate::value::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An instance of a declared class.
///
/// Cloning is cheap and keeps pointing at the same data.
#[derive(Clone)]
pub struct Object {
	class: Arc<ClassDef>,
	data: Arc<dyn Any + Send + Sync>,
	schema: Option<Arc<Schema>>,
}

impl Object {
	pub(crate) fn new(class: Arc<ClassDef>, data: Arc<dyn Any + Send + Sync>) -> Self {
		Self {
			class,
			data,
			schema: None,
		}
	}

	pub fn class(&self) -> &Arc<ClassDef> {
		&self.class
	}

	pub fn class_name(&self) -> &str {
		self.class.name()
	}

	pub fn is_a(&self, class: &str) -> bool {
		self.class.is_a(class)
	}

	fn data(&self) -> &dyn Any {
		&*self.data
	}

	/// Invoke the accessor bound to `method` on this class or an ancestor.
	pub fn call(&self, method: &str) -> std::result::Result<Value, MethodLookupError> {
		self.class
			.find_in_chain(self.data(), &|class, data| {
				class.methods.get(method).and_then(|accessor| accessor(data))
			})
			.ok_or_else(|| MethodLookupError::new(method, format!("#<{}>", self.class_name())))
	}

	pub fn responds_to(&self, method: &str) -> bool {
		self.class.has_method(method)
	}

	/// Items of an iterable object, `None` when the class is not iterable.
	pub fn iter(&self) -> Option<Vec<Value>> {
		self.class.find_in_chain(self.data(), &|class, data| {
			class.iteration.as_ref().and_then(|items| items(data))
		})
	}

	pub fn is_iterable(&self) -> bool {
		self.class.is_iterable()
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.data().downcast_ref::<T>()
	}

	/// Whether both objects share the same underlying data.
	pub fn ptr_eq(&self, other: &Object) -> bool {
		Arc::ptr_eq(&self.data, &other.data)
	}

	/// Attach a schema to this one instance.
	///
	/// # Errors
	///
	/// Returns [`Error::InstanceSchemaNotAllowed`] unless the class uses
	/// [`SchemaStorage::Instance`].
	pub fn with_schema(&self, schema: Schema) -> Result<Object> {
		if self.class.storage() != SchemaStorage::Instance {
			return Err(Error::InstanceSchemaNotAllowed {
				class: self.class_name().to_string(),
			});
		}
		Ok(Object {
			class: Arc::clone(&self.class),
			data: Arc::clone(&self.data),
			schema: Some(Arc::new(schema)),
		})
	}

	/// The schema attached to this instance, then the class's effective schema.
	pub fn resolve_schema(&self) -> Result<Arc<Schema>> {
		match &self.schema {
			Some(schema) => Ok(Arc::clone(schema)),
			None => self.class.resolve_schema(),
		}
	}

	/// Whether this instance can build its own schema.
	pub fn is_schema_bearing(&self) -> bool {
		self.schema.is_some() || self.class.has_schema_capability()
	}
}

impl fmt::Debug for Object {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Object")
			.field("class", &self.class_name())
			.field("schema", &self.schema)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::registry::Class;
	use crate::schema;
	use crate::types::TypeDescriptor as T;
	use rstest::{fixture, rstest};

	struct Row {
		id: i64,
	}

	struct Rows {
		rows: Vec<i64>,
	}

	#[fixture]
	fn rows() -> Class<Row> {
		Class::<Row>::builder("Orm::Row")
			.schema(schema! { id: T::Integer })
			.method("id", |row: &Row| row.id)
			.storage(SchemaStorage::Instance)
			.build()
			.unwrap()
	}

	#[rstest]
	fn test_instance_schema_overrides_class_schema(rows: Class<Row>) {
		// Arrange
		let row = rows.instance(Row { id: 1 });

		// Act
		let custom = row.with_schema(schema! { name: T::String }).unwrap();

		// Assert
		assert_eq!(custom.resolve_schema().unwrap().keys().collect::<Vec<_>>(), vec!["name"]);
		assert_eq!(row.resolve_schema().unwrap().keys().collect::<Vec<_>>(), vec!["id"]);
		assert!(custom.ptr_eq(&row));
	}

	#[rstest]
	fn test_class_storage_rejects_instance_schema() {
		let rows = Class::<Row>::builder("Row").build().unwrap();

		let err = rows
			.instance(Row { id: 1 })
			.with_schema(schema! { id: T::Integer })
			.unwrap_err();

		assert!(matches!(err, Error::InstanceSchemaNotAllowed { .. }));
	}

	#[rstest]
	fn test_call_reports_receiver(rows: Class<Row>) {
		let row = rows.instance(Row { id: 7 });

		assert_eq!(row.call("id").unwrap(), Value::from(7));
		assert_eq!(
			row.call("name").unwrap_err().to_string(),
			"undefined method `name` for #<Orm::Row>"
		);
		assert_eq!(row.downcast_ref::<Row>().map(|r| r.id), Some(7));
	}

	#[rstest]
	fn test_iterable_objects_yield_items() {
		let collection = Class::<Rows>::builder("RowSet")
			.iterable(|set: &Rows| set.rows.clone())
			.build()
			.unwrap();

		let set = collection.instance(Rows { rows: vec![1, 2] });

		assert!(set.is_iterable());
		assert_eq!(set.iter(), Some(vec![Value::from(1), Value::from(2)]));
		assert!(!set.is_schema_bearing());
	}
}
