//! Serializers: wrapper classes holding their own schema.
//!
//! A serializer wraps an arbitrary value (an [`Object`](super::Object), a
//! map, or a collection of either) together with a per-call context. Each
//! schema key resolves through the serializer's own methods first, then its
//! declared context keys, then the wrapped value.

use crate::error::{Error, MethodLookupError, Result};
use crate::schema::Schema;
use crate::value::Value;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A method defined on a serializer.
pub type SerializerMethod = Arc<dyn for<'a> Fn(&SerializerScope<'a>) -> Value + Send + Sync>;

/// Definition of a serializer class.
pub struct SerializerDef {
	name: String,
	schema: Arc<Schema>,
	methods: IndexMap<String, SerializerMethod>,
	context_keys: Vec<String>,
	aliases: IndexMap<String, String>,
}

impl SerializerDef {
	/// Start declaring a serializer.
	///
	/// # Examples
	///
	/// ```
	/// use portrait_core::registry::SerializerDef;
	/// use portrait_core::schema;
	/// use portrait_core::types::TypeDescriptor as T;
	/// use portrait_core::value::Value;
	///
	/// let serializer = SerializerDef::builder("UserSerializer")
	///     .schema(schema! { name: T::String, role: T::String })
	///     .context("role")
	///     .build()
	///     .unwrap();
	///
	/// let wrapped = serializer
	///     .wrap(Value::map([("name", "Alice")]))
	///     .with_context("role", "admin");
	/// assert_eq!(wrapped.context()["role"], Value::from("admin"));
	/// ```
	pub fn builder(name: impl Into<String>) -> SerializerBuilder {
		SerializerBuilder::new(name)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn schema(&self) -> &Arc<Schema> {
		&self.schema
	}

	pub fn method(&self, name: &str) -> Option<&SerializerMethod> {
		self.methods.get(name)
	}

	/// Whether `key` was declared readable from the context.
	pub fn declares_context(&self, key: &str) -> bool {
		self.context_keys.iter().any(|declared| declared == key)
	}

	pub fn aliases(&self) -> &IndexMap<String, String> {
		&self.aliases
	}

	/// Wrap `object` for serialization.
	pub fn wrap(self: &Arc<Self>, object: impl Into<Value>) -> Serializer {
		Serializer {
			def: Arc::clone(self),
			object: object.into(),
			context: IndexMap::new(),
		}
	}
}

impl fmt::Debug for SerializerDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SerializerDef")
			.field("name", &self.name)
			.field("schema", &self.schema)
			.field("methods", &self.methods.keys().collect::<Vec<_>>())
			.field("context_keys", &self.context_keys)
			.field("aliases", &self.aliases)
			.finish()
	}
}

/// Builder for [`SerializerDef`].
pub struct SerializerBuilder {
	name: String,
	schema: Option<Schema>,
	methods: IndexMap<String, SerializerMethod>,
	context_keys: Vec<String>,
	aliases: IndexMap<String, String>,
}

impl SerializerBuilder {
	fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			schema: None,
			methods: IndexMap::new(),
			context_keys: Vec::new(),
			aliases: IndexMap::new(),
		}
	}

	pub fn schema(mut self, schema: Schema) -> Self {
		self.schema = Some(schema);
		self
	}

	pub fn schema_from_json(self, json: &serde_json::Value) -> Result<Self> {
		let schema = Schema::from_json(json)?;
		Ok(self.schema(schema))
	}

	/// Define a method computed from the wrapped value and the context.
	pub fn method<V, F>(mut self, name: impl Into<String>, compute: F) -> Self
	where
		V: Into<Value>,
		F: Fn(&SerializerScope<'_>) -> V + Send + Sync + 'static,
	{
		let method: SerializerMethod =
			Arc::new(move |scope: &SerializerScope<'_>| -> Value { compute(scope).into() });
		self.methods.insert(name.into(), method);
		self
	}

	/// Make the context entry `key` readable as a method.
	pub fn context(mut self, key: impl Into<String>) -> Self {
		self.context_keys.push(key.into());
		self
	}

	pub fn alias(mut self, key: impl Into<String>, target: impl Into<String>) -> Self {
		self.aliases.insert(key.into(), target.into());
		self
	}

	/// Finish the declaration.
	///
	/// # Errors
	///
	/// Returns [`Error::UnknownSchema`] when no schema was declared.
	pub fn build(self) -> Result<Arc<SerializerDef>> {
		let schema = self.schema.ok_or_else(|| Error::UnknownSchema {
			class: self.name.clone(),
		})?;
		Ok(Arc::new(SerializerDef {
			name: self.name,
			schema: Arc::new(schema),
			methods: self.methods,
			context_keys: self.context_keys,
			aliases: self.aliases,
		}))
	}
}

/// A serializer bound to a value and a context.
#[derive(Debug, Clone)]
pub struct Serializer {
	def: Arc<SerializerDef>,
	object: Value,
	context: IndexMap<String, Value>,
}

impl Serializer {
	pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.context.insert(key.into(), value.into());
		self
	}

	pub fn def(&self) -> &Arc<SerializerDef> {
		&self.def
	}

	pub fn object(&self) -> &Value {
		&self.object
	}

	pub fn context(&self) -> &IndexMap<String, Value> {
		&self.context
	}

	/// Class name of the wrapped object; maps and scalars have none.
	pub fn class_name(&self) -> Option<&str> {
		self.object.as_object().map(|object| object.class_name())
	}

	/// The same serializer and context over another value.
	pub fn rewrap(&self, object: Value) -> Serializer {
		Serializer {
			def: Arc::clone(&self.def),
			object,
			context: self.context.clone(),
		}
	}

	pub fn scope(&self) -> SerializerScope<'_> {
		SerializerScope {
			object: &self.object,
			context: &self.context,
		}
	}
}

/// What a serializer method sees: the wrapped value and the context.
#[derive(Debug, Clone, Copy)]
pub struct SerializerScope<'a> {
	object: &'a Value,
	context: &'a IndexMap<String, Value>,
}

impl<'a> SerializerScope<'a> {
	pub fn object(&self) -> &'a Value {
		self.object
	}

	pub fn context(&self) -> &'a IndexMap<String, Value> {
		self.context
	}

	pub fn context_value(&self, key: &str) -> Option<&'a Value> {
		self.context.get(key)
	}

	/// The wrapped object's data, when it is an instance of `T`.
	pub fn object_as<T: Any>(&self) -> Option<&'a T> {
		self.object.as_object().and_then(|object| object.downcast_ref::<T>())
	}

	/// Resolve `method` on the wrapped value.
	pub fn call(&self, method: &str) -> std::result::Result<Value, MethodLookupError> {
		self.object.call(method)
	}
}
