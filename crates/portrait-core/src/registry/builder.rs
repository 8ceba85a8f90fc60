use super::{
	Accessor, Class, ClassDef, DEFAULT_TAG, Iteration, Projection, SchemaStorage, SerializerDef,
	Superclass,
};
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::value::Value;
use indexmap::IndexMap;
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// Builder for [`Class`] declarations.
pub struct ClassBuilder<T> {
	name: String,
	superclass: Option<Superclass>,
	schema: Option<Schema>,
	aliases: IndexMap<String, String>,
	delegate: Option<Arc<ClassDef>>,
	serializers: IndexMap<String, Arc<SerializerDef>>,
	methods: IndexMap<String, Accessor>,
	iteration: Option<Iteration>,
	storage: SchemaStorage,
	_marker: PhantomData<fn() -> T>,
}

fn projection<F>(f: F) -> Projection
where
	F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
	Arc::new(f)
}

impl<T: Any + Send + Sync> ClassBuilder<T> {
	pub(crate) fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			superclass: None,
			schema: None,
			aliases: IndexMap::new(),
			delegate: None,
			serializers: IndexMap::new(),
			methods: IndexMap::new(),
			iteration: None,
			storage: SchemaStorage::default(),
			_marker: PhantomData,
		}
	}

	/// Inherit from `parent`, whose value is embedded in `T`.
	///
	/// Parent methods, schema and iteration stay reachable through
	/// `project`.
	pub fn extends<P: Any + Send + Sync>(mut self, parent: &Class<P>, project: fn(&T) -> &P) -> Self {
		self.superclass = Some(Superclass {
			class: Arc::clone(parent.def()),
			project: projection(move |data: &dyn Any| {
				data.downcast_ref::<T>().map(|value| project(value) as &dyn Any)
			}),
		});
		self
	}

	pub fn schema(mut self, schema: Schema) -> Self {
		self.schema = Some(schema);
		self
	}

	/// Declare the schema from JSON; see [`Schema::from_json`].
	pub fn schema_from_json(self, json: &serde_json::Value) -> Result<Self> {
		let schema = Schema::from_json(json)?;
		Ok(self.schema(schema))
	}

	/// Bind an accessor to `name`.
	pub fn method<V, F>(mut self, name: impl Into<String>, getter: F) -> Self
	where
		V: Into<Value>,
		F: Fn(&T) -> V + Send + Sync + 'static,
	{
		let accessor: Accessor = Arc::new(move |data: &dyn Any| -> Option<Value> {
			data.downcast_ref::<T>().map(|value| getter(value).into())
		});
		self.methods.insert(name.into(), accessor);
		self
	}

	/// Resolve the output key `key` through the method `target`.
	pub fn alias(mut self, key: impl Into<String>, target: impl Into<String>) -> Self {
		self.aliases.insert(key.into(), target.into());
		self
	}

	/// Declare aliases from a JSON mapping of output keys to method names.
	pub fn aliases_from_json(mut self, json: &serde_json::Value) -> Result<Self> {
		let serde_json::Value::Object(map) = json else {
			return Err(Error::InvalidAliases {
				found: json.to_string(),
			});
		};
		for (key, target) in map {
			let serde_json::Value::String(target) = target else {
				return Err(Error::InvalidAliases {
					found: json.to_string(),
				});
			};
			self.aliases.insert(key.clone(), target.clone());
		}
		Ok(self)
	}

	/// Borrow the schema of `target` instead of declaring one.
	///
	/// Methods are still resolved against instances of this class.
	pub fn delegate_to<P>(mut self, target: &Class<P>) -> Self {
		self.delegate = Some(Arc::clone(&target.def));
		self
	}

	/// Register the default serializer.
	pub fn serializer(self, serializer: &Arc<SerializerDef>) -> Self {
		self.tagged_serializer(DEFAULT_TAG, serializer)
	}

	pub fn tagged_serializer(mut self, tag: impl Into<String>, serializer: &Arc<SerializerDef>) -> Self {
		self.serializers.insert(tag.into(), Arc::clone(serializer));
		self
	}

	/// Mark instances as collections, yielding the values of `items`.
	pub fn iterable<V, F>(mut self, items: F) -> Self
	where
		V: Into<Value>,
		F: Fn(&T) -> Vec<V> + Send + Sync + 'static,
	{
		let iteration: Iteration = Arc::new(move |data: &dyn Any| -> Option<Vec<Value>> {
			data.downcast_ref::<T>()
				.map(|value| items(value).into_iter().map(Into::into).collect())
		});
		self.iteration = Some(iteration);
		self
	}

	pub fn storage(mut self, storage: SchemaStorage) -> Self {
		self.storage = storage;
		self
	}

	/// Finish the declaration.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidSchemaDelegation`] if no schema resolves for the
	/// delegation target. A default serializer alone doesn't count.
	pub fn build(self) -> Result<Class<T>> {
		if let Some(target) = &self.delegate
			&& target.resolve_schema().is_err()
		{
			return Err(Error::InvalidSchemaDelegation {
				class: self.name,
				target: target.name.clone(),
			});
		}

		Ok(Class::from_def(ClassDef {
			name: self.name,
			superclass: self.superclass,
			schema: self.schema.map(Arc::new),
			aliases: self.aliases,
			delegate: self.delegate,
			serializers: self.serializers,
			methods: self.methods,
			iteration: self.iteration,
			storage: self.storage,
		}))
	}
}
