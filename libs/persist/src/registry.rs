//! Tag-dispatched handler registration and persistence dispatch.

use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::entity::{Placeholder, Stateful};
use crate::record::Record;

type SerializeFn = dyn Fn(&dyn Stateful) -> Option<Value> + Send + Sync;
type RestoreFn = dyn Fn(&str, &Value) -> Option<Box<dyn Stateful>> + Send + Sync;
type CreateFn = dyn Fn(&str) -> Box<dyn Stateful> + Send + Sync;
type PlaceholderFn = dyn Fn(&Record) -> Box<dyn Stateful> + Send + Sync;

/// Handler configuration registered for one type tag.
///
/// All pieces are optional. A custom `serialize`/`restore` pair takes
/// priority; without one, the `save` list drives a generic get/set of the
/// entity's named state, with `create` supplying the fresh entity on
/// restore.
#[derive(Default)]
pub struct Handlers {
    serialize: Option<Box<SerializeFn>>,
    restore: Option<Box<RestoreFn>>,
    create: Option<Box<CreateFn>>,
    save: Vec<String>,
}

impl Handlers {
    /// Creates an empty handler configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the custom serializer.
    ///
    /// Returning `None` declines serialization for an entity that is not
    /// in the expected state; the entity is then skipped, not failed.
    pub fn serialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn Stateful) -> Option<Value> + Send + Sync + 'static,
    {
        self.serialize = Some(Box::new(f));
        self
    }

    /// Sets the custom restorer, called with the restored context and
    /// payload.
    ///
    /// Returning `None` signals the backing capability is unavailable;
    /// the registry then produces a placeholder instead of failing.
    pub fn restore<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Value) -> Option<Box<dyn Stateful>> + Send + Sync + 'static,
    {
        self.restore = Some(Box::new(f));
        self
    }

    /// Sets the constructor used by save-list restore, called with the
    /// restored context.
    pub fn create<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Box<dyn Stateful> + Send + Sync + 'static,
    {
        self.create = Some(Box::new(f));
        self
    }

    /// Names the state variables captured by the generic save-list mode.
    pub fn save<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.save = names.into_iter().map(Into::into).collect();
        self
    }
}

/// An explicit, injectable registry of persistence handlers.
///
/// Entries are looked up by tag. Writes are rare and happen at
/// plugin-load time; `register` is serialized against concurrent lookups
/// by an interior lock. Iteration order is registration order, and
/// re-registering a tag overwrites its handlers without moving it.
pub struct Registry {
    entries: RwLock<IndexMap<String, Arc<Handlers>>>,
    placeholder: Box<PlaceholderFn>,
}

impl Registry {
    /// Creates an empty registry with the default placeholder entity.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(IndexMap::new()),
            placeholder: Box::new(|record: &Record| {
                Box::new(Placeholder::new(&record.handler_tag, &record.context))
                    as Box<dyn Stateful>
            }),
        }
    }

    /// Replaces the factory invoked when restoration cannot proceed.
    pub fn set_placeholder<F>(&mut self, f: F)
    where
        F: Fn(&Record) -> Box<dyn Stateful> + Send + Sync + 'static,
    {
        self.placeholder = Box::new(f);
    }

    /// Registers handlers for `tag`.
    ///
    /// Re-registering an existing tag overwrites its handlers; the tag
    /// keeps its original position in registration order.
    pub fn register(&self, tag: impl Into<String>, handlers: Handlers) {
        let tag = tag.into();
        debug!(%tag, "registering persistence handlers");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tag, Arc::new(handlers));
    }

    /// Returns the registered tags in registration order.
    pub fn tags(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn handlers_for(&self, tag: &str) -> Option<Arc<Handlers>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tag)
            .cloned()
    }

    /// Captures `entity` into a flat record.
    ///
    /// Returns `None` when no handlers are registered for the entity's
    /// tag or when the registered serializer declines — the entity is
    /// skipped from this persistence pass, which is not an error.
    pub fn serialize_entity(&self, entity: &dyn Stateful) -> Option<Record> {
        let tag = entity.handler_tag();
        let Some(handlers) = self.handlers_for(tag) else {
            debug!(%tag, "no handlers registered, skipping entity");
            return None;
        };

        let context = entity.context();
        if let Some(serialize) = &handlers.serialize {
            let Some(payload) = serialize(entity) else {
                debug!(%tag, "serializer declined, skipping entity");
                return None;
            };
            return Some(Record::new(tag, context, payload));
        }

        let values: Vec<Value> = handlers
            .save
            .iter()
            .map(|name| entity.variable(name).unwrap_or(Value::Null))
            .collect();
        Some(Record::new(tag, context, Value::Array(values)))
    }

    /// Rebuilds an entity from a record. Restoration never fails.
    ///
    /// An unknown tag, a declining restorer, or a save-list record with
    /// no constructor all produce the placeholder entity.
    pub fn deserialize_entity(&self, record: &Record) -> Box<dyn Stateful> {
        let Some(handlers) = self.handlers_for(&record.handler_tag) else {
            warn!(tag = %record.handler_tag, "no handlers registered, producing placeholder");
            return (self.placeholder)(record);
        };

        if let Some(restore) = &handlers.restore {
            if let Some(entity) = restore(&record.context, &record.payload) {
                return entity;
            }
            warn!(tag = %record.handler_tag, "restorer declined, producing placeholder");
            return (self.placeholder)(record);
        }

        let Some(create) = &handlers.create else {
            warn!(tag = %record.handler_tag, "no restorer or constructor, producing placeholder");
            return (self.placeholder)(record);
        };

        let mut entity = create(&record.context);
        if let Value::Array(values) = &record.payload {
            for (name, value) in handlers.save.iter().zip(values) {
                entity.set_variable(name, value.clone());
            }
        }
        entity
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
