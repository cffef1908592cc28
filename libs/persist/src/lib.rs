//! # wsm-persist
//!
//! Pluggable, type-tagged persistence for opaque stateful entities.
//! Independently-authored modes register serializer/deserializer pairs;
//! the registry dispatches on each entity's tag at save and restore time.
//!
//! ## Design Principles
//!
//! - Handlers are registered explicitly on an injectable [`Registry`];
//!   there is no ambient global state, and tests get fresh instances
//! - Persistence failures are non-fatal: an unknown tag or a declining
//!   serializer skips the entity, a failed restore yields a placeholder
//! - Exactly one flat record per entity per persistence pass; the caller
//!   owns the structural tree around the records
//! - Registration order is preserved; re-registering a tag overwrites its
//!   handlers in place
//!
//! ## Record Shape
//!
//! Each serialized entity becomes `(handlerTag, (contextString, payload))`
//! on the wire, where the payload is either a custom serializer's value or
//! the ordered values of the handler's save list.

mod entity;
mod record;
mod registry;

pub use entity::{Placeholder, Stateful};
pub use record::Record;
pub use registry::{Handlers, Registry};
