//! Storefront events and their in-process distribution.
//!
//! Aggregates emit events; stores apply them and hand them to an [`EventBus`]
//! so presentation code can re-render without polling.

pub mod bus;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
