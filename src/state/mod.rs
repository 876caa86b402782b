//! View lifecycle state
//!
//! Remote resource views, polling, optimistic commands and tab selection.

pub mod optimistic;
pub mod poller;
pub mod resource;
pub mod tabs;

pub use optimistic::{OptimisticCommand, MutationOutcome, update_where, remove_where};
pub use poller::Poller;
pub use resource::{ResourceView, ResourceSpec, ResourceState, Envelope, FetchOutcome};
pub use tabs::{Tab, TabSelector};
