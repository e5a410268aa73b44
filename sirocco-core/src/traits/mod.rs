//! Trait definitions for upstream collaborators.
//!
//! The event bus does not talk to exchanges itself; it drives a
//! [`FeedManager`] that owns the upstream connections and produces the
//! per-key event streams the bus fans out.

mod manager;

pub use manager::FeedManager;
