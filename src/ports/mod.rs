//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the domain and implemented by adapters: move
//! sources (agents, random play, human input), training observers, and
//! checkpoint storage.

pub mod observer;
pub mod policy;
pub mod repository;

pub use observer::Observer;
pub use policy::TurnPolicy;
pub use repository::CheckpointRepository;
