//! Adapters implementing domain ports.
//!
//! This module contains infrastructure implementations of the traits defined
//! in the ports module. Following hexagonal architecture, adapters depend on
//! domain ports, not the other way around.

pub mod extension_repository;
pub mod in_memory_repository;
pub mod json_repository;
pub mod msgpack_repository;
pub mod random_policy;

pub use extension_repository::{CheckpointFormat, ExtensionRepository, checkpoint_path};
pub use in_memory_repository::InMemoryRepository;
pub use json_repository::JsonRepository;
pub use msgpack_repository::MsgPackRepository;
pub use random_policy::RandomPolicy;
