//! Container substrate: pods created through an orchestrator API.
//!
//! [`PodResourceClient`] is the substrate-neutral face (create / get / delete
//! returning [`PodResource`](vigil_model::PodResource)); [`PodApi`] is the wire
//! seam with a REST implementation ([`KubeRestApi`]) and an in-memory one
//! ([`MemoryPodApi`]). [`PodLauncher`] plugs the client into a supervisor.

mod error;
pub use error::OrchestratorError;

pub mod api;
pub use api::{KubeApiConfig, KubeRestApi, MemoryPodApi, PodApi};

pub mod manifest;

mod phase;
pub use phase::{PHASE_TABLE, map_phase};

mod client;
pub use client::PodResourceClient;

mod launcher;
pub use launcher::{PodConfig, PodLauncher};
