//! Typed bindings for the DSA v2 core contracts and the connectors exercised
//! by the deployment tooling and the integration tests.
//!
//! The bindings are generated from human-readable ABIs so that they don't
//! depend on a local compilation of the contracts.
pub mod wrappers;
