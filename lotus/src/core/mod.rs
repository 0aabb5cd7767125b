//! Deterministic step-sequence logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! session state and return deterministic outputs suitable for tests.

pub mod framework;
pub mod journey;
pub mod processor;
pub mod taxonomy;
pub mod types;
pub mod validator;
