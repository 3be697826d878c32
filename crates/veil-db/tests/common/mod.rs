//! Common test utilities shared by the repository integration suites.

pub mod fixtures;
