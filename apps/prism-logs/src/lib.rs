//! # prism-logs
//!
//! Library half of the prism-logs binary: the HTTP session, the pagination
//! engines, configuration and output. Exposed so integration tests can
//! drive a retrieval against a mock server.

pub mod cli;
pub mod config;
pub mod output;
pub mod retrieval;
pub mod session;
