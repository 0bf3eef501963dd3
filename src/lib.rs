//! valve-catalog - a small HTTP catalog of industrial valve records
//!
//! Four endpoints create, list, update and delete valves stored in a single
//! SQLite table. Every request works inside its own storage session.

pub mod cli;
pub mod http_server;
pub mod model;
pub mod storage;
