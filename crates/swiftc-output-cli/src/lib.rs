//! swiftc-output CLI Library
//!
//! Drives the core parser from files, stdin, or a spawned compiler and
//! writes decoded records as NDJSON.

pub mod output;
pub mod pump;
pub mod run;
