//! UWS Core
//!
//! Client-side model of the IVOA Universal Worker Service (UWS) protocol.
//!
//! This crate contains:
//! - Domain types: jobs, job lists and their leaf values, parsed from UWS XML
//! - XML helpers: namespace resolution and mandatory/optional field lookup
//! - DTOs: validation and encoding of job-list filters and long-poll waits
//!
//! Nothing in here performs I/O. Raw response bytes come in, typed models
//! come out; user-supplied filters come in, ordered query parameters come out.

pub mod domain;
pub mod dto;
pub mod error;
pub mod xml;

pub use error::{FilterRejection, Result, UwsError};
