//! Core domain types
//!
//! The UWS data model as seen by a client: jobs, job lists and the small
//! value types they own. Every type can be built from explicit values or
//! read from a namespace-resolved XML element; the two paths are separate
//! constructors.

pub mod error_summary;
pub mod job;
pub mod jobs;
pub mod parameter;
pub mod phase;
pub mod reference;
pub mod result;

pub use error_summary::ErrorSummary;
pub use job::{Job, JobInfo};
pub use jobs::{JobRef, Jobs};
pub use parameter::Parameter;
pub use phase::Phase;
pub use reference::Reference;
pub use result::JobResult;
