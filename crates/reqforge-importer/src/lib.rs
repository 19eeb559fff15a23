//! ReqForge Importer
//!
//! Orchestration for turning requirement documents into linked issue
//! hierarchies: the generation pipeline, the two-phase creation scheduler,
//! and the seams the binary wires together. Exposed as a library for
//! testing.

pub mod creator;
pub mod document;
pub mod pacer;
pub mod pipeline;
pub mod scheduler;
pub mod secrets;

pub use creator::{IssueCreator, JiraCreator, RemoteFailure};
pub use pacer::{FixedDelay, NoDelay, Pacer};
pub use pipeline::{GenerationPipeline, PipelineError};
pub use scheduler::ImportScheduler;
