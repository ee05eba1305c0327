//! # dashgen-sync
//!
//! Write/verify differ and run orchestration.
//!
//! Call [`pipeline::run`] with a resource tree and a [`dashgen_core::Mode`]
//! to either persist the generated manifest or check that the committed copy
//! is byte-identical.

pub mod digest;
pub mod error;
pub mod pipeline;
pub mod verify;
pub mod writer;

pub use error::SyncError;
pub use pipeline::{generate, run, GenOptions, RunOutcome};
pub use verify::{Mismatch, MismatchKind, VerifyReport};
pub use writer::{WriteDiffer, WriteResult};
