//! Core pipeline orchestration for shiftscope.
//!
//! Ties fetching, normalization, classification, aggregation, and rendering
//! into one end-to-end reporting run.

pub mod pipeline;
pub mod window;

pub use crate::pipeline::{
    ProgressReporter, RunAbort, RunOutcome, RunRequest, RunStage, SilentProgress, run,
};
pub use crate::window::last_full_week;
