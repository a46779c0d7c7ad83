//! Pipeline orchestration.

pub mod pipeline;
pub mod sequencer;

pub use pipeline::Pipeline;
pub use sequencer::{PipelineReport, PipelineStatus, StepPreview, StepRecord, StepSequencer};
