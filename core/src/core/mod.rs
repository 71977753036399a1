pub mod context;
pub mod context_data;
pub mod control;
pub mod step;

// Re-export key types for easier access from other reflow modules (and lib.rs)
pub use context::{Handler, HandlerFuture};
pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use step::{SkipCondition, StepDef};
