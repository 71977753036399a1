// src/lib.rs

//! Reflow: asynchronous step pipelines and backpressure-aware stream operators.
//!
//! A request-scoped workflow is described as a [`Pipeline`] of named steps that
//! share one [`ContextData`]. Steps run strictly in order, each one awaited before
//! the next; the first failing handler aborts the run. Steps can be optional or
//! carry a `skip_if` predicate evaluated against the context at run time.
//!
//! Workflows that produce a sequence rather than a value compose the operators of
//! [`FluxExt`] inside their steps: replaying a sequence a fixed number of times,
//! pacing elements, and handing them to a slow consumer through a bounded lookahead
//! window.
//!
//! [`Reflow`] maps each context data type to the pipeline that handles it.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod stream;

// --- Re-exports for the Public API ---

pub use crate::core::context::{Handler, HandlerFuture};
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::{Phase, Pipeline};

pub use crate::error::{ReflowError, ReflowResult};

pub use crate::registry::Reflow;

pub use crate::stream::{BoundedLookahead, FluxExt, RepeatCycles};

/*
    Core Workflow:
    1. Define a context struct `MyCtx` for one request.
    2. Create a `Pipeline<MyCtx, MyError>` listing its steps in order.
    3. Register handlers with `.on_root()`, `.before_root()`, `.after_root()`.
    4. Register the pipeline with a `Reflow<MyError>` registry.
    5. Per request: `registry.run(ContextData::new(MyCtx { .. })).await`, then read the outcome
       from the caller's clone of the context.
*/
