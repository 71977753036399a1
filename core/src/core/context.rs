// reflow/src/core/context.rs

//! Defines the `Handler<TData, Err>` type for pipeline step handlers, operating on `ContextData<TData>`.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// The boxed future every handler resolves to.
pub type HandlerFuture<Err> = Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>;

/// Type alias for a pipeline step handler.
///
/// A handler is an asynchronous function that receives a clone of the pipeline's
/// `ContextData<TData>` and resolves to `Result<PipelineControl, Err>`.
///
/// Handlers are responsible for:
/// 1. Acquiring locks (`.read()` or `.write()`) on the `ContextData` to access or modify state.
/// 2. **Dropping every lock guard BEFORE any `.await` suspension point.**
/// 3. Returning `PipelineControl::Continue` to proceed or `PipelineControl::Stop` to halt the pipeline.
pub type Handler<TData, Err> = Box<dyn Fn(ContextData<TData>) -> HandlerFuture<Err> + Send + Sync>;
