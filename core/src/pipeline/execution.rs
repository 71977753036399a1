// reflow/src/pipeline/execution.rs

//! Contains `Pipeline::run()`, which walks the steps in order and drives their handlers.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::step::StepDef;
use crate::error::ReflowError;
use crate::pipeline::definition::{Phase, Pipeline};
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<ReflowError> + Send + Sync + 'static,
{
  /// Executes the pipeline against the shared context `ctx_data`.
  ///
  /// Steps run strictly one after another. Within a step the `before`, `on` and `after`
  /// handlers run in that order, each awaited before the next starts. The first handler
  /// error aborts the run and is returned unchanged; `PipelineControl::Stop` ends the run
  /// with `PipelineResult::Stopped`.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(
            pipeline_context_data_type = %std::any::type_name::<TData>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "pipeline_step_execution",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );

      let outcome = self.run_step(step_def, &ctx_data).instrument(step_span).await?;
      if outcome == PipelineControl::Stop {
        return Ok(PipelineResult::Stopped);
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: &ContextData<TData>) -> Result<PipelineControl, Err> {
    if step_def.should_skip(ctx_data) {
      event!(Level::INFO, "Step skipped due to 'skip_if' condition.");
      return Ok(PipelineControl::Continue);
    }

    if !self.has_any_handler(&step_def.name) {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(PipelineControl::Continue);
      }
      event!(Level::ERROR, "Non-optional step has no handlers.");
      return Err(Err::from(ReflowError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for phase in Phase::ALL {
      for (handler_idx, handler_fn) in self.handlers_for(&step_def.name, phase).iter().enumerate() {
        let handler_span = span!(Level::DEBUG, "step_handler", phase = phase.as_str(), handler_index = handler_idx);
        match handler_fn(ctx_data.clone()).instrument(handler_span).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => {
            event!(Level::INFO, phase = phase.as_str(), "Pipeline stopped by a handler.");
            return Ok(PipelineControl::Stop);
          }
          Err(e) => {
            event!(Level::ERROR, phase = phase.as_str(), error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Step processing finished successfully.");
    Ok(PipelineControl::Continue)
  }
}
