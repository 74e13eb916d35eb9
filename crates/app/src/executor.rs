//! Group executor — one execution task per addressable group.
//!
//! Each executor owns its group's light state and a FIFO queue of pending
//! pipelines. A dedicated tokio task walks the current pipeline's stages,
//! expands repeats, interpolates transitions, invokes callbacks, and
//! requests a send slot from the shared [`BridgeScheduler`] for every
//! command it forwards to the transport.
//!
//! Cancellation is cooperative: `stop()` cancels a per-run token that the
//! loop checks between stages, between transition steps, and during waits.
//! No error escapes the task — transport and callback failures are logged,
//! reported on the event bus, and execution continues.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use glowctl_domain::command::{Command, DeviceCommand, TransitionTarget};
use glowctl_domain::error::EnqueueError;
use glowctl_domain::event::{BridgeEvent, BridgeEventKind};
use glowctl_domain::group::GroupDescriptor;
use glowctl_domain::id::PipelineId;
use glowctl_domain::pipeline::Pipeline;
use glowctl_domain::state::GroupState;

use crate::event_bus::EventBus;
use crate::ports::{CommandEncoder, Transport};
use crate::scheduler::BridgeScheduler;
use crate::transition::TransitionPlan;

/// A pipeline run accepted onto the queue.
struct Job {
    id: PipelineId,
    pipeline: Pipeline,
}

/// How a pipeline run ended.
enum Outcome {
    Completed,
    Stopped,
}

/// Handle to a group's execution task.
///
/// `enqueue` never blocks; the task executes queued pipelines strictly FIFO.
/// Dropping the handle (or calling [`shutdown`](Self::shutdown)) closes the
/// queue; the task drains pipelines already accepted and then exits.
pub struct GroupExecutor {
    descriptor: GroupDescriptor,
    queue: mpsc::UnboundedSender<Job>,
    current_stop: watch::Receiver<CancellationToken>,
    state: watch::Receiver<GroupState>,
    task: JoinHandle<()>,
}

impl GroupExecutor {
    /// Spawn the execution task for a group.
    ///
    /// All executors attached to one physical bridge must share the same
    /// `scheduler`; that is the sole cross-group synchronization point.
    #[must_use]
    pub fn spawn<T, E>(
        descriptor: GroupDescriptor,
        scheduler: Arc<BridgeScheduler>,
        transport: Arc<T>,
        encoder: E,
        events: EventBus,
    ) -> Self
    where
        T: Transport,
        E: CommandEncoder,
    {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(CancellationToken::new());
        let (state_tx, state_rx) = watch::channel(GroupState::default());

        let task = ExecutorTask {
            descriptor: descriptor.clone(),
            state: GroupState::default(),
            state_tx,
            stop_tx,
            queue: queue_rx,
            scheduler,
            transport,
            encoder,
            events,
        };

        Self {
            descriptor,
            queue: queue_tx,
            current_stop: stop_rx,
            state: state_rx,
            task: tokio::spawn(task.run()),
        }
    }

    /// The group this executor drives.
    #[must_use]
    pub fn descriptor(&self) -> &GroupDescriptor {
        &self.descriptor
    }

    /// Append a pipeline to the tail of the queue.
    ///
    /// Returns the id assigned to this run, usable to match lifecycle events
    /// from the bridge's event bus.
    ///
    /// # Errors
    ///
    /// Returns [`EnqueueError::Unsupported`] when the pipeline uses a
    /// command outside the group's bulb-family capabilities, or
    /// [`EnqueueError::Closed`] when the executor has been shut down.
    pub fn enqueue(&self, pipeline: Pipeline) -> Result<PipelineId, EnqueueError> {
        pipeline.check_support(self.descriptor.kind)?;
        let id = PipelineId::new();
        self.queue
            .send(Job { id, pipeline })
            .map_err(|_| EnqueueError::Closed)?;
        Ok(id)
    }

    /// Request cancellation of the currently executing pipeline.
    ///
    /// The in-progress stage finishes or aborts at the next checkpoint, the
    /// rest of that pipeline is discarded, and the task proceeds to the next
    /// queued pipeline. A no-op when the executor is idle.
    pub fn stop(&self) {
        self.current_stop.borrow().cancel();
    }

    /// Snapshot of the group's current light state.
    #[must_use]
    pub fn state(&self) -> GroupState {
        *self.state.borrow()
    }

    /// Close the queue and wait for the task to finish draining it.
    pub async fn shutdown(self) {
        let Self {
            descriptor,
            queue,
            task,
            ..
        } = self;
        drop(queue);
        if let Err(err) = task.await {
            tracing::warn!(group = %descriptor, %err, "executor task ended abnormally");
        }
    }
}

/// The task side of a [`GroupExecutor`].
struct ExecutorTask<T, E> {
    descriptor: GroupDescriptor,
    state: GroupState,
    state_tx: watch::Sender<GroupState>,
    stop_tx: watch::Sender<CancellationToken>,
    queue: mpsc::UnboundedReceiver<Job>,
    scheduler: Arc<BridgeScheduler>,
    transport: Arc<T>,
    encoder: E,
    events: EventBus,
}

impl<T, E> ExecutorTask<T, E>
where
    T: Transport,
    E: CommandEncoder,
{
    async fn run(mut self) {
        while let Some(job) = self.queue.recv().await {
            let stop = CancellationToken::new();
            let _ = self.stop_tx.send(stop.clone());

            self.scheduler.pipeline_started();
            tracing::info!(group = %self.descriptor, pipeline = %job.id, "starting pipeline");
            self.publish(job.id, BridgeEventKind::PipelineStarted);

            match self.run_pipeline(&job, &stop).await {
                Outcome::Completed => {
                    tracing::info!(group = %self.descriptor, pipeline = %job.id, "finished pipeline");
                    self.publish(job.id, BridgeEventKind::PipelineCompleted);
                }
                Outcome::Stopped => {
                    tracing::info!(group = %self.descriptor, pipeline = %job.id, "stopped pipeline");
                    self.publish(job.id, BridgeEventKind::PipelineStopped);
                }
            }
            self.scheduler.pipeline_finished();
        }
        tracing::debug!(group = %self.descriptor, "queue closed, executor exiting");
    }

    async fn run_pipeline(&mut self, job: &Job, stop: &CancellationToken) -> Outcome {
        let stages = job.pipeline.stages();
        // Remaining replays per repeat stage, keyed by stage index. Entries
        // are removed on completion so an outer repeat rewinding over an
        // inner one re-arms it.
        let mut remaining: HashMap<usize, Option<u32>> = HashMap::new();
        let mut cursor = 0;

        while let Some(stage) = stages.get(cursor) {
            if stop.is_cancelled() {
                return Outcome::Stopped;
            }
            tracing::debug!(group = %self.descriptor, stage = %stage, "running stage");

            match stage.command() {
                Command::On => self.apply(&DeviceCommand::On, job.id).await,
                Command::Off => self.apply(&DeviceCommand::Off, job.id).await,
                Command::Brightness(level) => {
                    self.apply(&DeviceCommand::Brightness { level: *level }, job.id)
                        .await;
                }
                Command::Temperature(level) => {
                    self.apply(&DeviceCommand::Temperature { level: *level }, job.id)
                        .await;
                }
                Command::Hue(value) => {
                    self.apply(&DeviceCommand::Hue { value: *value }, job.id)
                        .await;
                }
                Command::Transition { target, duration } => {
                    self.run_transition(target, *duration, job.id, stop).await;
                }
                Command::Wait(duration) => {
                    sleep_cancellable(stop, *duration).await;
                }
                Command::Repeat {
                    stages_back,
                    iterations,
                } => {
                    let replay = match remaining.entry(cursor).or_insert(*iterations) {
                        None => true,
                        Some(left) if *left > 0 => {
                            *left -= 1;
                            true
                        }
                        Some(_) => false,
                    };
                    if replay {
                        cursor -= *stages_back;
                        continue;
                    }
                    remaining.remove(&cursor);
                }
                Command::Callback(handle) => {
                    // Caught panics are demoted to failures so a misbehaving
                    // callback cannot tear down the group task.
                    let failure = match panic::catch_unwind(AssertUnwindSafe(|| handle.call())) {
                        Ok(Ok(())) => None,
                        Ok(Err(err)) => Some(err.to_string()),
                        Err(payload) => Some(panic_message(payload.as_ref())),
                    };
                    if let Some(message) = failure {
                        tracing::warn!(group = %self.descriptor, error = %message, "callback failed");
                        self.publish(job.id, BridgeEventKind::CallbackFailed { message });
                    }
                }
            }
            cursor += 1;
        }

        if stop.is_cancelled() {
            Outcome::Stopped
        } else {
            Outcome::Completed
        }
    }

    /// Mutate owned state, encode, wait for a send slot, forward.
    async fn apply(&mut self, command: &DeviceCommand, pipeline: PipelineId) {
        self.state.apply(command);
        let _ = self.state_tx.send(self.state);

        let payload = self.encoder.encode(&self.descriptor, command);
        self.scheduler.acquire_slot().await;
        if let Err(err) = self.transport.send(&payload).await {
            tracing::warn!(group = %self.descriptor, %err, "failed to deliver command");
            self.publish(
                pipeline,
                BridgeEventKind::SendFailed {
                    message: err.to_string(),
                },
            );
        }
    }

    async fn run_transition(
        &mut self,
        target: &TransitionTarget,
        duration: Duration,
        pipeline: PipelineId,
        stop: &CancellationToken,
    ) {
        let plan = TransitionPlan::build(
            &self.state,
            target,
            duration,
            self.scheduler.min_interval(),
            self.scheduler.active_pipelines(),
        );
        if plan.is_noop() {
            return;
        }

        for index in plan.first_index()..=plan.steps() {
            if stop.is_cancelled() {
                return;
            }
            for command in plan.commands_at(index) {
                self.apply(&command, pipeline).await;
            }
            if index < plan.steps() && sleep_cancellable(stop, plan.step_delay()).await {
                return;
            }
        }
    }

    fn publish(&self, pipeline: PipelineId, kind: BridgeEventKind) {
        self.events.publish(BridgeEvent::new(
            self.descriptor.name.clone(),
            self.descriptor.zone,
            pipeline,
            kind,
        ));
    }
}

/// Render a caught panic payload for logs and events.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("callback panicked: {text}")
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("callback panicked: {text}")
    } else {
        "callback panicked".to_string()
    }
}

/// Sleep that ends early when the stop token fires. Returns `true` when
/// cancelled.
async fn sleep_cancellable(stop: &CancellationToken, duration: Duration) -> bool {
    stop.run_until_cancelled(tokio::time::sleep(duration))
        .await
        .is_none()
}
