//! Automation sequencer: runs the automation plan when presence changes.
//!
//! Each trigger walks one branch of the [`AutomationPlan`] step by step,
//! awaiting each backend call and each configured pause. A failing step
//! aborts the rest of the run; nothing is rolled back or retried.
//!
//! Only one run is ever in flight. When a newer trigger arrives mid-run the
//! in-flight run is dropped at its current await point (including a pending
//! pause) and the newer trigger starts immediately. Triggers that pile up
//! while a run is being replaced collapse to the most recent one.

use std::future::Future;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

use roomwatch_domain::error::RoomwatchError;
use roomwatch_domain::id::RunId;
use roomwatch_domain::presence::TransitionEvent;
use roomwatch_domain::sequence::{AutomationPlan, CommandStep, Phase, StepAction};
use roomwatch_domain::time::{Timestamp, now};

use crate::ports::{CommandBackend, TransitionNotifier};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every step succeeded.
    Completed,
    /// The hub reported itself unavailable; no step was attempted.
    Skipped,
    /// A step failed and the remaining steps were abandoned.
    Failed { step: String, error: String },
    /// A newer trigger replaced this run.
    Superseded,
    /// The sequencer shut down mid-run.
    Cancelled,
}

/// Snapshot of the sequencer, published after every phase change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequencerStatus {
    #[serde(flatten)]
    pub phase: Phase,
    pub run_id: Option<RunId>,
    pub last_trigger: Option<bool>,
    pub last_outcome: Option<RunOutcome>,
    pub updated_at: Timestamp,
}

impl Default for SequencerStatus {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            run_id: None,
            last_trigger: None,
            last_outcome: None,
            updated_at: now(),
        }
    }
}

/// Why a run stopped early.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// The availability probe itself failed.
    #[error("hub availability check failed")]
    Availability(#[source] RoomwatchError),

    /// A plan step failed.
    #[error("step {index} `{action}` failed")]
    Step {
        index: usize,
        action: String,
        #[source]
        source: RoomwatchError,
    },
}

/// Executes [`AutomationPlan`] branches against a [`CommandBackend`].
pub struct AutomationSequencer<B> {
    backend: B,
    plan: AutomationPlan,
    status: watch::Sender<SequencerStatus>,
}

impl<B: CommandBackend> AutomationSequencer<B> {
    /// Create an idle sequencer.
    pub fn new(backend: B, plan: AutomationPlan) -> Self {
        let (status, _) = watch::channel(SequencerStatus::default());
        Self {
            backend,
            plan,
            status,
        }
    }

    /// Subscribe to status snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SequencerStatus> {
        self.status.subscribe()
    }

    /// Run the branch for `person_in_room` to completion.
    ///
    /// Returns [`RunOutcome::Skipped`] when the hub is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError`] for the first failing step; later steps are
    /// not attempted.
    pub async fn execute(&self, person_in_room: bool) -> Result<RunOutcome, SequenceError> {
        if !self
            .backend
            .is_available()
            .await
            .map_err(SequenceError::Availability)?
        {
            return Ok(RunOutcome::Skipped);
        }

        for (index, step) in self.plan.steps_for(person_in_room).iter().enumerate() {
            self.set_phase(step.phase);
            tracing::debug!(index, action = %step.action, "running step");
            self.run_step(step)
                .await
                .map_err(|source| SequenceError::Step {
                    index,
                    action: step.action.to_string(),
                    source,
                })?;

            if let Some(delay) = step.delay_after {
                self.set_phase(step.waiting_phase());
                tokio::time::sleep(delay).await;
            }
        }
        Ok(RunOutcome::Completed)
    }

    /// Run one trigger at the sequencer boundary.
    ///
    /// Failures are logged here and never escape; the sequencer always
    /// returns to [`Phase::Idle`].
    pub async fn handle(&self, person_in_room: bool) -> RunOutcome {
        let run_id = RunId::new();
        self.status.send_modify(|status| {
            status.run_id = Some(run_id);
            status.last_trigger = Some(person_in_room);
            status.updated_at = now();
        });

        let span = tracing::info_span!("automation_run", %run_id, person_in_room);
        let outcome = async {
            tracing::info!("automation run started");
            match self.execute(person_in_room).await {
                Ok(RunOutcome::Skipped) => {
                    tracing::warn!("hub unavailable, automation run skipped");
                    RunOutcome::Skipped
                }
                Ok(outcome) => {
                    tracing::info!("automation run completed");
                    outcome
                }
                Err(err) => {
                    let (step, cause) = match &err {
                        SequenceError::Availability(cause) => {
                            ("availability".to_string(), cause)
                        }
                        SequenceError::Step { action, source, .. } => (action.clone(), source),
                    };
                    tracing::error!(error = %err, cause = %cause, "automation run aborted");
                    RunOutcome::Failed {
                        step,
                        error: cause.to_string(),
                    }
                }
            }
        }
        .instrument(span)
        .await;

        self.finish(outcome.clone());
        outcome
    }

    /// Spawn the single-run worker and return a handle to trigger it.
    ///
    /// The worker stops when `shutdown` resolves or every handle is dropped.
    pub fn spawn<F>(self, capacity: usize, shutdown: F) -> (SequencerHandle, JoinHandle<()>)
    where
        B: Send + Sync + 'static,
        F: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(self.run(rx, shutdown));
        (SequencerHandle { tx }, task)
    }

    async fn run<F>(self, mut triggers: mpsc::Receiver<bool>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut pending: Option<bool> = None;

        loop {
            let person_in_room = match pending.take() {
                Some(value) => value,
                None => tokio::select! {
                    () = &mut shutdown => break,
                    next = triggers.recv() => match next {
                        Some(value) => value,
                        None => break,
                    },
                },
            };

            let mut open = true;
            let mut stopping = false;
            {
                let current = self.handle(person_in_room);
                tokio::pin!(current);
                loop {
                    tokio::select! {
                        biased;
                        _ = &mut current => break,
                        () = &mut shutdown => {
                            stopping = true;
                            break;
                        }
                        next = triggers.recv(), if open => match next {
                            Some(value) => {
                                pending = Some(latest(&mut triggers, value));
                                break;
                            }
                            None => open = false,
                        },
                    }
                }
            }

            if stopping {
                self.finish(RunOutcome::Cancelled);
                tracing::info!("automation run cancelled by shutdown");
                break;
            }
            if let Some(next) = pending {
                self.finish(RunOutcome::Superseded);
                tracing::info!(person_in_room = next, "automation run superseded");
            }
            if !open && pending.is_none() {
                break;
            }
        }
        tracing::debug!("automation sequencer stopped");
    }

    async fn run_step(&self, step: &CommandStep) -> Result<(), RoomwatchError> {
        match &step.action {
            StepAction::Send { device, command } => {
                self.backend.send_command(*device, *command).await
            }
            StepAction::SelectSource { device, source } => {
                self.backend.select_source(*device, source).await
            }
        }
    }

    fn set_phase(&self, phase: Phase) {
        self.status.send_modify(|status| {
            status.phase = phase;
            status.updated_at = now();
        });
    }

    fn finish(&self, outcome: RunOutcome) {
        self.status.send_modify(|status| {
            status.phase = Phase::Idle;
            status.last_outcome = Some(outcome);
            status.updated_at = now();
        });
    }
}

/// Drain whatever is queued and keep only the newest trigger.
fn latest(triggers: &mut mpsc::Receiver<bool>, mut value: bool) -> bool {
    while let Ok(newer) = triggers.try_recv() {
        value = newer;
    }
    value
}

/// Cheap, cloneable handle used to trigger the sequencer worker.
#[derive(Debug, Clone)]
pub struct SequencerHandle {
    tx: mpsc::Sender<bool>,
}

impl SequencerHandle {
    /// Queue a trigger without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`RoomwatchError::Delivery`] when the worker has stopped or
    /// its queue is full.
    pub fn trigger(&self, person_in_room: bool) -> Result<(), RoomwatchError> {
        self.tx
            .try_send(person_in_room)
            .map_err(|err| RoomwatchError::delivery(err.to_string()))
    }
}

/// Lets the voter drive the sequencer directly when both run in one process.
impl TransitionNotifier for SequencerHandle {
    fn notify(&self, event: &TransitionEvent) -> Result<(), RoomwatchError> {
        self.trigger(event.person_in_room)
    }
}
