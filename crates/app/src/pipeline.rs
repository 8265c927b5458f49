//! Presence pipeline: thread and queue lifecycle for the sampling side.
//!
//! Two OS threads share a single bounded FIFO queue:
//!
//! ```text
//! SampleSource ─▶ [aggregator thread] ─(WindowMessage)─▶ [voter thread] ─▶ TransitionNotifier
//! ```
//!
//! The queue is the only state the two threads share. Shutdown sets a stop
//! flag, pushes [`WindowMessage::Stop`] to unblock the voter, then joins both
//! threads and hands the [`SampleSource`] back so the caller can release the
//! underlying device.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use roomwatch_domain::error::RoomwatchError;
use roomwatch_domain::presence::{
    DEFAULT_TIME_WINDOW_SECS, HysteresisVote, PresenceState, Window,
};

use crate::aggregator::WindowAggregator;
use crate::ports::{SampleSource, TransitionNotifier};
use crate::voter::PresenceVoter;

/// Message carried on the aggregator → voter queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowMessage {
    /// A completed window to vote on.
    Window(Window),
    /// Terminate the voter loop.
    Stop,
}

/// Tunables for [`PresencePipeline::start`].
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Window span; windows hold `time_window_secs + 1` samples.
    pub time_window_secs: u64,
    pub vote: HysteresisVote,
    /// Pause between two samples. Zero samples as fast as the source allows.
    pub poll_interval: Duration,
    /// Capacity of the aggregator → voter queue.
    pub queue_capacity: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            time_window_secs: DEFAULT_TIME_WINDOW_SECS,
            vote: HysteresisVote::default(),
            poll_interval: Duration::from_millis(100),
            queue_capacity: 4,
        }
    }
}

/// What [`PresencePipeline::shutdown`] recovered from its threads.
///
/// A field is `None` when the corresponding thread panicked.
#[derive(Debug)]
pub struct Stopped<S> {
    pub source: Option<S>,
    pub state: Option<PresenceState>,
}

/// A running sampling pipeline.
pub struct PresencePipeline<S> {
    stop: Arc<AtomicBool>,
    queue: SyncSender<WindowMessage>,
    aggregator: JoinHandle<S>,
    voter: JoinHandle<PresenceState>,
}

impl<S: SampleSource> PresencePipeline<S> {
    /// Spawn the aggregator and voter threads.
    ///
    /// # Errors
    ///
    /// Returns [`RoomwatchError::Validation`] for an unusable window length
    /// and [`RoomwatchError::Thread`] if a thread cannot be spawned.
    pub fn start<N: TransitionNotifier>(
        source: S,
        notifier: N,
        settings: &PipelineSettings,
    ) -> Result<Self, RoomwatchError> {
        let aggregator = WindowAggregator::new(settings.time_window_secs, Instant::now())?;
        let (tx, rx) = mpsc::sync_channel(settings.queue_capacity.max(1));
        let stop = Arc::new(AtomicBool::new(false));

        let voter = PresenceVoter::new(settings.vote, notifier);
        let voter = thread::Builder::new()
            .name("presence-voter".to_string())
            .spawn(move || voter.run(&rx))
            .map_err(RoomwatchError::Thread)?;

        let producer_queue = tx.clone();
        let producer_stop = Arc::clone(&stop);
        let poll_interval = settings.poll_interval;
        let aggregator = thread::Builder::new()
            .name("window-aggregator".to_string())
            .spawn(move || {
                produce(
                    source,
                    aggregator,
                    &producer_queue,
                    &producer_stop,
                    poll_interval,
                )
            });
        let aggregator = match aggregator {
            Ok(handle) => handle,
            Err(err) => {
                let _ = tx.send(WindowMessage::Stop);
                let _ = voter.join();
                return Err(RoomwatchError::Thread(err));
            }
        };

        tracing::info!(
            window_len = settings.time_window_secs + 1,
            threshold = settings.vote.threshold(),
            "presence pipeline started"
        );

        Ok(Self {
            stop,
            queue: tx,
            aggregator,
            voter,
        })
    }

    /// Stop both threads and wait for them.
    ///
    /// Blocks until the aggregator finishes its current sample and the voter
    /// drains the queue up to the stop marker.
    pub fn shutdown(self) -> Stopped<S> {
        self.stop.store(true, Ordering::Release);
        // Fails only if the voter already exited, which is what we want anyway.
        let _ = self.queue.send(WindowMessage::Stop);
        drop(self.queue);

        let source = self.aggregator.join().ok();
        if source.is_none() {
            tracing::error!("window aggregator thread panicked");
        }
        let state = self.voter.join().ok();
        if state.is_none() {
            tracing::error!("presence voter thread panicked");
        }

        tracing::info!("presence pipeline stopped");
        Stopped { source, state }
    }
}

fn produce<S: SampleSource>(
    mut source: S,
    mut aggregator: WindowAggregator,
    queue: &SyncSender<WindowMessage>,
    stop: &AtomicBool,
    poll_interval: Duration,
) -> S {
    while !stop.load(Ordering::Acquire) {
        match source.sample() {
            Ok(sample) => {
                if let Some(window) = aggregator.push(Instant::now(), sample) {
                    if queue.send(WindowMessage::Window(window)).is_err() {
                        tracing::debug!("voter gone, aggregator exiting");
                        break;
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "sample capture failed, skipping cycle");
            }
        }
        if !poll_interval.is_zero() {
            thread::sleep(poll_interval);
        }
    }
    source
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use roomwatch_domain::presence::TransitionEvent;

    use super::*;

    struct ScriptedSource {
        script: Vec<Result<bool, ()>>,
        calls: usize,
    }

    impl ScriptedSource {
        fn always(value: bool) -> Self {
            Self {
                script: vec![Ok(value)],
                calls: 0,
            }
        }
    }

    impl SampleSource for ScriptedSource {
        fn sample(&mut self) -> Result<bool, RoomwatchError> {
            let step = self.script[self.calls % self.script.len()];
            self.calls += 1;
            step.map_err(|()| RoomwatchError::sampling("camera busy"))
        }
    }

    #[derive(Default, Clone)]
    struct SharedNotifier {
        events: Arc<Mutex<Vec<bool>>>,
    }

    impl TransitionNotifier for SharedNotifier {
        fn notify(&self, event: &TransitionEvent) -> Result<(), RoomwatchError> {
            self.events.lock().unwrap().push(event.person_in_room);
            Ok(())
        }
    }

    fn fast_settings() -> PipelineSettings {
        PipelineSettings {
            time_window_secs: 0,
            poll_interval: Duration::from_millis(1),
            ..PipelineSettings::default()
        }
    }

    fn wait_for(notifier: &SharedNotifier, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while notifier.events.lock().unwrap().len() < count && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn should_emit_transition_from_running_threads() {
        let notifier = SharedNotifier::default();
        let pipeline = PresencePipeline::start(
            ScriptedSource::always(true),
            notifier.clone(),
            &fast_settings(),
        )
        .unwrap();

        wait_for(&notifier, 1);
        let stopped = pipeline.shutdown();

        assert_eq!(*notifier.events.lock().unwrap(), [true]);
        assert!(stopped.state.unwrap().in_room);
    }

    #[test]
    fn should_return_source_after_shutdown() {
        let pipeline = PresencePipeline::start(
            ScriptedSource::always(false),
            SharedNotifier::default(),
            &fast_settings(),
        )
        .unwrap();

        let stopped = pipeline.shutdown();
        let source = stopped.source.unwrap();
        assert!(source.calls >= 1);
        assert!(!stopped.state.unwrap().in_room);
    }

    #[test]
    fn should_keep_running_through_sampling_errors() {
        let notifier = SharedNotifier::default();
        let source = ScriptedSource {
            script: vec![Err(()), Ok(true), Err(()), Ok(true)],
            calls: 0,
        };
        let pipeline =
            PresencePipeline::start(source, notifier.clone(), &fast_settings()).unwrap();

        wait_for(&notifier, 1);
        let stopped = pipeline.shutdown();

        assert_eq!(*notifier.events.lock().unwrap(), [true]);
        assert!(stopped.source.unwrap().calls >= 2);
    }

    #[test]
    fn should_stop_promptly_with_idle_queue() {
        let pipeline = PresencePipeline::start(
            ScriptedSource::always(false),
            SharedNotifier::default(),
            &PipelineSettings::default(),
        )
        .unwrap();

        let begun = Instant::now();
        pipeline.shutdown();
        assert!(begun.elapsed() < Duration::from_secs(2));
    }
}
