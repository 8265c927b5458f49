//! Automation plan: the ordered, delay-separated command steps run on a transition.
//!
//! A plan has two branches: one for a person entering the room and one for
//! the room becoming empty. Plans are immutable configuration; the
//! sequencer in `roomwatch-app` walks them step by step.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::{Command, Device, RemoteKey};
use crate::error::ValidationError;
use crate::streaming::StreamingApp;

/// What a single step asks the backend to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Send a command to a device.
    Send { device: Device, command: Command },
    /// Switch a device to an input or app source.
    SelectSource { device: Device, source: String },
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send { device, command } => write!(f, "send({device}, {command})"),
            Self::SelectSource { device, source } => write!(f, "select_source({device}, {source})"),
        }
    }
}

/// Observable phase of a running sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    PoweringOn,
    PoweringOff,
    NavigatingHome,
    Settling,
    SelectingSource,
    /// `press` counts from 1.
    Confirming {
        press: u8,
    },
    PressingKey {
        key: RemoteKey,
    },
}

/// One element of a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    pub action: StepAction,
    /// Pause after this step, before the next one starts.
    pub delay_after: Option<Duration>,
    pub phase: Phase,
}

impl CommandStep {
    /// Phase reported while waiting out [`delay_after`](Self::delay_after).
    #[must_use]
    pub fn waiting_phase(&self) -> Phase {
        match self.phase {
            Phase::NavigatingHome => Phase::Settling,
            other => other,
        }
    }
}

/// Tunables for the standard plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSettings {
    /// Source id selected once the player is home.
    pub source: String,
    /// Wait after navigating home, while the display wakes up.
    pub settle_delay: Duration,
    /// How many times to press CENTER once the app is selected.
    pub confirm_presses: u8,
    /// Wait after each CENTER press.
    pub confirm_interval: Duration,
}

impl Default for SequenceSettings {
    fn default() -> Self {
        Self {
            source: StreamingApp::default().source_id().to_string(),
            settle_delay: Duration::from_secs(5),
            confirm_presses: 2,
            confirm_interval: Duration::from_secs(1),
        }
    }
}

/// The two branches run on a presence transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationPlan {
    pub on_enter: Vec<CommandStep>,
    pub on_leave: Vec<CommandStep>,
}

impl AutomationPlan {
    /// Create a builder for a single branch.
    #[must_use]
    pub fn branch() -> BranchBuilder {
        BranchBuilder::default()
    }

    /// Build the standard plan.
    ///
    /// Entering: power on the display, go home on the media player, settle,
    /// select the source, then press CENTER `confirm_presses` times.
    /// Leaving: power off the display.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySource`] when `settings.source` is empty.
    pub fn standard(settings: &SequenceSettings) -> Result<Self, ValidationError> {
        if settings.source.trim().is_empty() {
            return Err(ValidationError::EmptySource);
        }

        let mut enter = Self::branch()
            .send(Device::Display, Command::PowerOn)
            .send(Device::MediaPlayer, Command::Key(RemoteKey::Home))
            .then_wait(settings.settle_delay)
            .select_source(Device::MediaPlayer, settings.source.clone());
        for _ in 0..settings.confirm_presses {
            enter = enter
                .send(Device::MediaPlayer, Command::Key(RemoteKey::Center))
                .then_wait(settings.confirm_interval);
        }

        let leave = Self::branch().send(Device::Display, Command::PowerOff);

        let plan = Self {
            on_enter: enter.build(),
            on_leave: leave.build(),
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Check that both branches have at least one step.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyBranch`] naming the empty branch.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.on_enter.is_empty() {
            return Err(ValidationError::EmptyBranch("on_enter"));
        }
        if self.on_leave.is_empty() {
            return Err(ValidationError::EmptyBranch("on_leave"));
        }
        Ok(())
    }

    /// Steps to run for the given presence value.
    #[must_use]
    pub fn steps_for(&self, person_in_room: bool) -> &[CommandStep] {
        if person_in_room {
            &self.on_enter
        } else {
            &self.on_leave
        }
    }
}

/// Step-by-step builder for one branch of an [`AutomationPlan`].
#[derive(Debug, Default)]
pub struct BranchBuilder {
    steps: Vec<CommandStep>,
    confirms: u8,
}

impl BranchBuilder {
    #[must_use]
    pub fn send(mut self, device: Device, command: Command) -> Self {
        let phase = match command {
            Command::PowerOn => Phase::PoweringOn,
            Command::PowerOff => Phase::PoweringOff,
            Command::Key(RemoteKey::Home) => Phase::NavigatingHome,
            Command::Key(RemoteKey::Center) => {
                self.confirms = self.confirms.saturating_add(1);
                Phase::Confirming {
                    press: self.confirms,
                }
            }
            Command::Key(key) => Phase::PressingKey { key },
        };
        self.steps.push(CommandStep {
            action: StepAction::Send { device, command },
            delay_after: None,
            phase,
        });
        self
    }

    #[must_use]
    pub fn select_source(mut self, device: Device, source: impl Into<String>) -> Self {
        self.steps.push(CommandStep {
            action: StepAction::SelectSource {
                device,
                source: source.into(),
            },
            delay_after: None,
            phase: Phase::SelectingSource,
        });
        self
    }

    /// Attach a pause to the most recently added step.
    ///
    /// Has no effect on an empty branch.
    #[must_use]
    pub fn then_wait(mut self, delay: Duration) -> Self {
        if let Some(last) = self.steps.last_mut() {
            last.delay_after = Some(delay);
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<CommandStep> {
        self.steps
    }
}
