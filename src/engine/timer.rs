use std::time::Duration;

use crate::error::{ActionError, ActionResult};

pub const PRESET_MINUTES: &[u32] = &[25, 45, 60, 90];
pub const MAX_CUSTOM_MINUTES: u32 = 180;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Study countdown measured in whole seconds.
#[derive(Clone, Debug)]
pub struct CountdownTimer {
    default_secs: u32,
    /// Length of the current countdown, for progress display.
    duration_secs: u32,
    remaining_secs: u32,
    state: TimerState,
    /// Elapsed time not yet converted into a whole second.
    carry: Duration,
}

impl CountdownTimer {
    pub fn new(default_minutes: u32) -> Self {
        let secs = default_minutes * 60;
        Self {
            default_secs: secs,
            duration_secs: secs,
            remaining_secs: secs,
            state: TimerState::Idle,
            carry: Duration::ZERO,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn start(&mut self) {
        match self.state {
            TimerState::Idle | TimerState::Paused if self.remaining_secs > 0 => {
                self.state = TimerState::Running;
            }
            _ => {}
        }
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.duration_secs = self.default_secs;
        self.remaining_secs = self.default_secs;
        self.carry = Duration::ZERO;
    }

    /// Load a new duration. Rejected while running and for minutes outside
    /// `1..=180`.
    pub fn set_minutes(&mut self, minutes: u32) -> ActionResult<()> {
        if self.is_running() {
            return Err(ActionError::invalid("stop the timer before changing it"));
        }
        if minutes == 0 || minutes > MAX_CUSTOM_MINUTES {
            return Err(ActionError::invalid(format!(
                "minutes must be between 1 and {MAX_CUSTOM_MINUTES}"
            )));
        }
        self.state = TimerState::Idle;
        self.duration_secs = minutes * 60;
        self.remaining_secs = self.duration_secs;
        self.carry = Duration::ZERO;
        Ok(())
    }

    /// Advance by `elapsed` wall-clock time. Only a running timer moves.
    pub fn tick(&mut self, elapsed: Duration) {
        if self.state != TimerState::Running {
            return;
        }
        self.carry += elapsed;
        let whole = self.carry.as_secs();
        if whole == 0 {
            return;
        }
        self.carry -= Duration::from_secs(whole);
        let whole = u32::try_from(whole).unwrap_or(u32::MAX);
        self.remaining_secs = self.remaining_secs.saturating_sub(whole);
        if self.remaining_secs == 0 {
            self.state = TimerState::Expired;
            self.carry = Duration::ZERO;
        }
    }

    pub fn format_mm_ss(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    /// Fraction of the current countdown already spent.
    pub fn elapsed_ratio(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        1.0 - self.remaining_secs as f64 / self.duration_secs as f64
    }
}
