use std::time::Duration;

use chrono::{DateTime, Local};

use crate::catalog::AppItemSpec;
use crate::engine::blocker::{self, BlockList, BlockMode};
use crate::engine::timer::{CountdownTimer, PRESET_MINUTES, TimerState};
use crate::error::{ActionError, ActionResult};
use crate::ui::line_input::LineInput;

/// Text prompt shown over the Distractions page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    SupervisorEmail,
    BlockUntil,
    CustomMinutes,
    UnblockConfirmation,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::SupervisorEmail => "Supervisor email",
            PromptKind::BlockUntil => "Block until (HH:MM or YYYY-MM-DD HH:MM)",
            PromptKind::CustomMinutes => "Custom study minutes (1-180)",
            PromptKind::UnblockConfirmation => "Supervisor email to unblock",
        }
    }
}

pub struct Prompt {
    pub kind: PromptKind,
    pub input: LineInput,
}

/// State of the Distractions page: the block list, the study timer and
/// whichever prompt is open. Dropped when the page is left, which stops the
/// timer with it.
pub struct FocusSession {
    pub blocks: BlockList,
    pub timer: CountdownTimer,
    pub app_cursor: usize,
    pub prompt: Option<Prompt>,
}

impl FocusSession {
    pub fn new(apps: &[AppItemSpec], timer_default_minutes: u32) -> Self {
        Self {
            blocks: BlockList::new(apps),
            timer: CountdownTimer::new(timer_default_minutes),
            app_cursor: 0,
            prompt: None,
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.blocks.items().len();
        if len == 0 {
            return;
        }
        self.app_cursor = (self.app_cursor as isize + delta).rem_euclid(len as isize) as usize;
    }

    pub fn toggle_selected(&mut self) -> ActionResult<bool> {
        self.blocks.toggle(self.app_cursor)
    }

    pub fn cycle_mode(&mut self) -> ActionResult<BlockMode> {
        let next = match self.blocks.mode() {
            BlockMode::StudyPlan => BlockMode::SpecificTime,
            BlockMode::SpecificTime => BlockMode::StudyPlan,
        };
        self.blocks.set_mode(next)?;
        Ok(next)
    }

    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt {
            kind,
            input: LineInput::new(""),
        });
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Block everything with the current mode. A specific-time block needs
    /// an end time first, so this opens the prompt for it and returns false.
    pub fn request_block(&mut self, now: DateTime<Local>) -> ActionResult<bool> {
        match self.blocks.mode() {
            BlockMode::StudyPlan => {
                self.blocks
                    .activate_global_block(BlockMode::StudyPlan, None, now)?;
                Ok(true)
            }
            BlockMode::SpecificTime => {
                self.open_prompt(PromptKind::BlockUntil);
                Ok(false)
            }
        }
    }

    /// Lift the global block. Under supervision this opens the confirmation
    /// prompt and returns false.
    pub fn request_unblock(&mut self) -> ActionResult<bool> {
        if !self.blocks.is_globally_blocked() {
            return Err(ActionError::invalid("nothing is blocked"));
        }
        if self.blocks.is_supervised() {
            self.open_prompt(PromptKind::UnblockConfirmation);
            return Ok(false);
        }
        self.blocks.deactivate_global_block(None)?;
        Ok(true)
    }

    /// Apply the open prompt. On error the prompt stays open with its text
    /// so it can be corrected.
    pub fn submit_prompt(&mut self, now: DateTime<Local>) -> ActionResult<PromptKind> {
        let Some(prompt) = self.prompt.as_ref() else {
            return Err(ActionError::invalid("no prompt is open"));
        };
        let kind = prompt.kind;
        let text = prompt.input.value().to_string();
        match kind {
            PromptKind::SupervisorEmail => self.blocks.set_supervisor(&text)?,
            PromptKind::BlockUntil => {
                let until = blocker::parse_until(&text, now)?;
                self.blocks
                    .activate_global_block(BlockMode::SpecificTime, Some(until), now)?;
            }
            PromptKind::CustomMinutes => {
                let minutes = text
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ActionError::invalid(format!("'{}' is not a number", text.trim())))?;
                self.timer.set_minutes(minutes)?;
            }
            PromptKind::UnblockConfirmation => {
                if let Err(e) = self.blocks.deactivate_global_block(Some(text.trim())) {
                    // A wrong confirmation must be retyped from scratch.
                    if let Some(p) = self.prompt.as_mut() {
                        p.input.clear();
                    }
                    return Err(e);
                }
            }
        }
        self.prompt = None;
        Ok(kind)
    }

    /// Load preset `n` (0-based) into the timer.
    pub fn apply_preset(&mut self, n: usize) -> ActionResult<u32> {
        let minutes = *PRESET_MINUTES
            .get(n)
            .ok_or_else(|| ActionError::invalid(format!("no preset {}", n + 1)))?;
        self.timer.set_minutes(minutes)?;
        Ok(minutes)
    }

    pub fn toggle_timer(&mut self) {
        if self.timer.is_running() {
            self.timer.pause();
        } else {
            self.timer.start();
        }
    }

    /// Advance the timer. Returns true on the tick that expires it.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let was_running = self.timer.is_running();
        self.timer.tick(elapsed);
        was_running && self.timer.state() == TimerState::Expired
    }
}
