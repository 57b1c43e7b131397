use std::time::Instant;

use chrono::Local;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{Catalog, VocabularyCategory};
use crate::config::Config;
use crate::engine::navigation::{self, Action, MenuEntry, Page};
use crate::error::{ActionError, ActionResult};
use crate::session::chat::{ChatSession, ChatStep};
use crate::session::focus::FocusSession;
use crate::session::login::LoginForm;
use crate::session::quiz::QuizSession;
use crate::ui::components::menu::Menu;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One-line message shown in the footer until the next key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaderboardTab {
    Rankings,
    Competitions,
}

impl LeaderboardTab {
    pub fn toggle(self) -> Self {
        match self {
            LeaderboardTab::Rankings => LeaderboardTab::Competitions,
            LeaderboardTab::Competitions => LeaderboardTab::Rankings,
        }
    }
}

/// Application shell. `dispatch` is the only place the page changes; view
/// sessions are built when their page is entered and dropped when it is
/// left, which also cancels their pending work.
pub struct App {
    pub page: Page,
    pub catalog: &'static Catalog,
    pub theme: &'static Theme,
    pub config: Config,
    pub menu: Menu<'static>,
    pub login: LoginForm,
    pub user: Option<String>,
    /// Highlighted row on the subject, unit and category pickers.
    pub list_cursor: usize,
    pub quiz: Option<QuizSession>,
    pub chat: Option<ChatSession<'static>>,
    pub chat_input: LineInput,
    pub focus: Option<FocusSession>,
    pub leaderboard_tab: LeaderboardTab,
    pub notice: Option<Notice>,
    pub should_quit: bool,
    rng: SmallRng,
    last_tick: Option<Instant>,
}

impl App {
    pub fn new(
        config: Config,
        catalog: &'static Catalog,
        theme: &'static Theme,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            page: Page::Login,
            catalog,
            theme,
            config,
            menu: Menu::new(theme),
            login: LoginForm::default(),
            user: None,
            list_cursor: 0,
            quiz: None,
            chat: None,
            chat_input: LineInput::default(),
            focus: None,
            leaderboard_tab: LeaderboardTab::Rankings,
            notice: None,
            should_quit: false,
            rng,
            last_tick: None,
        }
    }

    /// Apply a navigation action. Actions that do not fit the current page
    /// change nothing.
    pub fn dispatch(&mut self, action: Action) {
        let next = navigation::transition(&self.page, action.clone(), self.catalog);
        if next == self.page {
            tracing::debug!(?action, page = self.page.title(), "navigation action ignored");
            return;
        }
        tracing::info!(from = self.page.title(), to = next.title(), ?action, "navigate");
        let previous = std::mem::replace(&mut self.page, next);
        self.leave_page(&previous);
        self.enter_page(&previous);
    }

    fn leave_page(&mut self, previous: &Page) {
        match previous {
            Page::Vocabulary { .. } => self.quiz = None,
            Page::Chatbot => {
                if let Some(chat) = self.chat.as_mut() {
                    chat.cancel_pending();
                }
                self.chat = None;
            }
            Page::Distractions => self.focus = None,
            _ => {}
        }
    }

    fn enter_page(&mut self, previous: &Page) {
        self.list_cursor = self.cursor_for(previous);
        match &self.page {
            Page::Vocabulary {
                subject,
                unit,
                category,
            } => {
                let questions = self
                    .catalog
                    .quiz_bank(subject, *unit, *category)
                    .map(|b| b.questions.clone())
                    .unwrap_or_default();
                self.quiz = Some(QuizSession::new(*category, questions));
            }
            Page::Chatbot => {
                let rng = SmallRng::seed_from_u64(self.rng.r#gen());
                self.chat_input.clear();
                self.chat = Some(ChatSession::new(
                    self.catalog,
                    rng,
                    self.config.reply_delay(),
                    self.config.next_exercise_delay(),
                ));
            }
            Page::Distractions => {
                self.focus = Some(FocusSession::new(
                    &self.catalog.apps,
                    self.config.timer_default_minutes,
                ));
            }
            _ => {}
        }
    }

    /// Keep the highlight on the entry we came back from.
    fn cursor_for(&self, previous: &Page) -> usize {
        let pos = match (&self.page, previous) {
            (Page::Subjects, Page::Units { subject })
            | (Page::Subjects, Page::VocabularySelection { subject, .. })
            | (Page::Subjects, Page::Vocabulary { subject, .. }) => {
                self.catalog.subjects.iter().position(|s| &s.id == subject)
            }
            (Page::Units { .. }, Page::VocabularySelection { unit, .. })
            | (Page::Units { .. }, Page::Vocabulary { unit, .. }) => {
                self.catalog.units.iter().position(|u| u.id == *unit)
            }
            (Page::VocabularySelection { .. }, Page::Vocabulary { category, .. }) => {
                VocabularyCategory::all().iter().position(|c| c == category)
            }
            _ => None,
        };
        pos.unwrap_or(0)
    }

    pub fn submit_login(&mut self) {
        let result = self.login.submit();
        if let Some(user) = self.report(result) {
            tracing::info!(user = %user, "signed in");
            self.menu.greeting = Some(user.clone());
            self.user = Some(user);
            self.login = LoginForm::default();
            self.dispatch(Action::Login);
        }
    }

    pub fn select_menu_entry(&mut self) {
        if let Some(entry) = MenuEntry::all().get(self.menu.selected).copied() {
            self.dispatch(Action::SelectMenu(entry));
        }
    }

    /// Number of rows on the current picker page.
    pub fn picker_len(&self) -> usize {
        match &self.page {
            Page::Subjects => self.catalog.subjects.len(),
            Page::Units { .. } => self.catalog.units.len(),
            Page::VocabularySelection { .. } => VocabularyCategory::all().len(),
            _ => 0,
        }
    }

    pub fn move_picker(&mut self, delta: isize) {
        let len = self.picker_len();
        if len == 0 {
            return;
        }
        self.list_cursor = (self.list_cursor as isize + delta).rem_euclid(len as isize) as usize;
    }

    /// Act on the highlighted picker row.
    pub fn activate_picker(&mut self) {
        let action = match &self.page {
            Page::Subjects => self
                .catalog
                .subjects
                .get(self.list_cursor)
                .map(|s| Action::SelectSubject(s.id.clone())),
            Page::Units { subject } => {
                let Some(unit) = self.catalog.units.get(self.list_cursor) else {
                    return;
                };
                if !self.catalog.unit_is_open(subject, unit.id) {
                    self.info(format!("{} is coming soon", unit.name));
                    return;
                }
                Some(Action::SelectUnit(unit.id))
            }
            Page::VocabularySelection { .. } => VocabularyCategory::all()
                .get(self.list_cursor)
                .map(|c| Action::SelectVocabulary(*c)),
            _ => None,
        };
        if let Some(action) = action {
            self.dispatch(action);
        }
    }

    /// Back key: one level up in the selection chain, or to the menu.
    pub fn go_back(&mut self) {
        let action = match &self.page {
            Page::Login => return,
            Page::MainMenu => {
                self.should_quit = true;
                return;
            }
            Page::Units { .. } => Action::BackToSubjects,
            Page::VocabularySelection { .. } => Action::BackToUnits,
            Page::Vocabulary { .. } => Action::BackToVocabSelection,
            Page::Chatbot => {
                if self.chat.as_mut().is_some_and(|c| c.back()) {
                    return;
                }
                Action::BackToMenu
            }
            _ => Action::BackToMenu,
        };
        self.dispatch(action);
    }

    pub fn quiz_select(&mut self, option: usize) {
        if let Some(quiz) = self.quiz.as_mut() {
            if let Some(eval) = quiz.select(option) {
                tracing::debug!(option, correct = eval.correct, "quiz answer");
            }
        }
    }

    pub fn quiz_next(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        if !quiz.next() && !quiz.is_finished() {
            self.info("Pick an answer first");
        } else if quiz.is_finished() {
            tracing::info!(score = quiz.score(), total = quiz.total(), "quiz finished");
        }
    }

    pub fn chat_choose(&mut self) {
        let Some(chat) = self.chat.as_mut() else {
            return;
        };
        let result = match chat.step().clone() {
            ChatStep::ChooseSubject => match self.catalog.subjects.get(chat.list_cursor) {
                Some(s) => chat.choose_subject(&s.id),
                None => Ok(()),
            },
            ChatStep::ChooseUnit { .. } => match self.catalog.tutor.units.get(chat.list_cursor) {
                Some(u) => chat.choose_unit(u.id),
                None => Ok(()),
            },
            ChatStep::Conversation { .. } => Ok(()),
        };
        self.report(result);
    }

    pub fn move_chat_cursor(&mut self, delta: isize) {
        let Some(chat) = self.chat.as_mut() else {
            return;
        };
        let len = match chat.step() {
            ChatStep::ChooseSubject => self.catalog.subjects.len(),
            ChatStep::ChooseUnit { .. } => self.catalog.tutor.units.len(),
            ChatStep::Conversation { .. } => return,
        };
        if len > 0 {
            chat.list_cursor = (chat.list_cursor as isize + delta).rem_euclid(len as isize) as usize;
        }
    }

    /// Submit the chat input line: an answer while an exercise is waiting,
    /// otherwise a message to the tutor.
    pub fn chat_submit(&mut self, text: &str, now: Instant) {
        let Some(chat) = self.chat.as_mut() else {
            return;
        };
        if chat.awaiting_answer() {
            let result = chat.answer_exercise(text, now);
            if let Some(eval) = self.report(result) {
                tracing::debug!(correct = eval.correct, "exercise answered");
            }
        } else {
            chat.send(text, now);
        }
    }

    /// Advance the timer and deliver due chat replies for the active page.
    pub fn on_tick(&mut self, now: Instant) {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        if let Some(chat) = self.chat.as_mut() {
            chat.poll(now);
        }
        let mut expired = false;
        if let Some(focus) = self.focus.as_mut() {
            expired = focus.tick(elapsed);
        }
        if expired {
            tracing::info!("study timer finished");
            self.info("Study session finished. Take a break!");
        }
    }

    pub fn focus_action<T>(
        &mut self,
        f: impl FnOnce(&mut FocusSession) -> ActionResult<T>,
    ) -> Option<T> {
        let result = self.focus.as_mut().map(f)?;
        self.report(result)
    }

    pub fn focus_block(&mut self) {
        let now = Local::now();
        if self.focus_action(|f| f.request_block(now)) == Some(true) {
            self.info("All apps blocked");
        }
    }

    pub fn focus_unblock(&mut self) {
        if self.focus_action(|f| f.request_unblock()) == Some(true) {
            self.info("Apps unblocked");
        }
    }

    pub fn focus_submit_prompt(&mut self) {
        let now = Local::now();
        if let Some(kind) = self.focus_action(|f| f.submit_prompt(now)) {
            tracing::info!(?kind, "distractions prompt applied");
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Info,
            text: text.into(),
        });
    }

    /// Surface an action error in the footer and log it.
    pub fn report<T>(&mut self, result: ActionResult<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(error = %e, page = self.page.title(), "action rejected");
                self.notice = Some(Notice {
                    kind: NoticeKind::Error,
                    text: notice_text(&e),
                });
                None
            }
        }
    }
}

fn notice_text(e: &ActionError) -> String {
    match e {
        ActionError::InvalidInput(reason) => capitalize(reason),
        other => capitalize(&other.to_string()),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
