use std::fs;
use std::time::{Duration, Instant};

use motqen::app::{App, NoticeKind};
use motqen::catalog::{Catalog, CatalogError, VocabularyCategory};
use motqen::config::Config;
use motqen::engine::navigation::{Action, MenuEntry, Page};
use motqen::error::ActionError;
use motqen::session::chat::{ChatStep, Sender};
use motqen::session::focus::PromptKind;
use motqen::ui::line_input::LineInput;
use motqen::ui::theme::Theme;

fn new_app(seed: u64) -> App {
    let catalog: &'static Catalog = Box::leak(Box::new(Catalog::embedded().unwrap()));
    let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
    let mut config = Config::default();
    config.timer_default_minutes = 1;
    App::new(config, catalog, theme, Some(seed))
}

fn sign_in(app: &mut App) {
    app.login.username = LineInput::new("omar");
    app.login.password = LineInput::new("secret");
    app.submit_login();
    assert_eq!(app.page, Page::MainMenu);
}

#[test]
fn vocabulary_quiz_round_trip() {
    let mut app = new_app(1);
    sign_in(&mut app);

    app.dispatch(Action::SelectMenu(MenuEntry::Subjects));
    app.activate_picker(); // english
    app.activate_picker(); // unit 1
    app.activate_picker(); // main words
    assert_eq!(
        app.page,
        Page::Vocabulary {
            subject: "english".into(),
            unit: 1,
            category: VocabularyCategory::Main,
        }
    );

    let total = app.quiz.as_ref().unwrap().total();
    for _ in 0..total {
        let answer = {
            let quiz = app.quiz.as_ref().unwrap();
            let q = quiz.current().unwrap();
            q.options.iter().position(|o| *o == q.answer).unwrap()
        };
        app.quiz_select(answer);
        app.quiz_next();
    }
    let quiz = app.quiz.as_ref().unwrap();
    assert!(quiz.is_finished());
    assert_eq!(quiz.score(), total);

    app.dispatch(Action::BackToSubjects);
    assert_eq!(app.page, Page::Subjects);
    assert!(app.page.selection().subject.is_none());
    assert!(app.quiz.is_none());
}

#[test]
fn navigation_ignores_actions_for_other_pages() {
    let mut app = new_app(1);
    app.dispatch(Action::BackToMenu);
    assert_eq!(app.page, Page::Login);
    sign_in(&mut app);
    app.dispatch(Action::SelectUnit(1));
    app.dispatch(Action::BackToUnits);
    assert_eq!(app.page, Page::MainMenu);
    app.dispatch(Action::SelectMenu(MenuEntry::Subjects));
    app.dispatch(Action::SelectSubject("history".into()));
    assert_eq!(app.page, Page::Subjects);
}

#[test]
fn tutor_exercise_flow_is_reproducible() {
    let transcript = |seed: u64| {
        let mut app = new_app(seed);
        sign_in(&mut app);
        app.dispatch(Action::SelectMenu(MenuEntry::Chatbot));
        app.chat_choose();
        app.chat_choose();
        let mut now = Instant::now();
        app.chat_submit("how do I study?", now);
        now += Duration::from_millis(1500);
        app.on_tick(now);
        app.chat_submit("Teach me the PRESENT SIMPLE please", now);
        now += Duration::from_millis(1500);
        app.on_tick(now);
        app.chat
            .as_ref()
            .unwrap()
            .messages()
            .iter()
            .map(|m| m.text.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(transcript(9), transcript(9));

    let mut app = new_app(9);
    sign_in(&mut app);
    app.dispatch(Action::SelectMenu(MenuEntry::Chatbot));
    app.chat_choose();
    app.chat_choose();
    let t0 = Instant::now();
    app.chat_submit("present simple", t0);
    app.on_tick(t0 + Duration::from_millis(1500));
    {
        let chat = app.chat.as_ref().unwrap();
        assert!(chat.awaiting_answer());
        assert_eq!(chat.messages().last().unwrap().sender, Sender::Bot);
    }

    app.chat_submit("plays", t0 + Duration::from_secs(2));
    app.on_tick(t0 + Duration::from_secs(4));
    let chat = app.chat.as_ref().unwrap();
    assert_eq!(chat.exercise_index(), 1);
    let next = chat.active_exercise().unwrap();
    assert_eq!(next.correct_answer, "Present Simple");

    // Conversation -> unit picker -> subject picker -> menu.
    app.go_back();
    assert!(matches!(
        app.chat.as_ref().unwrap().step(),
        ChatStep::ChooseUnit { .. }
    ));
    app.go_back();
    app.go_back();
    assert_eq!(app.page, Page::MainMenu);
    assert!(app.chat.is_none());
}

#[test]
fn supervised_block_needs_supervisor_to_lift() {
    let mut app = new_app(3);
    sign_in(&mut app);
    app.dispatch(Action::SelectMenu(MenuEntry::Distractions));

    let focus = app.focus.as_mut().unwrap();
    focus.open_prompt(PromptKind::SupervisorEmail);
    focus.prompt.as_mut().unwrap().input = LineInput::new("mum@family.net");
    app.focus_submit_prompt();
    app.focus_block();
    assert!(app.focus.as_ref().unwrap().blocks.is_locked());

    assert_eq!(
        app.focus_action(|f| f.toggle_selected()),
        None
    );
    assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));

    app.focus_unblock();
    let focus = app.focus.as_mut().unwrap();
    assert_eq!(focus.prompt.as_ref().map(|p| p.kind), Some(PromptKind::UnblockConfirmation));
    focus.prompt.as_mut().unwrap().input = LineInput::new("me@family.net");
    assert_eq!(focus.submit_prompt(chrono::Local::now()), Err(ActionError::Unauthorized));
    assert!(focus.blocks.items().iter().all(|i| i.blocked));

    focus.prompt.as_mut().unwrap().input = LineInput::new("mum@family.net");
    app.focus_submit_prompt();
    let focus = app.focus.as_ref().unwrap();
    assert!(!focus.blocks.is_globally_blocked());
    assert!(focus.blocks.items().iter().all(|i| !i.blocked));
    assert!(focus.blocks.is_supervised());
}

#[test]
fn leaving_distractions_stops_the_timer() {
    let mut app = new_app(3);
    sign_in(&mut app);
    app.dispatch(Action::SelectMenu(MenuEntry::Distractions));
    app.focus.as_mut().unwrap().toggle_timer();
    let t0 = Instant::now();
    app.on_tick(t0);
    app.on_tick(t0 + Duration::from_secs(10));
    assert_eq!(app.focus.as_ref().unwrap().timer.remaining_secs(), 50);

    app.dispatch(Action::BackToMenu);
    assert!(app.focus.is_none());
    app.dispatch(Action::SelectMenu(MenuEntry::Distractions));
    assert_eq!(app.focus.as_ref().unwrap().timer.remaining_secs(), 60);
}

#[test]
fn bundled_catalog_is_consistent() {
    let catalog = Catalog::embedded().unwrap();
    for bank in &catalog.quiz_banks {
        assert!(catalog.subject(&bank.subject).is_some());
        assert!(catalog.unit(bank.unit).is_some());
        for q in &bank.questions {
            assert!(q.options.contains(&q.answer), "{} has no correct option", q.question);
        }
    }
    assert!(catalog.subject(&catalog.tutor.unit_subject).is_some());
    assert!(!catalog.tutor.exercises.is_empty());
}

#[test]
fn user_catalog_file_is_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let mut catalog = Catalog::embedded().unwrap();
    catalog.quiz_banks[0].questions[0].answer = "not an option".into();
    fs::write(&path, serde_json::to_string(&catalog).unwrap()).unwrap();
    assert!(matches!(
        Catalog::load(Some(&path)),
        Err(CatalogError::Invalid(_))
    ));

    assert!(matches!(
        Catalog::load(Some(&dir.path().join("missing.json"))),
        Err(CatalogError::Io(_))
    ));
}
