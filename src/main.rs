use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use motqen::app::{App, NoticeKind};
use motqen::catalog::{Catalog, VocabularyCategory};
use motqen::config::Config;
use motqen::engine::navigation::{Action, Page};
use motqen::event::{AppEvent, EventHandler};
use motqen::logging;
use motqen::session::chat::ChatStep;
use motqen::session::focus::PromptKind;
use motqen::session::login::LoginField;
use motqen::ui::components::chat_view::ChatView;
use motqen::ui::components::focus_panel::FocusPanel;
use motqen::ui::components::input_box::InputBox;
use motqen::ui::components::leaderboard::Leaderboard;
use motqen::ui::components::login_form::LoginView;
use motqen::ui::components::picker::{Picker, PickerRow};
use motqen::ui::components::quiz_card::{QuizCard, WordList};
use motqen::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use motqen::ui::line_input::InputResult;
use motqen::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "motqen", version, about = "Terminal study companion for school subjects")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Catalog JSON to use instead of the bundled one")]
    catalog: Option<PathBuf>,

    #[arg(long, help = "Seed for the tutor's replies")]
    seed: Option<u64>,

    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(1..=180),
        help = "Default study timer length in minutes"
    )]
    timer_minutes: Option<u32>,

    #[arg(long, help = "List bundled themes and exit")]
    list_themes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config ({e}); using defaults");
        Config::default()
    });
    if let Some(minutes) = cli.timer_minutes {
        config.timer_default_minutes = minutes;
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }

    let log_path = logging::log_path();
    if let Err(e) = logging::init(&config.log_level, &log_path) {
        eprintln!("Logging disabled: {e:#}");
    }

    let catalog_path = cli
        .catalog
        .clone()
        .or_else(|| config.catalog_path.as_ref().map(PathBuf::from));
    let catalog = Catalog::load(catalog_path.as_deref()).with_context(|| match &catalog_path {
        Some(p) => format!("loading catalog {}", p.display()),
        None => "loading bundled catalog".to_string(),
    })?;
    let catalog: &'static Catalog = Box::leak(Box::new(catalog));

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    tracing::info!(
        subjects = catalog.subjects.len(),
        theme = %theme.name,
        seed = ?cli.seed,
        "starting"
    );
    let tick_rate = config.tick_rate();
    let mut app = App::new(config, catalog, theme, cli.seed);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(tick_rate);
    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "exited with error");
        eprintln!("Error: {err:?}");
    }
    tracing::info!("bye");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => {
                handle_key(app, key);
                // Keystrokes can starve ticks, so catch the clock up here too.
                app.on_tick(Instant::now());
            }
            AppEvent::Tick(now) => app.on_tick(now),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    app.notice = None;

    match app.page {
        Page::Login => handle_login_key(app, key),
        Page::MainMenu => handle_menu_key(app, key),
        Page::Subjects | Page::Units { .. } | Page::VocabularySelection { .. } => {
            handle_picker_key(app, key)
        }
        Page::Vocabulary { .. } => handle_quiz_key(app, key),
        Page::Leaderboard => handle_leaderboard_key(app, key),
        Page::Chatbot => handle_chat_key(app, key),
        Page::Distractions => handle_focus_key(app, key),
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login.toggle_focus();
        }
        _ => match app.login.focused_input().handle(key) {
            InputResult::Submit if app.login.focus == LoginField::Username => {
                app.login.toggle_focus();
            }
            InputResult::Submit => app.submit_login(),
            InputResult::Cancel => app.should_quit = true,
            InputResult::Continue => {}
        },
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.go_back(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Char(c @ '1'..='9') => {
            let n = c as usize - '0' as usize;
            if app.menu.select_number(n).is_some() {
                app.select_menu_entry();
            }
        }
        KeyCode::Enter => app.select_menu_entry(),
        _ => {}
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => app.go_back(),
        KeyCode::Up | KeyCode::Char('k') => app.move_picker(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_picker(1),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.activate_picker(),
        KeyCode::Char('s') => app.dispatch(Action::BackToSubjects),
        KeyCode::Char('m') => app.dispatch(Action::BackToMenu),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),
        KeyCode::Char(c @ '1'..='9') => app.quiz_select(c as usize - '1' as usize),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('n') => app.quiz_next(),
        KeyCode::Char('u') => app.dispatch(Action::BackToUnits),
        KeyCode::Char('s') => app.dispatch(Action::BackToSubjects),
        KeyCode::Char('m') => app.dispatch(Action::BackToMenu),
        _ => {}
    }
}

fn handle_leaderboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_back(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            app.leaderboard_tab = app.leaderboard_tab.toggle();
        }
        _ => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    let in_conversation = app
        .chat
        .as_ref()
        .is_some_and(|c| matches!(c.step(), ChatStep::Conversation { .. }));

    if !in_conversation {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => app.go_back(),
            KeyCode::Up | KeyCode::Char('k') => app.move_chat_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_chat_cursor(1),
            KeyCode::Enter => app.chat_choose(),
            _ => {}
        }
        return;
    }

    if key.code == KeyCode::Tab {
        if let Some(chat) = app.chat.as_mut() {
            chat.skip_exercise();
        }
        return;
    }
    match app.chat_input.handle(key) {
        InputResult::Submit => {
            // Keep the draft until the tutor has replied.
            if app.chat.as_ref().is_some_and(|c| c.is_typing()) {
                return;
            }
            let text = app.chat_input.take();
            app.chat_submit(&text, Instant::now());
        }
        InputResult::Cancel => app.go_back(),
        InputResult::Continue => {}
    }
}

fn handle_focus_key(app: &mut App, key: KeyEvent) {
    let Some(focus) = app.focus.as_mut() else {
        return;
    };

    if let Some(prompt) = focus.prompt.as_mut() {
        match prompt.input.handle(key) {
            InputResult::Submit => app.focus_submit_prompt(),
            InputResult::Cancel => focus.cancel_prompt(),
            InputResult::Continue => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_back(),
        KeyCode::Up | KeyCode::Char('k') => focus.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => focus.move_cursor(1),
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.focus_action(|f| f.toggle_selected());
        }
        KeyCode::Char('m') => {
            if let Some(mode) = app.focus_action(|f| f.cycle_mode()) {
                app.info(format!("Block mode: {}", mode.label()));
            }
        }
        KeyCode::Char('b') => app.focus_block(),
        KeyCode::Char('u') => app.focus_unblock(),
        KeyCode::Char('s') => focus.open_prompt(PromptKind::SupervisorEmail),
        KeyCode::Char('c') => focus.open_prompt(PromptKind::CustomMinutes),
        KeyCode::Char('t') => focus.toggle_timer(),
        KeyCode::Char('r') => focus.timer.reset(),
        KeyCode::Char(c @ '1'..='9') => {
            let n = c as usize - '1' as usize;
            app.focus_action(|f| f.apply_preset(n));
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    match &app.page {
        Page::Login => {
            let form_area = centered_rect(40, 50, layout.main);
            frame.render_widget(
                LoginView {
                    form: &app.login,
                    theme: app.theme,
                },
                form_area,
            );
        }
        Page::MainMenu => {
            let menu_area = centered_rect(50, 90, layout.main);
            frame.render_widget(&app.menu, menu_area);
        }
        Page::Subjects | Page::Units { .. } | Page::VocabularySelection { .. } => {
            render_picker_page(frame, app, layout.main)
        }
        Page::Vocabulary {
            subject,
            unit,
            category,
        } => render_vocabulary(frame, app, &layout, subject, *unit, *category),
        Page::Leaderboard => frame.render_widget(
            Leaderboard {
                entries: &app.catalog.leaderboard,
                competitions: &app.catalog.competitions,
                tab: app.leaderboard_tab,
                theme: app.theme,
            },
            layout.main,
        ),
        Page::Chatbot => render_chat(frame, app, layout.main),
        Page::Distractions => render_distractions(frame, app, layout.main),
    }

    render_footer(frame, app, layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let selection = app.page.selection();
    let mut crumbs = vec![app.page.title().to_string()];
    if let Some(subject) = selection.subject.as_deref().and_then(|id| app.catalog.subject(id)) {
        crumbs.push(subject.name_en.clone());
    }
    if let Some(unit) = selection.unit.and_then(|id| app.catalog.unit(id)) {
        crumbs.push(unit.name.clone());
    }
    if let Some(category) = selection.category {
        crumbs.push(category.label().to_string());
    }
    let user = app
        .user
        .as_deref()
        .map(|u| format!("  ({u})"))
        .unwrap_or_default();

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " motqen ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}{user}", crumbs.join(" › ")),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()))
    .block(Block::default().style(Style::default().bg(colors.header_bg())));
    frame.render_widget(header, area);
}

fn footer_hints(app: &App) -> Vec<&'static str> {
    match &app.page {
        Page::Login => vec!["[Tab] Switch field", "[Enter] Sign in", "[Esc] Quit"],
        Page::MainMenu => vec!["[1-4] Open", "[j/k] Move", "[Enter] Select", "[q] Quit"],
        Page::Subjects | Page::Units { .. } | Page::VocabularySelection { .. } => vec![
            "[j/k] Move",
            "[Enter] Select",
            "[Esc] Back",
            "[s] Subjects",
            "[m] Menu",
        ],
        Page::Vocabulary { .. } => vec![
            "[1-4] Answer",
            "[Enter] Next",
            "[Esc] Categories",
            "[u] Units",
            "[s] Subjects",
            "[m] Menu",
        ],
        Page::Leaderboard => vec!["[Tab] Switch tab", "[Esc] Menu"],
        Page::Chatbot => match app.chat.as_ref().map(|c| c.step()) {
            Some(ChatStep::Conversation { .. }) => {
                if app.chat.as_ref().is_some_and(|c| c.awaiting_answer()) {
                    vec!["[Enter] Answer", "[Tab] Skip exercise", "[Esc] Back"]
                } else {
                    vec!["[Enter] Send", "[Esc] Back"]
                }
            }
            _ => vec!["[j/k] Move", "[Enter] Select", "[Esc] Back"],
        },
        Page::Distractions => {
            if app.focus.as_ref().is_some_and(|f| f.prompt.is_some()) {
                vec!["[Enter] Confirm", "[Esc] Cancel"]
            } else {
                vec![
                    "[Space] Toggle app",
                    "[b] Block all",
                    "[u] Unblock",
                    "[m] Mode",
                    "[s] Supervisor",
                    "[t] Start/pause",
                    "[r] Reset",
                    "[1-4] Preset",
                    "[c] Custom",
                    "[Esc] Menu",
                ]
            }
        }
    }
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = match &app.notice {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Info => colors.success(),
                NoticeKind::Error => colors.error(),
            };
            vec![Line::from(Span::styled(
                format!(" {}", notice.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))]
        }
        None => pack_hint_lines(&footer_hints(app), area.width as usize)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
            .collect(),
    };
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_picker_page(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let catalog = app.catalog;
    let (title, rows): (&str, Vec<PickerRow>) = match &app.page {
        Page::Subjects => (
            "Choose a subject",
            catalog
                .subjects
                .iter()
                .map(|s| PickerRow::new(&s.name_en, &s.name).marker(&s.color))
                .collect(),
        ),
        Page::Units { subject } => (
            "Choose a unit",
            catalog
                .units
                .iter()
                .map(|u| {
                    let open = catalog.unit_is_open(subject, u.id);
                    let status = if !open {
                        "coming soon".to_string()
                    } else if u.completed {
                        "completed".to_string()
                    } else {
                        format!("{}% done", u.progress)
                    };
                    PickerRow::new(&u.name, format!("{} · {status}", u.name_ar)).enabled(open)
                })
                .collect(),
        ),
        Page::VocabularySelection { subject, unit } => (
            "Choose a word list",
            VocabularyCategory::all()
                .iter()
                .map(|c| {
                    let count = catalog.words(subject, *unit, *c).len();
                    PickerRow::new(c.label(), format!("{count} words"))
                })
                .collect(),
        ),
        _ => return,
    };
    frame.render_widget(
        Picker {
            title,
            rows,
            selected: app.list_cursor,
            theme: app.theme,
        },
        centered_rect(60, 90, area),
    );
}

fn render_vocabulary(
    frame: &mut ratatui::Frame,
    app: &App,
    layout: &AppLayout,
    subject: &str,
    unit: u32,
    category: VocabularyCategory,
) {
    let Some(quiz) = app.quiz.as_ref() else {
        return;
    };
    let (main, side) = layout.with_side_panel(40);
    frame.render_widget(
        QuizCard {
            quiz,
            theme: app.theme,
        },
        main,
    );
    if let Some(side) = side {
        let words = app.catalog.words(subject, unit, category);
        frame.render_widget(
            WordList {
                words: &words,
                theme: app.theme,
            },
            side,
        );
    }
}

fn render_chat(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(chat) = app.chat.as_ref() else {
        return;
    };
    match chat.step() {
        ChatStep::ChooseSubject => {
            let rows: Vec<PickerRow> = app
                .catalog
                .subjects
                .iter()
                .map(|s| PickerRow::new(&s.name_en, &s.name).marker(&s.color))
                .collect();
            frame.render_widget(
                Picker {
                    title: "Which subject do you want help with?",
                    rows,
                    selected: chat.list_cursor,
                    theme: app.theme,
                },
                centered_rect(60, 90, area),
            );
        }
        ChatStep::ChooseUnit { .. } => {
            let rows: Vec<PickerRow> = app
                .catalog
                .tutor
                .units
                .iter()
                .map(|u| PickerRow::new(&u.name, u.topics.join(", ")))
                .collect();
            frame.render_widget(
                Picker {
                    title: "Which unit?",
                    rows,
                    selected: chat.list_cursor,
                    theme: app.theme,
                },
                centered_rect(60, 90, area),
            );
        }
        ChatStep::Conversation { .. } => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(3)])
                .split(area);
            frame.render_widget(
                ChatView {
                    messages: chat.messages(),
                    typing: chat.is_typing(),
                    theme: app.theme,
                },
                rows[0],
            );
            let title = if chat.awaiting_answer() {
                "Your answer (text or option number)"
            } else {
                "Message"
            };
            frame.render_widget(InputBox::new(title, &app.chat_input, app.theme), rows[1]);
        }
    }
}

fn render_distractions(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(focus) = app.focus.as_ref() else {
        return;
    };
    frame.render_widget(
        FocusPanel {
            focus,
            theme: app.theme,
        },
        area,
    );

    if let Some(prompt) = &focus.prompt {
        let popup = centered_rect(40, 10, area);
        let popup = Rect {
            height: popup.height.min(3),
            ..popup
        };
        frame.render_widget(Clear, popup);
        frame.render_widget(InputBox::new(prompt.kind.title(), &prompt.input, app.theme), popup);
    }
}
