use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::blocker::BlockMode;
use crate::engine::timer::{PRESET_MINUTES, TimerState};
use crate::session::focus::FocusSession;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

pub struct FocusPanel<'a> {
    pub focus: &'a FocusSession,
    pub theme: &'a Theme,
}

impl FocusPanel<'_> {
    fn render_apps(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let blocks = &self.focus.blocks;
        let title = if blocks.is_locked() {
            " Apps (locked by supervisor) "
        } else {
            " Apps "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let lines: Vec<Line> = blocks
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let selected = i == self.focus.app_cursor;
                let (state, state_color) = if item.blocked {
                    ("blocked", colors.error())
                } else {
                    ("allowed", colors.success())
                };
                let mut name_style = Style::default().fg(colors.fg());
                if selected {
                    name_style = name_style
                        .bg(colors.selection_bg())
                        .add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::styled(if selected { " > " } else { "   " }, name_style),
                    Span::styled(format!("{} {:<12}", item.icon, item.name), name_style),
                    Span::styled(
                        format!("{:>8}  ", item.time_spent_label()),
                        Style::default().fg(colors.muted()),
                    ),
                    Span::styled(state, Style::default().fg(state_color)),
                ])
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let blocks = &self.focus.blocks;
        let block = Block::bordered()
            .title(" Blocking ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let mut lines = vec![Line::from(vec![
            Span::styled("Mode: ", Style::default().fg(colors.muted())),
            Span::styled(blocks.mode().label(), Style::default().fg(colors.fg())),
        ])];
        match blocks.global_block() {
            Some(global) => {
                let until = match (global.mode, global.until) {
                    (BlockMode::SpecificTime, Some(t)) => {
                        format!("until {}", t.format("%Y-%m-%d %H:%M"))
                    }
                    _ => "until the study plan is done".to_string(),
                };
                lines.push(Line::from(Span::styled(
                    format!("All apps blocked {until}"),
                    Style::default()
                        .fg(colors.warning())
                        .add_modifier(Modifier::BOLD),
                )));
            }
            None => lines.push(Line::from(Span::styled(
                "No global block",
                Style::default().fg(colors.muted()),
            ))),
        }
        let supervisor = match blocks.supervisor() {
            Some(lock) => format!("Supervisor: {}", lock.email),
            None => "No supervisor set".to_string(),
        };
        lines.push(Line::from(Span::styled(
            supervisor,
            Style::default().fg(colors.fg()),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }

    fn render_timer(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let timer = &self.focus.timer;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let state = match timer.state() {
            TimerState::Idle => "ready",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Expired => "done",
        };
        ProgressBar::new(&format!("Study timer ({state})"), timer.elapsed_ratio(), self.theme)
            .caption(timer.format_mm_ss())
            .render(rows[0], buf);

        let presets = PRESET_MINUTES
            .iter()
            .enumerate()
            .map(|(i, m)| format!("[{}] {m}m", i + 1))
            .collect::<Vec<_>>()
            .join("  ");
        Paragraph::new(Line::from(Span::styled(
            format!(" {presets}  [c] custom"),
            Style::default().fg(colors.muted()),
        )))
        .render(rows[1], buf);
    }
}

impl Widget for FocusPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(4)])
            .split(columns[1]);

        self.render_apps(columns[0], buf);
        self.render_status(right[0], buf);
        self.render_timer(right[1], buf);
    }
}
