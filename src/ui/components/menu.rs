use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::navigation::MenuEntry;
use crate::ui::theme::Theme;

pub struct Menu<'a> {
    pub selected: usize,
    pub theme: &'a Theme,
    /// Signed-in user, shown under the title.
    pub greeting: Option<String>,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            selected: 0,
            theme,
            greeting: None,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % MenuEntry::all().len();
    }

    pub fn prev(&mut self) {
        let len = MenuEntry::all().len();
        self.selected = (self.selected + len - 1) % len;
    }

    /// Jump straight to an entry by its 1-based number key.
    pub fn select_number(&mut self, n: usize) -> Option<MenuEntry> {
        let entry = MenuEntry::all().get(n.checked_sub(1)?).copied()?;
        self.selected = n - 1;
        Some(entry)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let greeting = match &self.greeting {
            Some(name) => format!("Welcome back, {name}"),
            None => "Your study companion".to_string(),
        };
        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "motqen",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(greeting, Style::default().fg(colors.fg()))),
            Line::from(""),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let entries = MenuEntry::all();
        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(entries.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
            .split(layout[2]);

        for (i, (entry, row)) in entries.iter().zip(menu_layout.iter()).enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let lines = vec![
                Line::from(Span::styled(
                    format!(" {indicator} [{}] {}", i + 1, entry.label()),
                    label_style,
                )),
                Line::from(Span::styled(
                    format!("     {}", entry.description()),
                    Style::default().fg(colors.muted()),
                )),
            ];
            Paragraph::new(lines).render(*row, buf);
        }
    }
}
