use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, Tabs, Widget, Wrap};

use crate::app::LeaderboardTab;
use crate::catalog::{Competition, LeaderboardEntry};
use crate::ui::theme::Theme;

pub struct Leaderboard<'a> {
    pub entries: &'a [LeaderboardEntry],
    pub competitions: &'a [Competition],
    pub tab: LeaderboardTab,
    pub theme: &'a Theme,
}

impl Leaderboard<'_> {
    fn render_rankings(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let header = Row::new(["#", "Student", "Points", "Streak"])
            .style(Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD));
        let rows = self.entries.iter().map(|e| {
            let medal = match e.rank {
                1 => "🥇",
                2 => "🥈",
                3 => "🥉",
                _ => "",
            };
            Row::new([
                Cell::from(format!("{} {medal}", e.rank)),
                Cell::from(e.name.clone()),
                Cell::from(e.points.to_string()),
                Cell::from(format!("{} days", e.streak)),
            ])
            .style(Style::default().fg(colors.fg()))
        });
        Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(16),
                Constraint::Length(8),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .block(
            Block::bordered()
                .title(" Rankings ")
                .border_style(Style::default().fg(colors.border())),
        )
        .render(area, buf);
    }

    fn render_competitions(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut lines = Vec::new();
        for c in self.competitions {
            lines.push(Line::from(Span::styled(
                c.title.clone(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                c.description.clone(),
                Style::default().fg(colors.fg()),
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    "{} participants · {} left · prize: {}",
                    c.participants, c.time_left, c.prize
                ),
                Style::default().fg(colors.muted()),
            )));
            lines.push(Line::from(""));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title(" Competitions ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(area, buf);
    }
}

impl Widget for Leaderboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(area);

        let selected = match self.tab {
            LeaderboardTab::Rankings => 0,
            LeaderboardTab::Competitions => 1,
        };
        Tabs::new(["Rankings", "Competitions"])
            .select(selected)
            .style(Style::default().fg(colors.muted()))
            .highlight_style(Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD))
            .render(rows[0], buf);

        match self.tab {
            LeaderboardTab::Rankings => self.render_rankings(rows[1], buf),
            LeaderboardTab::Competitions => self.render_competitions(rows[1], buf),
        }
    }
}
