use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::catalog::Word;
use crate::session::quiz::QuizSession;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

pub struct QuizCard<'a> {
    pub quiz: &'a QuizSession,
    pub theme: &'a Theme,
}

impl Widget for QuizCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let quiz = self.quiz;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(4)])
            .split(area);

        let caption = format!("{}/{}", (quiz.position() + 1).min(quiz.total()), quiz.total());
        ProgressBar::new(quiz.category.label(), quiz.progress(), self.theme)
            .caption(caption)
            .render(layout[0], buf);

        let block = Block::bordered()
            .title(" Quiz ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));

        let Some(question) = quiz.current() else {
            Paragraph::new("No questions for this selection yet.")
                .style(Style::default().fg(colors.muted()))
                .alignment(Alignment::Center)
                .block(block)
                .render(layout[1], buf);
            return;
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                question.question.clone(),
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(image) = &question.image {
            lines.push(Line::from(Span::styled(
                format!("[picture: {image}]"),
                Style::default().fg(colors.muted()),
            )));
        }
        lines.push(Line::from(""));

        let correct_pick = quiz.evaluation.as_ref().map(|e| e.correct);
        for (i, option) in question.options.iter().enumerate() {
            let chosen = quiz.selected == Some(i);
            let style = match (chosen, correct_pick) {
                (true, Some(true)) => Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
                (true, Some(false)) => Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
                _ => Style::default().fg(colors.fg()),
            };
            let mark = if chosen { "●" } else { "○" };
            lines.push(Line::from(Span::styled(
                format!("  {mark} [{}] {option}", i + 1),
                style,
            )));
        }

        lines.push(Line::from(""));
        if let Some(eval) = &quiz.evaluation {
            let color = if eval.correct {
                colors.success()
            } else {
                colors.error()
            };
            lines.push(Line::from(Span::styled(
                eval.feedback.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        }
        if quiz.is_finished() {
            lines.push(Line::from(Span::styled(
                format!(
                    "Score: {}/{} correct on the first try",
                    quiz.score(),
                    quiz.total()
                ),
                Style::default().fg(colors.accent()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block)
            .render(layout[1], buf);
    }
}

/// Side panel listing the words of the chosen category.
pub struct WordList<'a> {
    pub words: &'a [&'a Word],
    pub theme: &'a Theme,
}

impl Widget for WordList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Words ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let mut lines = Vec::new();
        for word in self.words {
            lines.push(Line::from(vec![
                Span::styled(
                    word.english.clone(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}  ", word.pronunciation),
                    Style::default().fg(colors.muted()),
                ),
                Span::styled(word.arabic.clone(), Style::default().fg(colors.fg())),
            ]));
            lines.push(Line::from(Span::styled(
                format!("  {}", word.example),
                Style::default()
                    .fg(colors.muted())
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "No words in this category.",
                Style::default().fg(colors.muted()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
