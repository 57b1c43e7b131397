use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::chat::{ChatMessage, Sender};
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

/// Conversation transcript, pinned to the newest message.
pub struct ChatView<'a> {
    pub messages: &'a [ChatMessage],
    pub typing: bool,
    pub theme: &'a Theme,
}

impl ChatView<'_> {
    fn message_lines(&self, msg: &ChatMessage) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let (who, color, align) = match msg.sender {
            Sender::User => ("You", colors.user_message(), Alignment::Right),
            Sender::Bot => ("Tutor", colors.bot_message(), Alignment::Left),
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    who.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", msg.timestamp.format("%H:%M")),
                    Style::default().fg(colors.muted()),
                ),
            ])
            .alignment(align),
        ];
        for text_line in msg.text.lines() {
            lines.push(
                Line::from(Span::styled(text_line.to_string(), Style::default().fg(colors.fg())))
                    .alignment(align),
            );
        }
        if let Some(ex) = &msg.exercise {
            lines.push(Line::from(Span::styled(
                format!("  “{}”", ex.sentence),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
            for (i, opt) in ex.options.iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!("    [{}] {opt}", i + 1),
                    Style::default().fg(colors.fg()),
                )));
            }
        }
        lines.push(Line::from(""));
        lines
    }
}

impl Widget for ChatView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Tutor ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);

        let mut lines: Vec<Line> = self
            .messages
            .iter()
            .flat_map(|m| self.message_lines(m))
            .collect();
        if self.typing {
            lines.push(Line::from(Span::styled(
                "Tutor is typing…",
                Style::default()
                    .fg(colors.muted())
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        let width = inner.width as usize;
        let total: usize = lines
            .iter()
            .map(|l| wrapped_line_count(&l.to_string(), width))
            .sum();
        let scroll = total.saturating_sub(inner.height as usize);

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll.min(u16::MAX as usize) as u16, 0))
            .block(block)
            .render(area, buf);
    }
}
