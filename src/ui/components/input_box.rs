use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// A bordered single-line field with a block cursor when focused.
pub struct InputBox<'a> {
    pub title: &'a str,
    pub input: &'a LineInput,
    pub focused: bool,
    pub theme: &'a Theme,
}

impl<'a> InputBox<'a> {
    pub fn new(title: &'a str, input: &'a LineInput, theme: &'a Theme) -> Self {
        Self {
            title,
            input,
            focused: true,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for InputBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));

        let (before, at, after) = self.input.render_parts();
        let text_style = Style::default().fg(colors.fg());
        let mut spans = vec![Span::styled(before, text_style)];
        if self.focused {
            let cursor = Style::default().fg(colors.bg()).bg(colors.fg());
            spans.push(Span::styled(at.map(String::from).unwrap_or_else(|| " ".into()), cursor));
        } else if let Some(ch) = at {
            spans.push(Span::styled(ch.to_string(), text_style));
        }
        spans.push(Span::styled(after, text_style));

        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }
}
