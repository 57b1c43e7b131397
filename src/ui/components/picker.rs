use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct PickerRow {
    pub label: String,
    pub detail: String,
    pub enabled: bool,
    /// Theme hint for the row marker, e.g. a subject colour.
    pub marker_color: Option<String>,
}

impl PickerRow {
    pub fn new(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
            enabled: true,
            marker_color: None,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn marker(mut self, color: &str) -> Self {
        self.marker_color = Some(color.to_string());
        self
    }
}

/// Vertical list of choices with one highlighted row. Scrolls to keep the
/// highlight visible.
pub struct Picker<'a> {
    pub title: &'a str,
    pub rows: Vec<PickerRow>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for Picker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        // Two lines per row.
        let visible = (inner.height / 2).max(1) as usize;
        let offset = self.selected.saturating_sub(visible - 1);

        let mut lines: Vec<Line> = Vec::new();
        for (i, row) in self.rows.iter().enumerate().skip(offset).take(visible) {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let marker_color = row
                .marker_color
                .as_deref()
                .map(crate::ui::theme::ThemeColors::parse_color)
                .unwrap_or_else(|| colors.accent());

            let mut label_style = Style::default().fg(if !row.enabled {
                colors.muted()
            } else if is_selected {
                colors.accent()
            } else {
                colors.fg()
            });
            if is_selected {
                label_style = label_style
                    .bg(colors.selection_bg())
                    .add_modifier(Modifier::BOLD);
            }

            lines.push(Line::from(vec![
                Span::styled(format!(" {indicator} "), label_style),
                Span::styled("■ ", Style::default().fg(marker_color)),
                Span::styled(row.label.clone(), label_style),
            ]));
            lines.push(Line::from(Span::styled(
                format!("     {}", row.detail),
                Style::default().fg(colors.muted()),
            )));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
