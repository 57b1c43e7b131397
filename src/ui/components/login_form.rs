use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::login::{LoginField, LoginForm};
use crate::ui::components::input_box::InputBox;
use crate::ui::theme::Theme;

pub struct LoginView<'a> {
    pub form: &'a LoginForm,
    pub theme: &'a Theme,
}

impl Widget for LoginView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Sign in ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        Paragraph::new(vec![
            Line::from(Span::styled(
                "motqen",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Sign in to start studying",
                Style::default().fg(colors.muted()),
            )),
        ])
        .alignment(Alignment::Center)
        .render(rows[0], buf);

        InputBox::new("Username", &self.form.username, self.theme)
            .focused(self.form.focus == LoginField::Username)
            .render(rows[1], buf);
        InputBox::new("Password", &self.form.password, self.theme)
            .focused(self.form.focus == LoginField::Password)
            .render(rows[2], buf);
    }
}
