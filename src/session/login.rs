use crate::error::{ActionError, ActionResult};
use crate::ui::line_input::LineInput;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

/// The sign-in form. There is no account store: any non-blank pair passes.
pub struct LoginForm {
    pub username: LineInput,
    pub password: LineInput,
    pub focus: LoginField,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            username: LineInput::new(""),
            password: LineInput::masked(),
            focus: LoginField::Username,
        }
    }
}

impl LoginForm {
    pub fn focused_input(&mut self) -> &mut LineInput {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    /// Check the form, returning the trimmed username.
    pub fn submit(&self) -> ActionResult<String> {
        if self.username.is_blank() {
            return Err(ActionError::invalid("enter a username"));
        }
        if self.password.is_blank() {
            return Err(ActionError::invalid("enter a password"));
        }
        Ok(self.username.value().trim().to_string())
    }
}
