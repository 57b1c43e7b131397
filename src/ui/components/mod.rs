pub mod chat_view;
pub mod focus_panel;
pub mod input_box;
pub mod leaderboard;
pub mod login_form;
pub mod menu;
pub mod picker;
pub mod progress_bar;
pub mod quiz_card;
