pub mod chat;
pub mod focus;
pub mod login;
pub mod quiz;
