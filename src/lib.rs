pub mod app;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod logging;
pub mod session;
pub mod ui;
