pub mod blocker;
pub mod navigation;
pub mod quiz;
pub mod responder;
pub mod schedule;
pub mod timer;
