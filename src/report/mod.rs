//! Rendering: the notification body sent to subscribers, and the run report
//! printed to the terminal.

pub mod message;
pub mod terminal;
