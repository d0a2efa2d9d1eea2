pub mod api;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod logging;
pub mod page;
pub mod records;
pub mod tui;
