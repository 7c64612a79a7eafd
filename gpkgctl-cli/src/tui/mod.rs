//! Interactive schema browser: tables and fields as linked selection panes,
//! with a detail pane for the selected field and its domain.

mod app;
mod event;
mod terminal;
mod ui;

pub use terminal::run;
