mod app;
mod commands;
mod config;
mod ledger;
mod logging;
mod ui;

pub use app::run_app;
