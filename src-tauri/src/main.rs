#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_store;
mod app_types;
mod content_source;
mod error;
mod lifecycle;
mod link_policy;
mod logging;
mod main_window;
mod platform_icon;
mod runtime_paths;
mod tauri_platform;
mod window_events;
mod window_shortcuts;

pub(crate) use app_constants::*;
pub(crate) use app_types::ShellState;
pub(crate) use logging::{append_desktop_log, append_shutdown_log, append_startup_log};

fn main() {
    app_runtime::run();
}
