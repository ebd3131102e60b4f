use log::{Level, LevelFilter};
use tauri::{plugin::TauriPlugin, Runtime};
use tauri_plugin_log::{Target, TargetKind};

use crate::DESKTOP_LOG_FILE;

pub fn append_desktop_log(message: &str) {
    log::info!(target: "escrcpy::desktop", "{message}");
}

pub fn append_startup_log(message: &str) {
    log::info!(target: "escrcpy::startup", "{message}");
}

pub fn append_shutdown_log(message: &str) {
    log::info!(target: "escrcpy::shutdown", "{message}");
}

/// Stdout always; the log file only exists while debugging is enabled.
pub fn build_log_plugin<R: Runtime>(debug: bool) -> TauriPlugin<R> {
    let mut builder = tauri_plugin_log::Builder::default()
        .clear_targets()
        .target(Target::new(TargetKind::Stdout))
        .level(if debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        });

    if debug {
        builder = builder.target(Target::new(TargetKind::LogDir {
            file_name: Some(DESKTOP_LOG_FILE.to_string()),
        }));
    }

    builder.build()
}

pub fn debug_status_messages(debug: bool) -> Vec<(Level, String)> {
    let mut messages = vec![(Level::Info, format!("Debug Status: {debug}"))];
    if !debug {
        messages.push((
            Level::Warn,
            "Debug Tips: If you need to generate and view the running log, please start the debugging function on the preference setting page".to_string(),
        ));
    }
    messages
}

pub fn log_debug_status(debug: bool) {
    for (level, message) in debug_status_messages(debug) {
        log::log!(target: "escrcpy::startup", level, "{message}");
    }
}
