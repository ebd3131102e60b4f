use std::cell::RefCell;

use tauri::{
    plugin::{Builder as PluginBuilder, TauriPlugin},
    webview::PageLoadEvent,
    AppHandle, Manager, RunEvent, Wry,
};

use crate::{
    app_store::AppStore,
    append_desktop_log, append_shutdown_log, append_startup_log,
    content_source::ContentSource,
    lifecycle::{ApplicationShell, ShellContext, ShellEvent},
    logging,
    platform_icon::{HostPlatform, IconPaths},
    tauri_platform::TauriPlatform,
    window_events,
    window_shortcuts::{self, WatchedWindows},
    ShellState, APP_USER_MODEL_ID, DEBUG_SETTING_KEY, DEV_SERVER_URL_ENV,
};

type TauriShellState = ShellState<TauriPlatform>;

pub(crate) fn dispatch_shell_event(app_handle: &AppHandle, event: ShellEvent) {
    let Some(state) = app_handle.try_state::<TauriShellState>() else {
        append_desktop_log(&format!("shell event {event:?} dropped: shell not initialized"));
        return;
    };

    if let Err(error) = state.dispatch(event) {
        append_desktop_log(&format!("shell event failed: {error}"));
    }
}

/// Reports every window the runtime creates, including ones the shell did
/// not build itself.
fn window_created_plugin() -> TauriPlugin<Wry> {
    PluginBuilder::new("window-created")
        .on_window_ready(|window| {
            dispatch_shell_event(
                window.app_handle(),
                ShellEvent::WindowCreated {
                    label: window.label().to_string(),
                },
            );
        })
        .build()
}

fn handle_exit_requested(app_handle: &AppHandle, code: Option<i32>) {
    match code {
        None => dispatch_shell_event(app_handle, ShellEvent::AllWindowsClosed),
        Some(code) => {
            let quitting = app_handle
                .try_state::<TauriShellState>()
                .map(|state| state.is_quitting())
                .unwrap_or(false);
            append_shutdown_log(&format!(
                "exit requested with code {code} (quitting={quitting})"
            ));
        }
    }
}

fn read_debug_setting() -> (bool, Vec<String>) {
    let deferred = RefCell::new(Vec::new());
    let debug = AppStore::open_default()
        .map(|store| {
            store.get_bool(DEBUG_SETTING_KEY, |message| {
                deferred.borrow_mut().push(message.to_string())
            })
        })
        .unwrap_or(false);
    (debug, deferred.into_inner())
}

pub(crate) fn run() {
    let packaged = !tauri::is_dev();
    // The logger is not installed yet; store messages are replayed in setup.
    let (debug, deferred_messages) = read_debug_setting();

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _argv, _cwd| {
            append_desktop_log("second instance launched, activating main window");
            dispatch_shell_event(app_handle, ShellEvent::Activate);
        }))
        .plugin(logging::build_log_plugin(debug))
        .plugin(tauri_plugin_process::init())
        .plugin(tauri_plugin_opener::init())
        .plugin(window_created_plugin())
        .manage(WatchedWindows::default())
        .invoke_handler(tauri::generate_handler![window_shortcuts::toggle_devtools])
        .on_page_load(move |webview, payload| match payload.event() {
            PageLoadEvent::Started => {
                append_desktop_log(&format!("page-load started: {}", payload.url()));
            }
            PageLoadEvent::Finished => {
                append_desktop_log(&format!("page-load finished: {}", payload.url()));
                let label = webview.label().to_string();
                let watched = webview.app_handle().state::<WatchedWindows>();
                // Windows the shell did not build have no initialization script.
                if watched.is_watched(&label) {
                    let script = window_shortcuts::shortcut_script(packaged);
                    if let Err(error) = webview.eval(script) {
                        append_desktop_log(&format!(
                            "failed to inject shortcut script into {label}: {error}"
                        ));
                    }
                }
                dispatch_shell_event(webview.app_handle(), ShellEvent::ContentReady { label });
            }
        })
        .setup(move |app| {
            for message in &deferred_messages {
                append_startup_log(message);
            }
            logging::log_debug_status(debug);
            append_startup_log(&format!("desktop process starting (packaged={packaged})"));

            let app_handle = app.handle().clone();
            let context = ShellContext {
                packaged,
                platform: HostPlatform::current(),
                icons: IconPaths::from_env(),
                content: ContentSource::from_env()?,
                app_user_model_id: APP_USER_MODEL_ID,
            };
            if packaged && context.content.is_dev_server() {
                log::warn!("{DEV_SERVER_URL_ENV} is set in a packaged build; loading dev server");
            }
            let mut shell = ApplicationShell::new(
                TauriPlatform::new(app_handle.clone()),
                context,
                append_desktop_log,
            );
            window_events::register(&mut shell, &app_handle);
            app.manage(ShellState::new(shell, append_desktop_log));

            app.state::<TauriShellState>().dispatch(ShellEvent::Ready)?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, .. } => handle_exit_requested(app_handle, code),
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => dispatch_shell_event(app_handle, ShellEvent::Activate),
            RunEvent::Exit => append_shutdown_log("desktop process exited"),
            _ => {}
        });
}
