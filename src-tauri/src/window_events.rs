use tauri::{AppHandle, Manager, WindowEvent};

use crate::{
    append_desktop_log,
    lifecycle::{ApplicationShell, WindowHandle, WindowHook, WindowPlatform},
};

pub(crate) fn describe_window_event(label: &str, event: &WindowEvent) -> Option<String> {
    match event {
        WindowEvent::CloseRequested { .. } => Some(format!("window {label} close requested")),
        WindowEvent::Destroyed => Some(format!("window {label} destroyed")),
        WindowEvent::Focused(focused) => Some(format!("window {label} focused={focused}")),
        _ => None,
    }
}

fn window_event_logger(app_handle: AppHandle) -> WindowHook {
    Box::new(move |handle: &WindowHandle| {
        let Some(window) = app_handle.get_webview_window(handle.label()) else {
            append_desktop_log(&format!(
                "window event logger skipped: window {} not found",
                handle.label()
            ));
            return;
        };

        let label = handle.label().to_string();
        window.on_window_event(move |event| {
            if let Some(message) = describe_window_event(&label, event) {
                append_desktop_log(&message);
            }
        });
    })
}

/// Feature modules that attach listeners to every created primary window.
pub(crate) fn register<P: WindowPlatform>(shell: &mut ApplicationShell<P>, app_handle: &AppHandle) {
    shell.register_window_hook(window_event_logger(app_handle.clone()));
}
