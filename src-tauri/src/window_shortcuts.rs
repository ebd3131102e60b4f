use std::{collections::HashSet, sync::Mutex};

use tauri::{State, WebviewWindow};

const RELOAD_GUARD_SCRIPT: &str = r#"(function () {
  if (window.__ESCRCPY_SHORTCUT_GUARD__) return;
  window.__ESCRCPY_SHORTCUT_GUARD__ = true;
  window.addEventListener('keydown', function (event) {
    var key = (event.key || '').toLowerCase();
    var modifier = event.ctrlKey || event.metaKey;
    if (key === 'f5' || (modifier && key === 'r')) {
      event.preventDefault();
      event.stopPropagation();
    }
  }, true);
})();"#;

const DEVTOOLS_TOGGLE_SCRIPT: &str = r#"(function () {
  if (window.__ESCRCPY_SHORTCUT_GUARD__) return;
  window.__ESCRCPY_SHORTCUT_GUARD__ = true;
  window.addEventListener('keydown', function (event) {
    if ((event.key || '').toLowerCase() !== 'f12') return;
    var internals = window.__TAURI_INTERNALS__;
    if (!internals || typeof internals.invoke !== 'function') return;
    event.preventDefault();
    internals.invoke('toggle_devtools').catch(function () {});
  }, true);
})();"#;

/// Packaged builds swallow reload shortcuts; development builds toggle the
/// inspector on F12 and keep reload available.
pub fn shortcut_script(packaged: bool) -> &'static str {
    if packaged {
        RELOAD_GUARD_SCRIPT
    } else {
        DEVTOOLS_TOGGLE_SCRIPT
    }
}

/// Labels of windows whose pages get the shortcut script after each load.
#[derive(Debug, Default)]
pub struct WatchedWindows {
    labels: Mutex<HashSet<String>>,
}

impl WatchedWindows {
    pub fn watch(&self, label: &str) -> bool {
        self.labels
            .lock()
            .map(|mut labels| labels.insert(label.to_string()))
            .unwrap_or(false)
    }

    pub fn is_watched(&self, label: &str) -> bool {
        self.labels
            .lock()
            .map(|labels| labels.contains(label))
            .unwrap_or(false)
    }
}

pub trait DevtoolsWindow {
    fn is_devtools_open(&self) -> bool;
    fn open_devtools(&self);
    fn close_devtools(&self);
}

#[cfg(any(debug_assertions, feature = "devtools"))]
impl DevtoolsWindow for WebviewWindow {
    fn is_devtools_open(&self) -> bool {
        WebviewWindow::is_devtools_open(self)
    }

    fn open_devtools(&self) {
        WebviewWindow::open_devtools(self)
    }

    fn close_devtools(&self) {
        WebviewWindow::close_devtools(self)
    }
}

/// Returns whether the inspector is open afterwards.
pub fn toggle_devtools_window<W: DevtoolsWindow>(window: &W) -> bool {
    if window.is_devtools_open() {
        window.close_devtools();
        false
    } else {
        window.open_devtools();
        true
    }
}

#[tauri::command]
pub(crate) fn toggle_devtools(
    webview_window: WebviewWindow,
    watched: State<'_, WatchedWindows>,
) -> Result<bool, String> {
    if !tauri::is_dev() {
        return Err("devtools are disabled in packaged builds".to_string());
    }
    let label = webview_window.label().to_string();
    if !watched.is_watched(&label) {
        return Err(format!("window {label} does not watch shortcuts"));
    }

    #[cfg(any(debug_assertions, feature = "devtools"))]
    {
        Ok(toggle_devtools_window(&webview_window))
    }

    #[cfg(not(any(debug_assertions, feature = "devtools")))]
    {
        Err("devtools are not compiled into this build".to_string())
    }
}
