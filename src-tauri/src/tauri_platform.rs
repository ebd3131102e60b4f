use std::{fmt::Display, path::Path};

use tauri::{
    image::Image, webview::NewWindowResponse, AppHandle, Manager, WebviewUrl,
    WebviewWindowBuilder,
};
use tauri_plugin_opener::OpenerExt;
use url::Url;

use crate::{
    app_runtime::dispatch_shell_event,
    append_desktop_log,
    content_source::ContentSource,
    error::{ShellError, ShellResult},
    lifecycle::{ShellEvent, WindowHandle, WindowPlatform},
    main_window::MainWindowConfig,
    window_shortcuts::WatchedWindows,
};

pub(crate) struct TauriPlatform {
    app_handle: AppHandle,
}

impl TauriPlatform {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

fn webview_url(label: &str, content: &ContentSource) -> ShellResult<WebviewUrl> {
    match content {
        ContentSource::DevServer(url) => Ok(WebviewUrl::External(url.clone())),
        ContentSource::PackagedFile(path) if path.is_absolute() => Url::from_file_path(path)
            .map(WebviewUrl::External)
            .map_err(|()| ShellError::WindowCreation {
                label: label.to_string(),
                reason: format!("cannot convert {} to a file URL", path.display()),
            }),
        ContentSource::PackagedFile(path) => Ok(WebviewUrl::App(path.clone())),
    }
}

/// Falls back to the bundled icon when the override cannot be decoded, which
/// is always the case for `.icns` on macOS.
fn icon_or_bundled<E: Display>(
    loaded: Result<Image<'static>, E>,
    bundled: Option<&Image<'_>>,
    path: &Path,
) -> Option<Image<'static>> {
    match loaded {
        Ok(icon) => Some(icon),
        Err(error) => {
            append_desktop_log(&format!(
                "failed to load window icon {}: {error}; using bundled icon",
                path.display()
            ));
            bundled.map(|icon| icon.clone().to_owned())
        }
    }
}

impl WindowPlatform for TauriPlatform {
    fn build_window(
        &mut self,
        config: &MainWindowConfig,
        content: &ContentSource,
    ) -> ShellResult<WindowHandle> {
        let url = webview_url(config.label, content)?;
        let app_handle = self.app_handle.clone();
        let mut builder = WebviewWindowBuilder::new(&self.app_handle, config.label, url)
            .title(config.title)
            .inner_size(config.width, config.height)
            .min_inner_size(config.min_width, config.min_height)
            .visible(config.visible)
            .devtools(config.devtools)
            .initialization_script(config.init_script)
            .on_new_window(move |url, _features| {
                dispatch_shell_event(
                    &app_handle,
                    ShellEvent::NewWindowRequested {
                        url: url.to_string(),
                    },
                );
                NewWindowResponse::Deny
            });

        if let Some(icon_path) = config.icon.as_deref() {
            let icon = icon_or_bundled(
                Image::from_path(icon_path),
                self.app_handle.default_window_icon(),
                icon_path,
            );
            if let Some(icon) = icon {
                builder = builder.icon(icon)?;
            }
        }

        let window = builder.build().map_err(|error| ShellError::WindowCreation {
            label: config.label.to_string(),
            reason: error.to_string(),
        })?;

        // macOS menus are app-wide, not per window.
        #[cfg(not(target_os = "macos"))]
        {
            if config.menu_bar_hidden {
                if let Err(error) = window.remove_menu() {
                    append_desktop_log(&format!("failed to hide menu bar: {error}"));
                }
            }
        }

        Ok(WindowHandle::new(window.label()))
    }

    fn show_window(&mut self, window: &WindowHandle) -> ShellResult<()> {
        let native = self
            .app_handle
            .get_webview_window(window.label())
            .ok_or_else(|| ShellError::WindowNotFound(window.label().to_string()))?;
        native.show()?;
        if let Err(error) = native.set_focus() {
            append_desktop_log(&format!(
                "failed to focus window {}: {error}",
                window.label()
            ));
        }
        Ok(())
    }

    fn open_window_count(&self) -> usize {
        self.app_handle.webview_windows().len()
    }

    fn show_app(&mut self) {
        #[cfg(target_os = "macos")]
        {
            if let Err(error) = self.app_handle.show() {
                append_desktop_log(&format!("failed to show app in dock: {error}"));
            }
        }
    }

    fn open_external(&mut self, url: &Url) -> Result<(), String> {
        self.app_handle
            .opener()
            .open_url(url.as_str(), None::<&str>)
            .map_err(|error| error.to_string())
    }

    fn set_app_user_model_id(&mut self, id: &str) {
        #[cfg(target_os = "windows")]
        {
            use windows::{core::PCWSTR, Win32::UI::Shell::SetCurrentProcessExplicitAppUserModelID};

            let wide: Vec<u16> = id.encode_utf16().chain(std::iter::once(0)).collect();
            // SAFETY: `wide` is NUL-terminated and outlives the call.
            if let Err(error) = unsafe { SetCurrentProcessExplicitAppUserModelID(PCWSTR(wide.as_ptr())) } {
                append_desktop_log(&format!("failed to set app user model id {id}: {error}"));
            }
        }

        #[cfg(not(target_os = "windows"))]
        log::debug!("app user model id {id} only applies to windows taskbar grouping");
    }

    fn watch_window_shortcuts(&mut self, label: &str) {
        match self.app_handle.try_state::<WatchedWindows>() {
            Some(watched) => {
                watched.watch(label);
            }
            None => append_desktop_log("watched window state missing; shortcuts not guarded"),
        }
    }

    fn exit(&mut self, code: i32) {
        self.app_handle.exit(code);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn webview_url_maps_relative_entry_to_bundled_asset() {
        let url = webview_url("main", &ContentSource::PackagedFile(PathBuf::from("index.html")))
            .expect("bundled url");
        assert!(matches!(url, WebviewUrl::App(path) if path == PathBuf::from("index.html")));
    }

    #[test]
    fn webview_url_keeps_dev_server_url() {
        let source =
            ContentSource::resolve(Some("http://localhost:5173"), None).expect("dev source");
        let url = webview_url("main", &source).expect("dev url");
        assert!(
            matches!(url, WebviewUrl::External(url) if url.as_str() == "http://localhost:5173/")
        );
    }

    #[test]
    fn undecodable_icon_falls_back_to_bundled_icon() {
        let bundled = Image::new_owned(vec![0, 128, 255, 255], 1, 1);
        let icon = icon_or_bundled(
            Err::<Image<'static>, _>("unsupported icns"),
            Some(&bundled),
            Path::new("icons/icon.icns"),
        )
        .expect("bundled fallback");
        assert_eq!(icon.rgba(), bundled.rgba());
        assert_eq!((icon.width(), icon.height()), (1, 1));

        assert!(icon_or_bundled(
            Err::<Image<'static>, _>("unsupported icns"),
            None,
            Path::new("icons/icon.icns"),
        )
        .is_none());
    }

    #[test]
    fn decodable_icon_is_used_as_is() {
        let override_icon = Image::new_owned(vec![255, 0, 0, 255], 1, 1);
        let bundled = Image::new_owned(vec![0, 0, 0, 255], 1, 1);
        let icon = icon_or_bundled(
            Ok::<_, String>(override_icon),
            Some(&bundled),
            Path::new("icons/icon.png"),
        )
        .expect("override icon");
        assert_eq!(icon.rgba(), &[255, 0, 0, 255]);
    }

    #[cfg(unix)]
    #[test]
    fn webview_url_maps_absolute_entry_to_file_url() {
        let url = webview_url(
            "main",
            &ContentSource::PackagedFile(PathBuf::from("/opt/escrcpy/dist/index.html")),
        )
        .expect("file url");
        assert!(matches!(
            url,
            WebviewUrl::External(url) if url.as_str() == "file:///opt/escrcpy/dist/index.html"
        ));
    }
}
