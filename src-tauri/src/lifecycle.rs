//! Lifecycle of the single primary window.
//!
//! `ApplicationShell` owns the window handle and reacts to platform signals
//! delivered as [`ShellEvent`]s. Native effects go through [`WindowPlatform`],
//! so the state machine runs unchanged against Tauri or a test double.

use url::Url;

use crate::{
    content_source::ContentSource,
    error::ShellResult,
    link_policy::{self, LinkDecision},
    main_window::MainWindowConfig,
    platform_icon::{HostPlatform, IconPaths},
};

/// Exclusively owned handle to the primary native window.
#[derive(Debug, PartialEq, Eq)]
pub struct WindowHandle {
    label: String,
}

impl WindowHandle {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Absent,
    Creating,
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Ready,
    Activate,
    AllWindowsClosed,
    ContentReady { label: String },
    WindowCreated { label: String },
    NewWindowRequested { url: String },
}

pub trait WindowPlatform {
    /// Builds the window hidden. The platform installs the new-window
    /// interception on it and starts loading `content`.
    fn build_window(
        &mut self,
        config: &MainWindowConfig,
        content: &ContentSource,
    ) -> ShellResult<WindowHandle>;
    fn show_window(&mut self, window: &WindowHandle) -> ShellResult<()>;
    fn open_window_count(&self) -> usize;
    /// Brings back the dock/taskbar presence of the app.
    fn show_app(&mut self);
    fn open_external(&mut self, url: &Url) -> Result<(), String>;
    fn set_app_user_model_id(&mut self, id: &str);
    fn watch_window_shortcuts(&mut self, label: &str);
    fn exit(&mut self, code: i32);
}

/// Extension point handed every created primary window.
pub type WindowHook = Box<dyn Fn(&WindowHandle) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ShellContext {
    pub packaged: bool,
    pub platform: HostPlatform,
    pub icons: IconPaths,
    pub content: ContentSource,
    pub app_user_model_id: &'static str,
}

pub struct ApplicationShell<P> {
    platform: P,
    context: ShellContext,
    window: Option<WindowHandle>,
    state: WindowState,
    ready: bool,
    quitting: bool,
    watch_new_windows: bool,
    window_hooks: Vec<WindowHook>,
    log: fn(&str),
}

impl<P: WindowPlatform> ApplicationShell<P> {
    pub fn new(platform: P, context: ShellContext, log: fn(&str)) -> Self {
        Self {
            platform,
            context,
            window: None,
            state: WindowState::Absent,
            ready: false,
            quitting: false,
            watch_new_windows: false,
            window_hooks: Vec::new(),
            log,
        }
    }

    pub fn register_window_hook(&mut self, hook: WindowHook) {
        self.window_hooks.push(hook);
    }

    #[cfg(test)]
    pub fn state(&self) -> WindowState {
        self.state
    }

    #[cfg(test)]
    pub fn window(&self) -> Option<&WindowHandle> {
        self.window.as_ref()
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    #[cfg(test)]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn dispatch(&mut self, event: ShellEvent) -> ShellResult<()> {
        match event {
            ShellEvent::Ready => self.on_ready(),
            ShellEvent::Activate => self.on_activate(),
            ShellEvent::AllWindowsClosed => {
                self.on_all_windows_closed();
                Ok(())
            }
            ShellEvent::ContentReady { label } => self.on_content_ready(&label),
            ShellEvent::WindowCreated { label } => {
                self.on_window_created(&label);
                Ok(())
            }
            ShellEvent::NewWindowRequested { url } => {
                self.on_new_window_requested(&url);
                Ok(())
            }
        }
    }

    pub fn create_window(&mut self) -> ShellResult<()> {
        let config = MainWindowConfig::new(
            self.context.packaged,
            self.context.platform,
            &self.context.icons,
        );
        (self.log)(&format!(
            "creating main window from {}",
            self.context.content.describe()
        ));

        let window = self.platform.build_window(&config, &self.context.content)?;
        for hook in &self.window_hooks {
            hook(&window);
        }
        self.window = Some(window);
        self.state = WindowState::Creating;
        Ok(())
    }

    /// Second phase of creation: the window is shown once its content is ready.
    pub fn on_content_ready(&mut self, label: &str) -> ShellResult<()> {
        if self.state != WindowState::Creating {
            return Ok(());
        }
        let Some(window) = self.window.as_ref().filter(|window| window.label() == label) else {
            return Ok(());
        };

        self.platform.show_window(window)?;
        self.state = WindowState::Visible;
        Ok(())
    }

    pub fn on_activate(&mut self) -> ShellResult<()> {
        if self.platform.open_window_count() == 0 {
            if self.window.take().is_some() {
                (self.log)("dropping stale main window handle before re-creating");
            }
            return self.create_window();
        }

        self.platform.show_app();
        match self.window.as_ref() {
            Some(window) => {
                self.platform.show_window(window)?;
                self.state = WindowState::Visible;
            }
            None => (self.log)("activate skipped show: main window not owned by shell"),
        }
        Ok(())
    }

    pub fn on_all_windows_closed(&mut self) {
        self.quitting = true;
        (self.log)("all windows closed, exiting desktop process");
        self.platform.exit(0);
        self.window = None;
        self.state = WindowState::Absent;
    }

    pub fn on_ready(&mut self) -> ShellResult<()> {
        if self.ready {
            (self.log)("ready signal ignored: shell already started");
            return Ok(());
        }
        self.ready = true;

        self.platform
            .set_app_user_model_id(self.context.app_user_model_id);
        self.watch_new_windows = true;
        self.create_window()
    }

    pub fn on_window_created(&mut self, label: &str) {
        if self.watch_new_windows {
            self.platform.watch_window_shortcuts(label);
        }
    }

    pub fn on_new_window_requested(&mut self, raw_url: &str) -> LinkDecision {
        let platform = &mut self.platform;
        link_policy::route_new_window_request(raw_url, |url| platform.open_external(url), self.log)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::{Path, PathBuf},
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use super::*;
    use crate::error::ShellError;

    #[derive(Debug, Default)]
    struct FakePlatform {
        open_windows: Vec<String>,
        built: Vec<(MainWindowConfig, ContentSource)>,
        shown: Vec<String>,
        app_shown: usize,
        opened_urls: Vec<String>,
        app_ids: Vec<String>,
        watched: Vec<String>,
        exit_codes: Vec<i32>,
        fail_build: bool,
    }

    impl WindowPlatform for FakePlatform {
        fn build_window(
            &mut self,
            config: &MainWindowConfig,
            content: &ContentSource,
        ) -> ShellResult<WindowHandle> {
            if self.fail_build {
                return Err(ShellError::WindowCreation {
                    label: config.label.to_string(),
                    reason: "no display".to_string(),
                });
            }
            self.built.push((config.clone(), content.clone()));
            self.open_windows.push(config.label.to_string());
            Ok(WindowHandle::new(config.label))
        }

        fn show_window(&mut self, window: &WindowHandle) -> ShellResult<()> {
            self.shown.push(window.label().to_string());
            Ok(())
        }

        fn open_window_count(&self) -> usize {
            self.open_windows.len()
        }

        fn show_app(&mut self) {
            self.app_shown += 1;
        }

        fn open_external(&mut self, url: &Url) -> Result<(), String> {
            self.opened_urls.push(url.to_string());
            Ok(())
        }

        fn set_app_user_model_id(&mut self, id: &str) {
            self.app_ids.push(id.to_string());
        }

        fn watch_window_shortcuts(&mut self, label: &str) {
            self.watched.push(label.to_string());
        }

        fn exit(&mut self, code: i32) {
            self.exit_codes.push(code);
            self.open_windows.clear();
        }
    }

    fn noop(_: &str) {}

    fn context(packaged: bool, content: ContentSource) -> ShellContext {
        ShellContext {
            packaged,
            platform: HostPlatform::Linux,
            icons: IconPaths::from_dir(Path::new("/opt/escrcpy/logo")),
            content,
            app_user_model_id: "com.viarotel.escrcpy",
        }
    }

    fn packaged_source() -> ContentSource {
        ContentSource::resolve(None, Some(Path::new("/opt/escrcpy/dist"))).expect("source")
    }

    fn new_shell(packaged: bool) -> ApplicationShell<FakePlatform> {
        ApplicationShell::new(
            FakePlatform::default(),
            context(packaged, packaged_source()),
            noop,
        )
    }

    #[test]
    fn ready_creates_one_hidden_window_and_sets_identity() {
        let mut shell = new_shell(false);
        shell.dispatch(ShellEvent::Ready).expect("ready");

        assert_eq!(shell.state(), WindowState::Creating);
        assert_eq!(shell.window().map(WindowHandle::label), Some("main"));
        assert_eq!(shell.platform().app_ids, vec!["com.viarotel.escrcpy"]);
        assert_eq!(shell.platform().built.len(), 1);
        assert!(!shell.platform().built[0].0.visible);
        assert!(shell.platform().shown.is_empty());
    }

    #[test]
    fn ready_is_only_effective_once() {
        let mut shell = new_shell(false);
        shell.dispatch(ShellEvent::Ready).expect("ready");
        shell.dispatch(ShellEvent::Ready).expect("second ready");

        assert_eq!(shell.platform().built.len(), 1);
        assert_eq!(shell.platform().app_ids.len(), 1);
    }

    #[test]
    fn content_ready_shows_window_exactly_once() {
        let mut shell = new_shell(false);
        shell.dispatch(ShellEvent::Ready).expect("ready");

        let ready = ShellEvent::ContentReady {
            label: "main".to_string(),
        };
        shell.dispatch(ready.clone()).expect("content ready");
        shell.dispatch(ready).expect("reload finished");

        assert_eq!(shell.state(), WindowState::Visible);
        assert_eq!(shell.platform().shown, vec!["main"]);
    }

    #[test]
    fn content_ready_for_other_label_is_ignored() {
        let mut shell = new_shell(false);
        shell.dispatch(ShellEvent::Ready).expect("ready");
        shell
            .dispatch(ShellEvent::ContentReady {
                label: "devtools".to_string(),
            })
            .expect("content ready");

        assert_eq!(shell.state(), WindowState::Creating);
        assert!(shell.platform().shown.is_empty());
    }

    #[test]
    fn activate_with_existing_window_never_adds_a_window() {
        let mut shell = new_shell(false);
        shell.dispatch(ShellEvent::Ready).expect("ready");
        for _ in 0..3 {
            shell.dispatch(ShellEvent::Activate).expect("activate");
        }

        assert_eq!(shell.platform().open_window_count(), 1);
        assert_eq!(shell.platform().built.len(), 1);
        assert_eq!(shell.platform().app_shown, 3);
        assert_eq!(shell.platform().shown, vec!["main", "main", "main"]);
        assert_eq!(shell.state(), WindowState::Visible);
    }

    #[test]
    fn activate_without_windows_creates_exactly_one_without_forcing_show() {
        let mut shell = new_shell(false);
        shell.dispatch(ShellEvent::Activate).expect("activate");

        assert_eq!(shell.platform().open_window_count(), 1);
        assert_eq!(shell.state(), WindowState::Creating);
        assert_eq!(shell.platform().app_shown, 0);
        assert!(shell.platform().shown.is_empty());
    }

    #[test]
    fn activate_replaces_stale_handle_when_platform_has_no_windows() {
        let mut shell = new_shell(false);
        shell.dispatch(ShellEvent::Ready).expect("ready");
        shell.platform.open_windows.clear();

        shell.dispatch(ShellEvent::Activate).expect("activate");
        assert_eq!(shell.platform().open_window_count(), 1);
        assert_eq!(shell.platform().built.len(), 2);
    }

    #[test]
    fn packaged_entry_is_loaded_without_dev_server() {
        let mut shell = new_shell(true);
        shell.create_window().expect("create");

        assert_eq!(
            shell.platform().built[0].1,
            ContentSource::PackagedFile(PathBuf::from("/opt/escrcpy/dist/index.html"))
        );
    }

    #[test]
    fn dev_server_url_is_loaded_when_configured() {
        let source =
            ContentSource::resolve(Some("http://localhost:5173"), None).expect("dev source");
        let mut shell = ApplicationShell::new(FakePlatform::default(), context(false, source), noop);
        shell.create_window().expect("create");

        match &shell.platform().built[0].1 {
            ContentSource::DevServer(url) => assert_eq!(url.as_str(), "http://localhost:5173/"),
            other => panic!("expected dev server, got {other:?}"),
        }
    }

    #[test]
    fn packaged_window_config_omits_icon() {
        let mut shell = new_shell(true);
        shell.create_window().expect("create");
        assert_eq!(shell.platform().built[0].0.icon, None);

        let mut shell = new_shell(false);
        shell.create_window().expect("create");
        assert_eq!(
            shell.platform().built[0].0.icon.as_deref(),
            Some(Path::new("/opt/escrcpy/logo/icon.png"))
        );
    }

    #[test]
    fn all_windows_closed_marks_quitting_and_clears_window() {
        let mut shell = new_shell(false);
        shell.dispatch(ShellEvent::Ready).expect("ready");
        shell
            .dispatch(ShellEvent::AllWindowsClosed)
            .expect("all closed");

        assert!(shell.is_quitting());
        assert!(shell.window().is_none());
        assert_eq!(shell.state(), WindowState::Absent);
        assert_eq!(shell.platform().exit_codes, vec![0]);
    }

    #[test]
    fn new_window_request_is_denied_and_forwarded_once() {
        let mut shell = new_shell(false);
        shell.dispatch(ShellEvent::Ready).expect("ready");

        let decision = shell.on_new_window_requested("https://github.com/viarotel-org/escrcpy");
        assert_eq!(decision, LinkDecision::Deny);
        assert_eq!(
            shell.platform().opened_urls,
            vec!["https://github.com/viarotel-org/escrcpy"]
        );
        assert_eq!(shell.platform().open_window_count(), 1);
    }

    #[test]
    fn window_hooks_receive_every_created_window() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut shell = new_shell(false);
        let hook_calls = Arc::clone(&calls);
        shell.register_window_hook(Box::new(move |window| {
            assert_eq!(window.label(), "main");
            hook_calls.fetch_add(1, Ordering::SeqCst);
        }));

        shell.dispatch(ShellEvent::Ready).expect("ready");
        shell.platform.open_windows.clear();
        shell.dispatch(ShellEvent::Activate).expect("activate");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn shortcut_watching_starts_with_ready() {
        let mut shell = new_shell(false);
        shell
            .dispatch(ShellEvent::WindowCreated {
                label: "early".to_string(),
            })
            .expect("created");
        assert!(shell.platform().watched.is_empty());

        shell.dispatch(ShellEvent::Ready).expect("ready");
        for label in ["main", "about"] {
            shell
                .dispatch(ShellEvent::WindowCreated {
                    label: label.to_string(),
                })
                .expect("created");
        }

        assert_eq!(shell.platform().watched, vec!["main", "about"]);
    }

    #[test]
    fn window_creation_failure_propagates() {
        let mut shell = ApplicationShell::new(
            FakePlatform {
                fail_build: true,
                ..FakePlatform::default()
            },
            context(false, packaged_source()),
            noop,
        );

        let error = shell.dispatch(ShellEvent::Ready).expect_err("build fails");
        assert!(matches!(error, ShellError::WindowCreation { .. }));
        assert_eq!(shell.state(), WindowState::Absent);
        assert!(shell.window().is_none());
    }
}
