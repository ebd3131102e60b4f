use std::path::PathBuf;

use crate::{
    platform_icon::{HostPlatform, IconPaths},
    window_shortcuts, APP_TITLE, MAIN_WINDOW_HEIGHT, MAIN_WINDOW_LABEL, MAIN_WINDOW_MIN_HEIGHT,
    MAIN_WINDOW_MIN_WIDTH, MAIN_WINDOW_WIDTH,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MainWindowConfig {
    pub label: &'static str,
    pub title: &'static str,
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub menu_bar_hidden: bool,
    pub visible: bool,
    /// Only set for development runs; packaged builds use the bundled app icon.
    pub icon: Option<PathBuf>,
    pub devtools: bool,
    /// Runs before page scripts on every load, so shortcuts are handled
    /// while the page is still loading.
    pub init_script: &'static str,
}

impl MainWindowConfig {
    pub fn new(packaged: bool, platform: HostPlatform, icons: &IconPaths) -> Self {
        let icon = (!packaged).then(|| icons.resolve(platform).to_path_buf());

        Self {
            label: MAIN_WINDOW_LABEL,
            title: APP_TITLE,
            width: MAIN_WINDOW_WIDTH,
            height: MAIN_WINDOW_HEIGHT,
            min_width: MAIN_WINDOW_MIN_WIDTH,
            min_height: MAIN_WINDOW_MIN_HEIGHT,
            menu_bar_hidden: true,
            visible: false,
            icon,
            devtools: !packaged,
            init_script: window_shortcuts::shortcut_script(packaged),
        }
    }
}
