pub const APP_USER_MODEL_ID: &str = "com.viarotel.escrcpy";
pub const APP_TITLE: &str = "Escrcpy";

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const MAIN_WINDOW_WIDTH: f64 = 1200.0;
pub const MAIN_WINDOW_HEIGHT: f64 = 800.0;
pub const MAIN_WINDOW_MIN_WIDTH: f64 = 1200.0;
pub const MAIN_WINDOW_MIN_HEIGHT: f64 = 800.0;

pub const DEV_SERVER_URL_ENV: &str = "VITE_DEV_SERVER_URL";
pub const DIST_DIR_ENV: &str = "DIST";
pub const LOGO_DIR_ENV: &str = "ESCRCPY_LOGO_DIR";
pub const SETTINGS_DIR_ENV: &str = "ESCRCPY_SETTINGS_DIR";

pub const PACKAGED_ENTRY_FILE: &str = "index.html";
pub const SETTINGS_FILE: &str = "config.json";
pub const DEBUG_SETTING_KEY: &str = "common.debug";
pub const DESKTOP_LOG_FILE: &str = "escrcpy-desktop";
