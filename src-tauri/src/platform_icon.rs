use std::{
    env,
    path::{Path, PathBuf},
};

use crate::LOGO_DIR_ENV;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl HostPlatform {
    pub fn current() -> Self {
        Self::from_os_id(env::consts::OS)
    }

    /// Accepts both Rust target names and the `win32`/`darwin` spellings.
    pub fn from_os_id(os_id: &str) -> Self {
        match os_id.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" => Self::Windows,
            "macos" | "darwin" => Self::MacOs,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPaths {
    pub ico: PathBuf,
    pub icns: PathBuf,
    pub default: PathBuf,
}

impl IconPaths {
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            ico: dir.join("icon.ico"),
            icns: dir.join("icon.icns"),
            default: dir.join("icon.png"),
        }
    }

    /// Without an override the crate's own `icons/` directory is used. The
    /// icon is only attached in development runs, which execute on the build
    /// machine.
    pub fn from_env() -> Self {
        let dir = env::var(LOGO_DIR_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("icons"));
        Self::from_dir(&dir)
    }

    pub fn resolve(&self, platform: HostPlatform) -> &Path {
        match platform {
            HostPlatform::Windows => &self.ico,
            HostPlatform::MacOs => &self.icns,
            HostPlatform::Linux | HostPlatform::Other => &self.default,
        }
    }
}
