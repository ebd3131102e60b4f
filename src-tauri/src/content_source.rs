use std::{
    env,
    path::{Path, PathBuf},
};

use url::Url;

use crate::{error::ShellError, DEV_SERVER_URL_ENV, DIST_DIR_ENV, PACKAGED_ENTRY_FILE};

/// Where the primary window loads its content from. Chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    DevServer(Url),
    /// Entry file under the distribution directory. Relative paths point into
    /// the bundled frontend assets.
    PackagedFile(PathBuf),
}

impl ContentSource {
    pub fn from_env() -> Result<Self, ShellError> {
        let dev_url = env::var(DEV_SERVER_URL_ENV).ok();
        let dist_dir = env::var(DIST_DIR_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::resolve(dev_url.as_deref(), dist_dir.as_deref())
    }

    pub fn resolve(dev_url: Option<&str>, dist_dir: Option<&Path>) -> Result<Self, ShellError> {
        if let Some(raw) = dev_url.map(str::trim).filter(|raw| !raw.is_empty()) {
            return parse_dev_server_url(raw).map(Self::DevServer);
        }

        let entry = match dist_dir {
            Some(dir) => dir.join(PACKAGED_ENTRY_FILE),
            None => PathBuf::from(PACKAGED_ENTRY_FILE),
        };
        Ok(Self::PackagedFile(entry))
    }

    pub fn is_dev_server(&self) -> bool {
        matches!(self, Self::DevServer(_))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::DevServer(url) => format!("dev server {url}"),
            Self::PackagedFile(path) => format!("packaged file {}", path.display()),
        }
    }
}

fn parse_dev_server_url(raw: &str) -> Result<Url, ShellError> {
    let invalid = |reason: String| ShellError::InvalidDevServerUrl {
        url: raw.to_string(),
        reason,
    };
    let parsed = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(invalid(format!(
            "unsupported scheme '{scheme}', expected http or https"
        ))),
    }
}
