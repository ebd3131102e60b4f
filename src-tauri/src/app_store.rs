use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

use crate::{runtime_paths, SETTINGS_FILE};

fn empty_state_object() -> Value {
    Value::Object(Map::new())
}

/// JSON settings file addressed with dotted keys such as `common.debug`.
#[derive(Debug, Clone)]
pub struct AppStore {
    path: PathBuf,
}

impl AppStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILE))
    }

    pub fn open_default() -> Option<Self> {
        runtime_paths::default_settings_dir().map(|dir| Self::in_dir(&dir))
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_root<F>(&self, log: F) -> Value
    where
        F: Fn(&str),
    {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return empty_state_object();
            }
            Err(error) => {
                log(&format!(
                    "failed to read settings {}: {}",
                    self.path.display(),
                    error
                ));
                return empty_state_object();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(error) => {
                log(&format!(
                    "failed to parse settings {}: {}",
                    self.path.display(),
                    error
                ));
                empty_state_object()
            }
        }
    }

    pub fn get<F>(&self, key: &str, log: F) -> Option<Value>
    where
        F: Fn(&str),
    {
        let root = self.read_root(log);
        let mut current = &root;
        for segment in key.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current.clone())
    }

    /// Missing keys, `null`, `false`, `0` and `""` all read as false.
    pub fn get_bool<F>(&self, key: &str, log: F) -> bool
    where
        F: Fn(&str),
    {
        match self.get(key, log) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(value)) => value,
            Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value != 0.0),
            Some(Value::String(value)) => !value.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }
}
