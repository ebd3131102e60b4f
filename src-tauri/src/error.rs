//! Error type shared by the desktop shell.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Invalid dev server URL '{url}': {reason}")]
    InvalidDevServerUrl { url: String, reason: String },

    #[error("Failed to create window '{label}': {reason}")]
    WindowCreation { label: String, reason: String },

    #[error("Window not found: {0}")]
    WindowNotFound(String),

    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;
