use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvgrError {
    #[error("SVG code is required and cannot be empty (item {item_index})")]
    EmptyInput { item_index: usize },

    #[error("item {item_index}: {message}")]
    Item { item_index: usize, message: String },

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SvgrError {
    /// Index of the input item this error belongs to, if any.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::EmptyInput { item_index } | Self::Item { item_index, .. } => Some(*item_index),
            _ => None,
        }
    }
}
