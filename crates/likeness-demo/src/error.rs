use std::path::PathBuf;

use likeness::templates::{ConfigError, TemplateError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("failed to read data file {}: {source}", .path.display())]
    ReadData {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("data file {} is not valid JSON: {source}", .path.display())]
    ParseData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("rendered `{root}` has no input to edit")]
    NoInput { root: String },

    #[error("rendered `{root}` has no `{action}` control")]
    NoControl { root: String, action: String },
}
