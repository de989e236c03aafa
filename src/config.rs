use std::fs;
use std::path::Path;

use crate::{SvgrError, TransformOptions};

/// Parse transform options from TOML. Missing keys take their defaults.
pub fn parse_config(content: &str) -> Result<TransformOptions, SvgrError> {
    let options: TransformOptions = toml::from_str(content)?;
    Ok(options)
}

/// Load transform options from a TOML file.
pub fn load_config(path: &Path) -> Result<TransformOptions, SvgrError> {
    let content = fs::read_to_string(path).map_err(|err| SvgrError::Io(path.to_path_buf(), err))?;
    parse_config(&content)
}
