//! `[output]` section: how answers are printed

use luabridge_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Unset means "text unless the command line says otherwise"
    pub format: Option<OutputFormat>,
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Format to print with; a command line choice wins over the file.
    pub fn effective_format(&self, requested: Option<OutputFormat>) -> OutputFormat {
        requested.or(self.format).unwrap_or_default()
    }

    /// Color is on only when neither the file nor `--no-color` turned it off.
    pub fn effective_color(&self, no_color_flag: bool) -> bool {
        self.color && !no_color_flag
    }
}
