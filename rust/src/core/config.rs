use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub(crate) const CONFIG_FILE_NAME: &str = "grouplink_config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Reserved "share within the app" button. Hidden until in-app sharing exists.
    pub share_in_app_enabled: bool,
    /// Reserved QR code button.
    pub show_qr_code_enabled: bool,
    /// Overrides the default tracing filter, e.g. `"grouplink_core=debug"`.
    pub log_filter: Option<String>,
}

/// Missing file is not an error; the sheet runs on defaults.
pub(crate) fn load_sheet_config(data_dir: &str) -> anyhow::Result<SheetConfig> {
    let path = Path::new(data_dir).join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(SheetConfig::default());
    }
    let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}
