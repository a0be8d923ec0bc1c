//! Coordinator configuration loaded from RON.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{Result, host::DEFAULT_EXIT_KEY};

/// Coordinator settings, loaded from RON.
///
/// ```ron
/// (initial_focus: false, exit_key: "Escape")
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FocusConfig {
    /// Desired and actual focus at construction.
    pub initial_focus: bool,
    /// Key identifier that exits game focus.
    pub exit_key: String,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            initial_focus: false,
            exit_key: DEFAULT_EXIT_KEY.to_string(),
        }
    }
}

impl FocusConfig {
    /// Parse a configuration from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Read and parse a RON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_struct_uses_defaults() {
        let cfg = FocusConfig::from_ron_str("()").expect("parse");
        assert_eq!(cfg, FocusConfig::default());
        assert_eq!(cfg.exit_key, "Escape");
    }

    #[test]
    fn fields_override_defaults() {
        let cfg =
            FocusConfig::from_ron_str(r#"(initial_focus: true, exit_key: "F12")"#).expect("parse");
        assert!(cfg.initial_focus);
        assert_eq!(cfg.exit_key, "F12");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = FocusConfig::from_ron_str("(focus: true)").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FocusConfig::load(Path::new("/nonexistent/gamefocus.ron")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
