//! INI file configuration adapter.

use crate::domain::error::PropfirmError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PropfirmError> {
        let path = path.as_ref();
        // configparser folds I/O failures into its String error; check first
        // so a missing file maps to the I/O exit code.
        let content = std::fs::read_to_string(path)?;
        Self::from_string(&content).map_err(|reason| PropfirmError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[account]
name = Apex 50k
firm = apex
size = 50000

[ledger]
path = ./ledger
stem = apex50k
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("account", "name"), Some("Apex 50k".to_string()));
        assert_eq!(adapter.get_string("ledger", "stem"), Some("apex50k".to_string()));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[account]\nfirm = apex\n").unwrap();
        assert_eq!(adapter.get_string("account", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Account]\nFirm = Lucid\n").unwrap();
        assert_eq!(adapter.get_string("account", "firm"), Some("Lucid".to_string()));
    }

    #[test]
    fn get_double_returns_value() {
        let adapter = FileConfigAdapter::from_string("[account]\nsize = 25000.0\n").unwrap();
        assert_eq!(adapter.get_double("account", "size", 0.0), 25_000.0);
    }

    #[test]
    fn get_double_returns_default_for_missing_or_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[account]\nsize = big\n").unwrap();
        assert_eq!(adapter.get_double("account", "size", 99.9), 99.9);
        assert_eq!(adapter.get_double("account", "missing", 42.0), 42.0);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[account]\nfirm = bulenox\nsize = 100000\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("account", "firm"), Some("bulenox".to_string()));
    }

    #[test]
    fn from_file_missing_file_is_io_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/account.ini");
        assert!(matches!(result, Err(PropfirmError::Io(_))));
    }
}
