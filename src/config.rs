// Copyright 2025 osdet contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detector::ArchAlias;
use crate::error::{OsdetError, Result};

/// Detection configuration. Every field is optional; the defaults detect
/// the current platform with the built-in tables and never fail.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DetectorConfig {
    /// Explicit classifier. When set, detection publishes it verbatim and
    /// skips refinement and the unknown-platform check.
    #[serde(default)]
    pub classifier: Option<String>,

    /// Fail instead of falling back to the raw value when the OS or the
    /// architecture is not in the tables.
    #[serde(default)]
    pub fail_on_unknown: bool,

    /// Release file consulted before the standard Linux sources.
    #[serde(default)]
    pub release_file: Option<PathBuf>,

    /// Extra architecture aliases layered over the default table.
    #[serde(default)]
    pub arch_aliases: Vec<ArchAlias>,
}

impl DetectorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            OsdetError::ConfigFile(format!("Failed to read {}: {e}", path.display()))
        })?;

        let config: DetectorConfig = toml::from_str(&contents).map_err(|e| {
            OsdetError::ConfigFile(format!("Failed to parse {}: {e}", path.display()))
        })?;

        log::debug!("Loaded config from {path:?}");
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(classifier) = &self.classifier {
            if classifier.trim().is_empty() {
                return Err(OsdetError::InvalidConfig(
                    "classifier override must not be empty".to_string(),
                ));
            }
        }
        for alias in &self.arch_aliases {
            if alias.alias.trim().is_empty() || alias.arch.trim().is_empty() {
                return Err(OsdetError::InvalidConfig(format!(
                    "arch alias entries need both 'alias' and 'arch': {alias:?}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.classifier, None);
        assert!(!config.fail_on_unknown);
        assert_eq!(config.release_file, None);
        assert!(config.arch_aliases.is_empty());
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            "classifier = \"linux-x86_64\"\n\
             fail_on_unknown = true\n\
             release_file = \"/etc/os-release\"\n\n\
             [[arch_aliases]]\n\
             alias = \"sw64\"\n\
             arch = \"sw_64\"\n",
        );
        let config = DetectorConfig::load(file.path()).unwrap();
        assert_eq!(config.classifier.as_deref(), Some("linux-x86_64"));
        assert!(config.fail_on_unknown);
        assert_eq!(
            config.release_file.as_deref(),
            Some(Path::new("/etc/os-release"))
        );
        assert_eq!(config.arch_aliases.len(), 1);
        assert_eq!(config.arch_aliases[0].alias, "sw64");
    }

    #[test]
    fn test_load_missing_file() {
        let err = DetectorConfig::load(Path::new("/nonexistent/osdet.toml")).unwrap_err();
        assert!(matches!(err, OsdetError::ConfigFile(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let file = write_config("classifier = [not toml");
        let err = DetectorConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, OsdetError::ConfigFile(_)));
    }

    #[test]
    fn test_empty_classifier_rejected() {
        let file = write_config("classifier = \"  \"\n");
        let err = DetectorConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, OsdetError::InvalidConfig(_)));
    }

    #[test]
    fn test_incomplete_arch_alias_rejected() {
        let file = write_config("[[arch_aliases]]\nalias = \"sw64\"\narch = \"\"\n");
        let err = DetectorConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, OsdetError::InvalidConfig(_)));
    }
}
