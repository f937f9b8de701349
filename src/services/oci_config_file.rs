//! Parser for the OCI CLI profile file (`~/.oci/config`).
//!
//! The format is INI-like: `[PROFILE]` headers followed by `key=value` lines.
//! Lines before the first header form an unnamed section that is treated the
//! same as `[DEFAULT]`.

use crate::constants::credentials::DEFAULT_PROFILE;
use crate::utils::user_paths::expand_home_path;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigFileError {
    #[error("config file not found at {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("profile '{0}' not found")]
    MissingProfile(String),
    #[error("profile '{profile}' is missing '{key}'")]
    MissingKey { profile: String, key: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSection {
    pub name: String,
    entries: BTreeMap<String, String>,
}

impl ProfileSection {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn require(&self, key: &str) -> Result<&str, ConfigFileError> {
        self.get(key).ok_or_else(|| ConfigFileError::MissingKey {
            profile: self.name.clone(),
            key: key.to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads the file a `*_file` key points at, expanding `~`.
    pub fn read_referenced_file(
        &self,
        key: &str,
        home: Option<&str>,
    ) -> Result<Option<String>, ConfigFileError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        let path = expand_home_path(raw, home);
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|err| ConfigFileError::Unreadable {
                path,
                reason: err.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct OciConfigFile {
    pub path: PathBuf,
    sections: Vec<ProfileSection>,
}

impl OciConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Err(ConfigFileError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|err| ConfigFileError::Unreadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let mut parsed = Self::parse(&content)?;
        parsed.path = path.to_path_buf();
        Ok(parsed)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigFileError> {
        let mut sections = vec![ProfileSection::default()];
        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') {
                let name = line
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(str::trim)
                    .ok_or_else(|| ConfigFileError::Malformed {
                        line: line_no,
                        reason: "profile header is missing its closing ']'".to_string(),
                    })?;
                if name.is_empty() {
                    return Err(ConfigFileError::Malformed {
                        line: line_no,
                        reason: "profile header has an empty name".to_string(),
                    });
                }
                sections.push(ProfileSection {
                    name: name.to_string(),
                    entries: BTreeMap::new(),
                });
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| ConfigFileError::Malformed {
                line: line_no,
                reason: "expected key=value".to_string(),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigFileError::Malformed {
                    line: line_no,
                    reason: "empty key".to_string(),
                });
            }
            if let Some(section) = sections.last_mut() {
                section
                    .entries
                    .insert(key.to_string(), value.trim().to_string());
            }
        }
        Ok(Self {
            path: PathBuf::new(),
            sections,
        })
    }

    pub fn section(&self, name: &str) -> Option<&ProfileSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// `[DEFAULT]` merged over any unnamed leading lines.
    pub fn default_profile(&self) -> Result<ProfileSection, ConfigFileError> {
        let unnamed = self.section("").filter(|s| !s.is_empty());
        let named = self.section(DEFAULT_PROFILE);
        if unnamed.is_none() && named.is_none() {
            return Err(ConfigFileError::MissingProfile(DEFAULT_PROFILE.to_string()));
        }
        let mut entries = BTreeMap::new();
        for section in [unnamed, named].into_iter().flatten() {
            entries.extend(section.entries.clone());
        }
        Ok(ProfileSection {
            name: DEFAULT_PROFILE.to_string(),
            entries,
        })
    }

    /// A named profile inherits unset keys from the default profile.
    pub fn profile(&self, name: &str) -> Result<ProfileSection, ConfigFileError> {
        if name == DEFAULT_PROFILE {
            return self.default_profile();
        }
        let section = self
            .section(name)
            .filter(|_| !name.is_empty())
            .ok_or_else(|| ConfigFileError::MissingProfile(name.to_string()))?;
        let mut entries = self
            .default_profile()
            .map(|p| p.entries)
            .unwrap_or_default();
        entries.extend(section.entries.clone());
        Ok(ProfileSection {
            name: name.to_string(),
            entries,
        })
    }
}
