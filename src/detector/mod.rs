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

//! Platform detection facade.
//!
//! Orchestrates normalization and Linux release refinement and assembles
//! the detected property mapping. [`Detector::detect`] is the only public
//! entry point; each invocation is self-contained and produces a fresh,
//! immutable [`DetectedProperties`].

mod normalizer;
mod release;

pub use normalizer::{Arch, ArchAlias, Os, normalize_arch, normalize_arch_with, normalize_os};
pub use release::{
    LinuxRelease, parse_os_release_file, parse_redhat_release_file, resolve_linux_release,
};

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::DetectorConfig;
use crate::error::{OsdetError, Result};

pub const OS_NAME: &str = "os.name";
pub const OS_ARCH: &str = "os.arch";
pub const OS_VERSION: &str = "os.version";
pub const DETECTED_NAME: &str = "os.detected.name";
pub const DETECTED_ARCH: &str = "os.detected.arch";
pub const DETECTED_BITNESS: &str = "os.detected.bitness";
pub const DETECTED_VERSION: &str = "os.detected.version";
pub const DETECTED_VERSION_MAJOR: &str = "os.detected.version.major";
pub const DETECTED_VERSION_MINOR: &str = "os.detected.version.minor";
pub const DETECTED_CLASSIFIER: &str = "os.detected.classifier";
pub const DETECTED_RELEASE: &str = "os.detected.release";
pub const DETECTED_RELEASE_VERSION: &str = "os.detected.release.version";
pub const DETECTED_RELEASE_LIKE_PREFIX: &str = "os.detected.release.like.";
pub const DETECTED_RELEASE_CLASSIFIER: &str = "os.detected.release.classifier";

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((\d+)\.(\d+)).*$").unwrap());

/// Unprocessed platform values captured once per detection invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPlatformInfo {
    pub os_name: String,
    pub os_version: String,
    pub os_arch: String,
}

impl RawPlatformInfo {
    pub fn new(os_name: &str, os_version: &str, os_arch: &str) -> Self {
        Self {
            os_name: os_name.to_string(),
            os_version: os_version.to_string(),
            os_arch: os_arch.to_string(),
        }
    }

    /// Snapshot the current process environment.
    pub fn from_env() -> Self {
        use sysinfo::System;
        Self {
            os_name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            os_version: System::os_version().unwrap_or_default(),
            os_arch: System::cpu_arch().unwrap_or_else(|| std::env::consts::ARCH.to_string()),
        }
    }
}

/// The detected property mapping. Always carries the canonical keys;
/// release keys appear only when Linux refinement answered. Iteration
/// order is deterministic, so repeated detections in one environment
/// serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DetectedProperties(BTreeMap<String, String>);

impl DetectedProperties {
    fn new() -> Self {
        Self(BTreeMap::new())
    }

    fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn classifier(&self) -> &str {
        self.get(DETECTED_CLASSIFIER).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a DetectedProperties {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Detection facade. Holds the caller's configuration; carries no state
/// between invocations.
#[derive(Debug, Clone, Default)]
pub struct Detector {
    config: DetectorConfig,
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Classify the platform described by `raw`.
    ///
    /// Fails only when `fail_on_unknown` is set, normalization fell back
    /// for the OS or the architecture, and no classifier override was
    /// supplied. Never returns a partially populated mapping.
    pub fn detect(&self, raw: &RawPlatformInfo) -> Result<DetectedProperties> {
        let os = normalize_os(&raw.os_name);
        let arch = normalize_arch_with(&raw.os_arch, &self.config.arch_aliases);

        // An explicit override bypasses refinement and the unknown check.
        let linux_release = if self.config.classifier.is_none() && os == Os::Linux {
            release::resolve_linux_release(self.config.release_file.as_deref())
        } else {
            None
        };

        self.assemble(raw, &os, &arch, linux_release.as_ref())
    }

    fn assemble(
        &self,
        raw: &RawPlatformInfo,
        os: &Os,
        arch: &Arch,
        linux_release: Option<&LinuxRelease>,
    ) -> Result<DetectedProperties> {
        if self.config.classifier.is_none()
            && self.config.fail_on_unknown
            && (!os.is_known() || !arch.is_known())
        {
            return Err(OsdetError::UnsupportedPlatform {
                os_name: raw.os_name.clone(),
                os_arch: raw.os_arch.clone(),
            });
        }

        let mut props = DetectedProperties::new();
        props.insert(OS_NAME, raw.os_name.clone());
        props.insert(OS_ARCH, raw.os_arch.clone());
        props.insert(OS_VERSION, raw.os_version.clone());
        props.insert(DETECTED_NAME, os.id());
        props.insert(DETECTED_ARCH, arch.id());
        props.insert(DETECTED_BITNESS, arch.bitness().to_string());
        props.insert(DETECTED_VERSION, raw.os_version.clone());

        if let Some(caps) = VERSION_REGEX.captures(&raw.os_version) {
            props.insert(DETECTED_VERSION_MAJOR, caps[2].to_string());
            props.insert(DETECTED_VERSION_MINOR, caps[3].to_string());
        }

        if let Some(classifier) = &self.config.classifier {
            props.insert(DETECTED_CLASSIFIER, classifier.clone());
            return Ok(props);
        }

        if let Some(release) = linux_release {
            props.insert(DETECTED_RELEASE, release.id.clone());
            if let Some(version) = &release.version {
                props.insert(DETECTED_RELEASE_VERSION, version.clone());
            }
            for like in &release.like {
                props.insert(&format!("{DETECTED_RELEASE_LIKE_PREFIX}{like}"), "true");
            }
            props.insert(
                DETECTED_RELEASE_CLASSIFIER,
                format!("{os}_{}-{arch}", release.id),
            );
        }

        props.insert(DETECTED_CLASSIFIER, format!("{os}-{arch}"));
        Ok(props)
    }
}
