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

//! Linux release refinement.
//!
//! On Linux the generic `linux` identifier can be qualified with the
//! distribution or libc the system runs on. Every source in the chain is
//! allowed to fail; a failure only means that source did not answer.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

const LINUX_ID_PREFIX: &str = "ID=";
const LINUX_ID_LIKE_PREFIX: &str = "ID_LIKE=";
const LINUX_VERSION_ID_PREFIX: &str = "VERSION_ID=";
const LINUX_OS_RELEASE_FILES: &[&str] = &["/etc/os-release", "/usr/lib/os-release"];
const REDHAT_RELEASE_FILE: &str = "/etc/redhat-release";
const DEFAULT_REDHAT_VARIANTS: &[&str] = &["rhel", "fedora"];

static MAJOR_VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").unwrap());
static LIBC_VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").unwrap());

/// Distribution or libc identification for a Linux system. Transient; only
/// lives long enough to build the refined classifier and release properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxRelease {
    pub id: String,
    pub version: Option<String>,
    /// Families this release is compatible with, in declaration order,
    /// deduplicated, always containing `id`.
    pub like: Vec<String>,
}

/// Resolve release information for the running Linux system.
///
/// Sources are consulted in a fixed order, first answer wins:
/// an override file supplied by the caller, the standard os-release files,
/// the legacy redhat-release file, and finally a libc probe. Returns `None`
/// when no source answers; the caller keeps the unqualified classifier.
pub fn resolve_linux_release(override_path: Option<&Path>) -> Option<LinuxRelease> {
    if let Some(path) = override_path {
        if let Some(release) = parse_os_release_file(path) {
            return Some(release);
        }
        log::debug!("Release file override {path:?} did not answer");
    }

    for file in LINUX_OS_RELEASE_FILES {
        if let Some(release) = parse_os_release_file(Path::new(file)) {
            return Some(release);
        }
    }

    // Older redhat-family systems predate /etc/os-release.
    if let Some(release) = parse_redhat_release_file(Path::new(REDHAT_RELEASE_FILE)) {
        return Some(release);
    }

    probe_libc()
}

/// Parse a file in the `/etc/os-release` key-value format, extracting the
/// `ID`, `VERSION_ID`, and `ID_LIKE` entries. Returns `None` when the file
/// is unreadable or carries no `ID`.
pub fn parse_os_release_file(path: &Path) -> Option<LinuxRelease> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("Could not read {path:?}: {e}");
            return None;
        }
    };

    let mut id = None;
    let mut version = None;
    let mut like: Vec<String> = Vec::new();

    for line in contents.lines() {
        if let Some(value) = line.strip_prefix(LINUX_ID_PREFIX) {
            let value = unquote(value);
            if !like.contains(&value) {
                like.push(value.clone());
            }
            id = Some(value);
        } else if let Some(value) = line.strip_prefix(LINUX_VERSION_ID_PREFIX) {
            version = Some(unquote(value));
        } else if let Some(value) = line.strip_prefix(LINUX_ID_LIKE_PREFIX) {
            for part in unquote(value).split_whitespace() {
                if !like.iter().any(|l| l == part) {
                    like.push(part.to_string());
                }
            }
        }
    }

    id.map(|id| LinuxRelease { id, version, like })
}

/// Parse the single-line `/etc/redhat-release` format. Only the centos,
/// fedora, and rhel spellings are recognized; other variants return `None`.
pub fn parse_redhat_release_file(path: &Path) -> Option<LinuxRelease> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("Could not read {path:?}: {e}");
            return None;
        }
    };

    let line = contents.lines().next()?.to_lowercase();
    let id = if line.contains("centos") {
        "centos"
    } else if line.contains("fedora") {
        "fedora"
    } else if line.contains("red hat enterprise linux") {
        "rhel"
    } else {
        return None;
    };

    let version = MAJOR_VERSION_REGEX
        .captures(&line)
        .map(|c| c[1].to_string());

    let mut like: Vec<String> = DEFAULT_REDHAT_VARIANTS
        .iter()
        .map(|v| v.to_string())
        .collect();
    if !like.iter().any(|l| l == id) {
        like.push(id.to_string());
    }

    Some(LinuxRelease {
        id: id.to_string(),
        version,
        like,
    })
}

/// Ask the dynamic linker which C library the system runs. musl's ldd
/// identifies itself on stderr; everything else is treated as the glibc
/// baseline. Returns `None` when ldd cannot be spawned at all.
fn probe_libc() -> Option<LinuxRelease> {
    let output = match Command::new("ldd").arg("--version").output() {
        Ok(output) => output,
        Err(e) => {
            log::debug!("Could not spawn ldd: {e}");
            return None;
        }
    };

    let mut text = String::from_utf8_lossy(&output.stdout).to_lowercase();
    text.push_str(&String::from_utf8_lossy(&output.stderr).to_lowercase());

    let id = if text.contains("musl") { "musl" } else { "glibc" };
    let version = LIBC_VERSION_REGEX.captures(&text).map(|c| c[1].to_string());

    Some(LinuxRelease {
        id: id.to_string(),
        version,
        like: vec![id.to_string()],
    })
}

// Strip surrounding whitespace and any quotes from an os-release value.
fn unquote(value: &str) -> String {
    value.trim().replace('"', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_release_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_os_release_file() {
        let file = write_release_file(
            "NAME=\"Ubuntu\"\n\
             VERSION=\"22.04.4 LTS (Jammy Jellyfish)\"\n\
             ID=ubuntu\n\
             ID_LIKE=debian\n\
             VERSION_ID=\"22.04\"\n",
        );
        let release = parse_os_release_file(file.path()).unwrap();
        assert_eq!(release.id, "ubuntu");
        assert_eq!(release.version.as_deref(), Some("22.04"));
        assert_eq!(release.like, vec!["ubuntu", "debian"]);
    }

    #[test]
    fn test_parse_os_release_file_alpine() {
        let file = write_release_file(
            "NAME=\"Alpine Linux\"\nID=alpine\nVERSION_ID=3.19.1\n",
        );
        let release = parse_os_release_file(file.path()).unwrap();
        assert_eq!(release.id, "alpine");
        assert_eq!(release.version.as_deref(), Some("3.19.1"));
        assert_eq!(release.like, vec!["alpine"]);
    }

    #[test]
    fn test_parse_os_release_file_like_set_dedup_keeps_order() {
        let file = write_release_file(
            "ID=centos\nID_LIKE=\"rhel fedora centos rhel\"\n",
        );
        let release = parse_os_release_file(file.path()).unwrap();
        assert_eq!(release.like, vec!["centos", "rhel", "fedora"]);
    }

    #[test]
    fn test_parse_os_release_file_without_id() {
        let file = write_release_file("NAME=\"Mystery Linux\"\nVERSION_ID=1.0\n");
        assert_eq!(parse_os_release_file(file.path()), None);
    }

    #[test]
    fn test_parse_os_release_file_missing() {
        assert_eq!(
            parse_os_release_file(Path::new("/nonexistent/os-release")),
            None
        );
    }

    #[test]
    fn test_parse_redhat_release_file_centos() {
        let file = write_release_file("CentOS Linux release 7.9.2009 (Core)\n");
        let release = parse_redhat_release_file(file.path()).unwrap();
        assert_eq!(release.id, "centos");
        assert_eq!(release.version.as_deref(), Some("7"));
        assert_eq!(release.like, vec!["rhel", "fedora", "centos"]);
    }

    #[test]
    fn test_parse_redhat_release_file_rhel() {
        let file =
            write_release_file("Red Hat Enterprise Linux release 9.3 (Plow)\n");
        let release = parse_redhat_release_file(file.path()).unwrap();
        assert_eq!(release.id, "rhel");
        assert_eq!(release.version.as_deref(), Some("9"));
        assert_eq!(release.like, vec!["rhel", "fedora"]);
    }

    #[test]
    fn test_parse_redhat_release_file_unsupported_variant() {
        let file = write_release_file("Scientific Linux release 6.10 (Carbon)\n");
        assert_eq!(parse_redhat_release_file(file.path()), None);
    }

    #[test]
    fn test_override_path_wins_over_system_sources() {
        let file = write_release_file("ID=buildroot\nVERSION_ID=2024.02\n");
        let release = resolve_linux_release(Some(file.path())).unwrap();
        assert_eq!(release.id, "buildroot");
        assert_eq!(release.version.as_deref(), Some("2024.02"));
    }

    #[test]
    fn test_unreadable_override_falls_through() {
        // The override must not abort the chain; on any Linux machine the
        // chain then answers from a system source, elsewhere it may not.
        let release = resolve_linux_release(Some(Path::new("/nonexistent/override")));
        if let Some(release) = release {
            assert!(!release.id.is_empty());
        }
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"22.04\""), "22.04");
        assert_eq!(unquote(" plain "), "plain");
    }
}
