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

//! Normalization of raw platform strings into canonical identifiers.
//!
//! The mapping tables are fixed, priority-ordered sequences with
//! first-match-wins semantics. Both `normalize_os` and `normalize_arch`
//! are pure: identical input always produces identical output, so callers
//! may invoke them repeatedly within one environment.

use std::fmt;

/// Normalized operating system family identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Os {
    Aix,
    Hpux,
    Os400,
    Linux,
    Osx,
    Freebsd,
    Openbsd,
    Netbsd,
    Sunos,
    Windows,
    Zos,
    /// Fallback for platforms not covered by the table. Carries the
    /// lowercased, stripped raw value so the classifier is never empty.
    Other(String),
}

impl Os {
    pub fn id(&self) -> &str {
        match self {
            Os::Aix => "aix",
            Os::Hpux => "hpux",
            Os::Os400 => "os400",
            Os::Linux => "linux",
            Os::Osx => "osx",
            Os::Freebsd => "freebsd",
            Os::Openbsd => "openbsd",
            Os::Netbsd => "netbsd",
            Os::Sunos => "sunos",
            Os::Windows => "windows",
            Os::Zos => "zos",
            Os::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Os::Other(_))
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Normalized CPU architecture identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    X86_32,
    Itanium64,
    Itanium32,
    Sparc32,
    Sparc64,
    Arm32,
    Aarch64,
    Mips32,
    Mipsel32,
    Mips64,
    Mipsel64,
    Ppc32,
    Ppcle32,
    Ppc64,
    Ppcle64,
    S390_32,
    S390_64,
    Riscv,
    Riscv64,
    E2k,
    Loongarch64,
    /// Fallback for architectures not covered by the table.
    Other(String),
}

impl Arch {
    pub fn id(&self) -> &str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::X86_32 => "x86_32",
            Arch::Itanium64 => "itanium_64",
            Arch::Itanium32 => "itanium_32",
            Arch::Sparc32 => "sparc_32",
            Arch::Sparc64 => "sparc_64",
            Arch::Arm32 => "arm_32",
            Arch::Aarch64 => "aarch_64",
            Arch::Mips32 => "mips_32",
            Arch::Mipsel32 => "mipsel_32",
            Arch::Mips64 => "mips_64",
            Arch::Mipsel64 => "mipsel_64",
            Arch::Ppc32 => "ppc_32",
            Arch::Ppcle32 => "ppcle_32",
            Arch::Ppc64 => "ppc_64",
            Arch::Ppcle64 => "ppcle_64",
            Arch::S390_32 => "s390_32",
            Arch::S390_64 => "s390_64",
            Arch::Riscv => "riscv",
            Arch::Riscv64 => "riscv64",
            Arch::E2k => "e2k",
            Arch::Loongarch64 => "loongarch_64",
            Arch::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Arch::Other(_))
    }

    /// Resolve a canonical identifier string back to its variant. Used when
    /// custom alias entries map onto the canonical vocabulary; unrecognized
    /// identifiers are preserved as-is.
    pub fn from_id(id: &str) -> Arch {
        ARCH_RULES
            .iter()
            .map(|(_, arch)| arch)
            .find(|arch| arch.id() == id)
            .cloned()
            .unwrap_or_else(|| Arch::Other(id.to_string()))
    }

    /// Word size implied by the identifier, 64 if it names a 64-bit
    /// architecture and 32 otherwise.
    pub fn bitness(&self) -> u32 {
        if self.id().contains("64") { 64 } else { 32 }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Extra architecture alias layered over the default table by configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArchAlias {
    pub alias: String,
    pub arch: String,
}

/// OS rules, checked in order against the normalized value with prefix
/// matching. "solaris" must come before "sunos" only by convention; the two
/// never overlap.
const OS_RULES: &[(&str, Os)] = &[
    ("aix", Os::Aix),
    ("hpux", Os::Hpux),
    ("os400", Os::Os400),
    ("linux", Os::Linux),
    ("mac", Os::Osx),
    ("osx", Os::Osx),
    ("darwin", Os::Osx),
    ("freebsd", Os::Freebsd),
    ("openbsd", Os::Openbsd),
    ("netbsd", Os::Netbsd),
    ("solaris", Os::Sunos),
    ("sunos", Os::Sunos),
    ("windows", Os::Windows),
    ("zos", Os::Zos),
];

/// Arch rules, checked in order with exact matching against the alias sets.
const ARCH_RULES: &[(&[&str], Arch)] = &[
    (&["x8664", "amd64", "ia32e", "em64t", "x64"], Arch::X86_64),
    (
        &["x8632", "x86", "i386", "i486", "i586", "i686", "ia32", "x32"],
        Arch::X86_32,
    ),
    (&["ia64", "ia64w", "itanium64"], Arch::Itanium64),
    (&["ia64n"], Arch::Itanium32),
    (&["sparc", "sparc32"], Arch::Sparc32),
    (&["sparcv9", "sparc64"], Arch::Sparc64),
    (&["arm", "arm32"], Arch::Arm32),
    (&["aarch64", "arm64"], Arch::Aarch64),
    (&["mips", "mips32"], Arch::Mips32),
    (&["mipsel", "mips32el"], Arch::Mipsel32),
    (&["mips64"], Arch::Mips64),
    (&["mips64el"], Arch::Mipsel64),
    (&["ppc", "ppc32"], Arch::Ppc32),
    (&["ppcle", "ppc32le"], Arch::Ppcle32),
    (&["ppc64"], Arch::Ppc64),
    (&["ppc64le"], Arch::Ppcle64),
    (&["s390"], Arch::S390_32),
    (&["s390x"], Arch::S390_64),
    (&["riscv", "riscv32"], Arch::Riscv),
    (&["riscv64"], Arch::Riscv64),
    (&["e2k"], Arch::E2k),
    (&["loongarch64"], Arch::Loongarch64),
];

/// Lowercase the value and strip everything that is not an ASCII letter or
/// digit, so `"Mac OS X"` and `"macosx"` match identically.
fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Map a raw OS name onto its canonical family identifier.
pub fn normalize_os(raw: &str) -> Os {
    let value = normalize(raw);
    for (prefix, os) in OS_RULES {
        if value.starts_with(prefix) {
            // "os4000" and similar product names are not OS/400.
            if *os == Os::Os400
                && value.len() > 5
                && value.as_bytes()[5].is_ascii_digit()
            {
                continue;
            }
            return os.clone();
        }
    }
    Os::Other(value)
}

/// Map a raw architecture string onto its canonical identifier using the
/// default alias table.
pub fn normalize_arch(raw: &str) -> Arch {
    normalize_arch_with(raw, &[])
}

/// Like [`normalize_arch`], with caller-supplied aliases layered over the
/// default table. Extra aliases take priority, and among duplicates the
/// later entry wins.
pub fn normalize_arch_with(raw: &str, extra: &[ArchAlias]) -> Arch {
    let value = normalize(raw);
    if let Some(entry) = extra.iter().rev().find(|e| normalize(&e.alias) == value) {
        return Arch::from_id(&entry.arch);
    }
    for (aliases, arch) in ARCH_RULES {
        if aliases.contains(&value.as_str()) {
            return arch.clone();
        }
    }
    Arch::Other(value)
}
