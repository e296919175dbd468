//! Inspect the host machine.
use serde::{Serialize, Serializer};

use std::fmt;

/// A normalized description of the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    /// The native CPU architecture.
    pub architecture: Architecture,
    /// A human readable name for the architecture.
    pub arch_label: &'static str,
    /// The operating system family, derived from the kernel major version.
    #[serde(rename = "osVersion")]
    pub os: Os,
    /// The leading integer of the kernel release.
    pub major_version: u32,
    /// The raw kernel release string.
    #[serde(rename = "fullVersion")]
    pub kernel_release: String,
}

impl System {
    /// Describes the running host.
    pub fn detect() -> Self {
        let architecture = if cfg!(target_arch = "aarch64") {
            Architecture::Arm64
        } else {
            Architecture::X64
        };

        let release = sysinfo::System::kernel_version().unwrap_or_default();

        Self::from_release(architecture, release)
    }

    /// Describes a host with the given architecture and kernel release.
    pub fn from_release(architecture: Architecture, release: impl Into<String>) -> Self {
        let kernel_release = release.into();
        let major_version = major_version(&kernel_release);

        Self {
            architecture,
            arch_label: architecture.label(),
            os: Os::from_major(major_version),
            major_version,
            kernel_release,
        }
    }
}

/// A supported CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Architecture {
    /// Apple Silicon.
    #[serde(rename = "arm64")]
    Arm64,
    /// Intel.
    #[serde(rename = "x64")]
    X64,
}

impl Architecture {
    /// Returns the human readable name of the [`Architecture`].
    pub fn label(self) -> &'static str {
        match self {
            Architecture::Arm64 => "Apple Silicon",
            Architecture::X64 => "Intel",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Architecture::Arm64 => "arm64",
            Architecture::X64 => "x64",
        })
    }
}

/// An operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Tahoe.
    Tahoe,
    /// Sequoia.
    Sequoia,
    /// Sonoma.
    Sonoma,
    /// Ventura.
    Ventura,
    /// Monterey.
    Monterey,
    /// A kernel major version missing from the lookup table.
    UnknownMajor(u32),
}

impl Os {
    /// Looks up the family of a kernel major version.
    pub fn from_major(major: u32) -> Self {
        match major {
            24 => Os::Sequoia,
            23 => Os::Sonoma,
            22 => Os::Ventura,
            21 => Os::Monterey,
            20 => Os::Tahoe,
            major => Os::UnknownMajor(major),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Tahoe => f.write_str("Tahoe"),
            Os::Sequoia => f.write_str("Sequoia"),
            Os::Sonoma => f.write_str("Sonoma"),
            Os::Ventura => f.write_str("Ventura"),
            Os::Monterey => f.write_str("Monterey"),
            Os::UnknownMajor(major) => write!(f, "macOS {major}"),
        }
    }
}

impl Serialize for Os {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn major_version(release: &str) -> u32 {
    let digits = release
        .trim_start()
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();

    digits.parse().unwrap_or_default()
}
