use crate::System;

use serde::{Deserialize, Serialize};

use std::fmt;

/// A download request coming from the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Request {
    /// The architecture to download for.
    pub architecture: Choice,
    /// The operating system to download for.
    #[serde(rename = "osVersion")]
    pub os: Choice,
}

impl Request {
    /// Both axes set to [`Choice::Auto`].
    pub fn auto() -> Self {
        Self::default()
    }

    /// A request with explicit choices for both axes.
    pub fn explicit(architecture: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            architecture: Choice::Explicit(architecture.into()),
            os: Choice::Explicit(os.into()),
        }
    }

    /// Returns true if any axis must be filled in from the host.
    pub fn needs_system(&self) -> bool {
        self.architecture == Choice::Auto || self.os == Choice::Auto
    }

    /// Settles both axes, calling `detect` at most once and only when an
    /// axis is [`Choice::Auto`].
    pub fn target(&self, detect: impl FnOnce() -> System) -> Target {
        let system = self.needs_system().then(detect);

        let settle = |choice: &Choice, detected: Option<String>| match choice {
            Choice::Explicit(value) => value.clone(),
            Choice::Auto => detected.unwrap_or_default(),
        };

        Target {
            architecture: settle(
                &self.architecture,
                system.as_ref().map(|system| system.architecture.to_string()),
            ),
            os: settle(&self.os, system.as_ref().map(|system| system.os.to_string())),
        }
    }
}

/// A choice for one axis of a [`Request`].
///
/// Explicit values are passed through verbatim, known or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Choice {
    /// Use whatever the host reports.
    #[default]
    Auto,
    /// Use this value.
    Explicit(String),
}

impl From<String> for Choice {
    fn from(value: String) -> Self {
        if value == "auto" {
            Choice::Auto
        } else {
            Choice::Explicit(value)
        }
    }
}

impl From<&str> for Choice {
    fn from(value: &str) -> Self {
        Choice::from(value.to_owned())
    }
}

impl From<Choice> for String {
    fn from(choice: Choice) -> Self {
        choice.to_string()
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Auto => f.write_str("auto"),
            Choice::Explicit(value) => f.write_str(value),
        }
    }
}

/// The settled architecture and operating system of a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    /// The final architecture.
    pub architecture: String,
    /// The final operating system.
    pub os: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::Architecture;

    fn sequoia() -> System {
        System::from_release(Architecture::Arm64, "24.1.0")
    }

    #[test]
    fn auto_takes_the_host() {
        let target = Request::auto().target(sequoia);

        assert_eq!(target.architecture, "arm64");
        assert_eq!(target.os, "Sequoia");
    }

    #[test]
    fn explicit_skips_detection() {
        let target = Request::explicit("x64", "Ventura")
            .target(|| panic!("host should not be inspected"));

        assert_eq!(target.architecture, "x64");
        assert_eq!(target.os, "Ventura");
    }

    #[test]
    fn axes_are_independent() {
        let request = Request {
            architecture: Choice::Auto,
            os: "Sonoma".into(),
        };

        let target = request.target(|| System::from_release(Architecture::X64, "24.0.0"));

        assert_eq!(target.architecture, "x64");
        assert_eq!(target.os, "Sonoma");
    }

    #[test]
    fn it_deserializes_from_the_ui() -> Result<(), serde_json::Error> {
        let request: Request = serde_json::from_value(serde_json::json!({
            "architecture": "auto",
            "osVersion": "Windows 95",
        }))?;

        assert_eq!(request.architecture, Choice::Auto);
        assert_eq!(request.os, Choice::Explicit("Windows 95".to_owned()));
        assert_eq!(
            serde_json::to_value(&request)?,
            serde_json::json!({
                "architecture": "auto",
                "osVersion": "Windows 95",
            })
        );

        Ok(())
    }
}
