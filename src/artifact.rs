use crate::{Request, System, Target};

use std::path::{Path, PathBuf};

/// The release that installers are downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// The scheme and host serving the repository.
    pub base: String,
    /// The owner of the repository.
    pub owner: String,
    /// The name of the repository.
    pub repository: String,
    /// The release tag.
    pub tag: String,
    /// The product prefix of every artifact name.
    pub product: String,
}

impl Release {
    /// Returns the file name of the installer for the given [`Target`].
    pub fn file_name(&self, target: &Target) -> String {
        format!(
            "{product}-{architecture}-{os}.dmg",
            product = self.product,
            architecture = target.architecture,
            os = target.os,
        )
    }

    /// Returns the download URL of the given file in this [`Release`].
    pub fn url(&self, file_name: &str) -> String {
        format!(
            "{base}/{owner}/{repository}/releases/download/{tag}/{file_name}",
            base = self.base.trim_end_matches('/'),
            owner = self.owner,
            repository = self.repository,
            tag = self.tag,
        )
    }
}

impl Default for Release {
    fn default() -> Self {
        Self {
            base: "https://github.com".to_owned(),
            owner: "aparikh1".to_owned(),
            repository: "mac-google-messages".to_owned(),
            tag: "latest".to_owned(),
            product: "google-messages".to_owned(),
        }
    }
}

/// A concrete installer to download.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    /// The absolute URL of the installer.
    pub url: String,
    /// The file name of the installer.
    pub file_name: String,
    /// Where the installer is written to.
    pub destination: PathBuf,
}

impl Artifact {
    /// Resolves the [`Artifact`] of a [`Request`] on the given [`System`].
    pub fn resolve(
        release: &Release,
        directory: impl AsRef<Path>,
        request: &Request,
        system: &System,
    ) -> Self {
        Self::new(release, directory, &request.target(|| system.clone()))
    }

    /// Builds the [`Artifact`] of an already settled [`Target`].
    pub fn new(release: &Release, directory: impl AsRef<Path>, target: &Target) -> Self {
        let file_name = release.file_name(target);

        Self {
            url: release.url(&file_name),
            destination: directory.as_ref().join(&file_name),
            file_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::Architecture;

    const DOWNLOADS: &str = "/Users/someone/Downloads";

    fn sequoia() -> System {
        System::from_release(Architecture::Arm64, "24.1.0")
    }

    #[test]
    fn auto_resolves_to_the_host() {
        let artifact = Artifact::resolve(
            &Release::default(),
            DOWNLOADS,
            &Request::auto(),
            &sequoia(),
        );

        assert_eq!(
            artifact.url,
            "https://github.com/aparikh1/mac-google-messages/releases/download/latest/google-messages-arm64-Sequoia.dmg"
        );
        assert_eq!(artifact.file_name, "google-messages-arm64-Sequoia.dmg");
        assert_eq!(
            artifact.destination,
            Path::new(DOWNLOADS).join("google-messages-arm64-Sequoia.dmg")
        );
    }

    #[test]
    fn explicit_choices_ignore_the_host() {
        let artifact = Artifact::resolve(
            &Release::default(),
            DOWNLOADS,
            &Request::explicit("x64", "Ventura"),
            &sequoia(),
        );

        assert_eq!(artifact.file_name, "google-messages-x64-Ventura.dmg");
        assert!(artifact.url.ends_with("/latest/google-messages-x64-Ventura.dmg"));
    }

    #[test]
    fn unknown_values_pass_through() {
        let artifact = Artifact::resolve(
            &Release::default(),
            DOWNLOADS,
            &Request::explicit("riscv64", "macOS 30"),
            &sequoia(),
        );

        assert_eq!(artifact.file_name, "google-messages-riscv64-macOS 30.dmg");
        assert_eq!(
            artifact.url,
            "https://github.com/aparikh1/mac-google-messages/releases/download/latest/google-messages-riscv64-macOS 30.dmg"
        );
    }

    #[test]
    fn unknown_hosts_use_their_version_label() {
        let host = System::from_release(Architecture::X64, "19.6.0");
        let artifact = Artifact::resolve(&Release::default(), DOWNLOADS, &Request::auto(), &host);

        assert_eq!(artifact.file_name, "google-messages-x64-macOS 19.dmg");
    }

    #[test]
    fn it_is_deterministic() {
        let requests = [
            Request::auto(),
            Request::explicit("arm64", "Tahoe"),
            Request {
                architecture: "x64".into(),
                os: crate::Choice::Auto,
            },
        ];

        for request in requests {
            let first = Artifact::resolve(&Release::default(), DOWNLOADS, &request, &sequoia());
            let second = Artifact::resolve(&Release::default(), DOWNLOADS, &request, &sequoia());

            assert_eq!(first, second);
        }
    }

    #[test]
    fn custom_releases() {
        let release = Release {
            base: "http://127.0.0.1:8080/".to_owned(),
            owner: "acme".to_owned(),
            repository: "shell".to_owned(),
            tag: "latest".to_owned(),
            product: "app".to_owned(),
        };

        let artifact = Artifact::resolve(&release, "/tmp", &Request::auto(), &sequoia());

        assert_eq!(
            artifact.url,
            "http://127.0.0.1:8080/acme/shell/releases/download/latest/app-arm64-Sequoia.dmg"
        );
    }
}
