//! Detect the host, download the installer that matches it, and hand the
//! result to the operating system.
pub mod opener;
pub mod system;

mod artifact;
mod error;
mod flight;
mod http;
mod request;

pub use artifact::{Artifact, Release};
pub use error::Error;
pub use opener::Opener;
pub use request::{Choice, Request, Target};
pub use system::System;

use flight::{Flight, Flights};

use serde::ser::{Serialize, SerializeStruct, Serializer};
use sipper::{Straw, sipper};

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a [`Gateway`] needs from the application around it.
#[derive(Clone)]
pub struct Context {
    /// The release to download installers from.
    pub release: Release,
    /// The directory installers are written to.
    pub directory: PathBuf,
    /// What to do with a finished installer.
    pub opener: Arc<dyn Opener>,
    /// How to describe the host.
    pub system: fn() -> System,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            release: Release::default(),
            directory: download_directory(),
            opener: Arc::new(opener::Desktop),
            system: System::detect,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("release", &self.release)
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

/// The entry point for download requests.
///
/// Requests that resolve to the same destination while a transfer is in
/// flight share that transfer.
#[derive(Debug, Clone, Default)]
pub struct Gateway {
    context: Context,
    flights: Flights,
}

impl Gateway {
    /// Creates a new [`Gateway`] with the given [`Context`].
    pub fn new(context: Context) -> Self {
        Self {
            context,
            flights: Flights::default(),
        }
    }

    /// Describes the host, for the UI to pre-fill its defaults.
    pub fn describe_system(&self) -> System {
        (self.context.system)()
    }

    /// Resolves the [`Artifact`] a [`Request`] would download.
    ///
    /// The host is only inspected if some choice is [`Choice::Auto`].
    pub fn resolve(&self, request: &Request) -> Artifact {
        let target = request.target(self.context.system);

        Artifact::new(&self.context.release, &self.context.directory, &target)
    }

    /// Downloads the installer of a [`Request`], reporting the completed
    /// percentage as it goes, and opens it once finished.
    ///
    /// Percentages are only reported if the server announces the size of
    /// the installer. A failed request leaves any existing file untouched;
    /// a transfer that fails midway may leave a partial file behind.
    pub fn download(&self, request: Request) -> impl Straw<Installer, u8, Error> {
        sipper(async move |mut sender| {
            let artifact = self.resolve(&request);

            tracing::debug!(
                architecture = %request.architecture,
                os = %request.os,
                file_name = %artifact.file_name,
                "resolved installer"
            );

            let Flight {
                mut progress,
                mut outcome,
            } = self.flights.board(artifact, self.context.opener.clone());

            let mut reported = None;
            let mut listening = true;

            let path = loop {
                tokio::select! {
                    biased;

                    result = &mut outcome => break result?,
                    changed = progress.changed(), if listening => {
                        if changed.is_err() {
                            listening = false;
                            continue;
                        }

                        let latest = *progress.borrow_and_update();

                        if let Some(percent) = latest.filter(|_| latest > reported) {
                            sender.send(percent).await;
                            reported = latest;
                        }
                    }
                }
            };

            let latest = *progress.borrow();

            if let Some(percent) = latest.filter(|_| latest > reported) {
                sender.send(percent).await;
            }

            Ok(Installer { path })
        })
    }
}

/// A downloaded installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installer {
    /// Where the installer was written to.
    pub path: PathBuf,
}

impl Serialize for Installer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Installer", 2)?;
        state.serialize_field("success", &true)?;
        state.serialize_field("path", &self.path)?;
        state.end()
    }
}

fn download_directory() -> PathBuf {
    env::var("INSTALLER_FETCH_DOWNLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let Some(user) = directories::UserDirs::new() else {
                return PathBuf::from(".");
            };

            user.download_dir()
                .map(PathBuf::from)
                .unwrap_or_else(|| user.home_dir().join("Downloads"))
        })
}
