use crate::http;
use crate::{Artifact, Error, Opener};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use sipper::Sipper;
use tokio::fs;
use tokio::io;
use tokio::sync::watch;
use tokio::task;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// In-flight transfers, keyed by destination.
#[derive(Clone, Default)]
pub struct Flights {
    flights: Arc<Mutex<HashMap<PathBuf, Flight>>>,
}

impl fmt::Debug for Flights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flights").finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Flight {
    pub progress: watch::Receiver<Option<u8>>,
    pub outcome: Shared<BoxFuture<'static, Result<PathBuf, Error>>>,
}

impl Flights {
    // Started transfers run to completion even if every caller goes away.
    pub fn board(&self, artifact: Artifact, opener: Arc<dyn Opener>) -> Flight {
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(flight) = flights.get(&artifact.destination) {
            tracing::info!(
                destination = %artifact.destination.display(),
                "joining download in flight"
            );

            return flight.clone();
        }

        let destination = artifact.destination.clone();
        let (sender, receiver) = watch::channel(None);

        let handle = task::spawn(transfer(artifact, sender, self.clone(), opener));

        let flight = Flight {
            progress: receiver,
            outcome: async move {
                handle
                    .await
                    .unwrap_or_else(|error| Err(Error::from(error)))
            }
            .boxed()
            .shared(),
        };

        let _ = flights.insert(destination, flight.clone());

        flight
    }

    #[cfg(test)]
    pub fn contains(&self, destination: &Path) -> bool {
        self.flights
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(destination)
    }

    fn land(&self, destination: &Path) {
        let _ = self
            .flights
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(destination);
    }
}

async fn transfer(
    artifact: Artifact,
    progress: watch::Sender<Option<u8>>,
    flights: Flights,
    opener: Arc<dyn Opener>,
) -> Result<PathBuf, Error> {
    tracing::info!(
        url = %artifact.url,
        destination = %artifact.destination.display(),
        "downloading installer"
    );

    let result = fetch(&artifact, &progress).await;

    match &result {
        Ok(path) => {
            tracing::info!(path = %path.display(), "download complete");
            opener.open(path);
        }
        Err(error) => {
            tracing::warn!(url = %artifact.url, %error, "download failed");
        }
    }

    flights.land(&artifact.destination);

    result
}

async fn fetch(
    artifact: &Artifact,
    progress: &watch::Sender<Option<u8>>,
) -> Result<PathBuf, Error> {
    let response = http::request(&artifact.url).await?;

    if let Some(directory) = artifact.destination.parent() {
        fs::create_dir_all(directory).await?;
    }

    let file = fs::File::create(&artifact.destination).await?;
    let mut writer = io::BufWriter::new(file);

    let mut download = http::download(response, &mut writer).pin();

    while let Some(update) = download.sip().await {
        let percent = update.percent();
        tracing::debug!(percent, "download progress");

        progress.send_modify(|latest| *latest = Some(percent));
    }

    download.await?;

    writer.into_inner().sync_all().await?;

    Ok(artifact.destination.clone())
}
