use crate::Error;

use sipper::{Straw, sipper};
use tokio::io::AsyncWrite;

use std::sync::{Arc, LazyLock};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn client() -> reqwest::Client {
    static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
        reqwest::Client::builder()
            .user_agent(format!(
                "{} {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("should be a valid client")
    });

    CLIENT.clone()
}

pub async fn request(url: impl reqwest::IntoUrl) -> Result<reqwest::Response, Error> {
    Ok(client().get(url).send().await?.error_for_status()?)
}

/// Streams the body of `response` into `writer`.
///
/// Progress is only reported when the server announces the length of the
/// body.
pub fn download<'a, W: AsyncWrite + Unpin>(
    mut response: reqwest::Response,
    writer: &'a mut W,
) -> impl Straw<(), Progress, Error> + 'a {
    use tokio::io::AsyncWriteExt;

    sipper(move |mut progress| async move {
        let total = response.content_length().filter(|total| *total > 0);

        let mut downloaded = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|error| Error::TransferInterrupted(Arc::new(error)))?
        {
            writer.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(total) = total {
                progress.send(Progress { downloaded, total }).await;
            }
        }

        writer.flush().await?;

        Ok(())
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub downloaded: u64,
    pub total: u64,
}

impl Progress {
    /// Rounded down.
    pub fn percent(self) -> u8 {
        (self.downloaded.saturating_mul(100) / self.total.max(1)).min(100) as u8
    }
}
