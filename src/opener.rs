//! Hand finished downloads to the operating system.
use std::path::Path;

/// Something that opens a finished download.
///
/// Opening is fire-and-forget: implementors must not block on the launched
/// action and have no way to report failure.
pub trait Opener: Send + Sync {
    /// Opens the file at `path`.
    fn open(&self, path: &Path);
}

/// Opens files with the default application of the desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Desktop;

impl Opener for Desktop {
    fn open(&self, path: &Path) {
        match open::that_detached(path) {
            Ok(()) => tracing::info!(path = %path.display(), "opened installer"),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to open installer");
            }
        }
    }
}
