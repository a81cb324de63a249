//! Publishing uploaded garment images for reverse image search.
//!
//! External reverse-search engines need a publicly fetchable URL, so the
//! uploaded bytes are written under a random name into a directory the
//! server also exposes over HTTP.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// URL path prefix under which the published directory is served.
pub const PUBLIC_PREFIX: &str = "public/reverse";

const GOOGLE_LENS_TEMPLATE: &str = "https://lens.google.com/uploadbyurl?url=";

/// Scheme and host observed on the inbound request. The public URL is built
/// from these, so behind a proxy the advertised host is whatever the proxy
/// forwards.
#[derive(Debug, Clone)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

#[derive(Debug, Clone)]
pub struct PublishedImage {
    pub image_url: String,
    pub search_url: String,
}

pub struct ReverseSearchPublisher {
    public_dir: PathBuf,
}

impl ReverseSearchPublisher {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Creates the published directory. Called once at startup.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.public_dir)
            .await
            .map_err(|e| {
                Error::storage(format!(
                    "cannot create {}: {e}",
                    self.public_dir.display()
                ))
            })
    }

    /// Writes the image under a fresh `<uuid>.jpg` name and returns the
    /// public fetch URL plus the prebuilt reverse-search URL.
    ///
    /// The bytes are written as-is; no mime sniffing is done, the `.jpg`
    /// extension is fixed.
    pub async fn publish(&self, image: &[u8], origin: &RequestOrigin) -> Result<PublishedImage> {
        let file_name = format!("{}.jpg", Uuid::new_v4());
        let path = self.public_dir.join(&file_name);

        tokio::fs::write(&path, image)
            .await
            .map_err(|e| Error::storage(format!("cannot write {}: {e}", path.display())))?;

        debug!("Published {} ({} bytes)", path.display(), image.len());

        let image_url = format!(
            "{}://{}/{}/{}",
            origin.scheme, origin.host, PUBLIC_PREFIX, file_name
        );
        let search_url = format!("{GOOGLE_LENS_TEMPLATE}{}", urlencoding::encode(&image_url));

        Ok(PublishedImage {
            image_url,
            search_url,
        })
    }

    /// Deletes published files older than `max_age`. Returns how many were
    /// removed. Unreadable entries are skipped.
    pub async fn sweep(&self, max_age: Duration) -> Result<usize> {
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.public_dir)
            .await
            .map_err(|e| Error::storage(format!("cannot read {}: {e}", self.public_dir.display())))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::storage(format!("sweep failed: {e}")))?
        {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            let Ok(modified) = metadata.modified() else {
                continue;
            };
            let expired = SystemTime::now()
                .duration_since(modified)
                .map(|age| age > max_age)
                .unwrap_or(false);
            if expired && tokio::fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Retention sweep removed {} published image(s)", removed);
        }

        Ok(removed)
    }
}

/// Spawns the hourly retention sweep when a TTL is configured.
pub fn spawn_retention_sweep(
    publisher: std::sync::Arc<ReverseSearchPublisher>,
    retention_hours: u64,
) {
    let max_age = Duration::from_secs(retention_hours * 3600);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(3600));
        loop {
            ticker.tick().await;
            if let Err(e) = publisher.sweep(max_age).await {
                warn!("Retention sweep failed: {}", e);
            }
        }
    });
}
