use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::fs;
use tracing::{debug, error, info};
use url::Url;

use crate::{Error, Result, CACHE_DIR};

/// HTTP client with a transparent on-disk page cache keyed by URL.
///
/// Repeated runs are served from the cache directory so the sites are only
/// hit once per page. Nothing downstream may depend on whether a page came
/// from the cache or the network.
pub struct CachedClient {
    client: Client,
    cache_dir: PathBuf,
}

impl CachedClient {
    pub fn new() -> Self {
        Self::with_cache_dir(CACHE_DIR)
    }

    pub fn with_cache_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            cache_dir: dir.into(),
        }
    }

    /// Remove every cached page. A cache that was never created is fine.
    pub async fn clear_cache(&self) -> Result<()> {
        match fs::remove_dir_all(&self.cache_dir).await {
            Ok(()) => {
                info!("page cache cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a page as text, consulting the cache first.
    ///
    /// The body is decoded as UTF-8 regardless of what the response headers
    /// claim. Fetch failures (transport errors and non-2xx responses) are
    /// logged here with the URL, then handed back for the caller to decide
    /// whether the run can continue without the page.
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        let cache_path = self.cache_path(url);
        if let Ok(cached) = fs::read_to_string(&cache_path).await {
            debug!("cache hit for {url}");
            return Ok(cached);
        }
        let text = match self.fetch_text(url).await {
            Ok(text) => text,
            Err(e) => {
                error!("error while loading page {url}: {e}");
                return Err(e);
            }
        };
        self.store(&cache_path, &text).await;
        Ok(text)
    }

    /// Uncached GET for binary payloads.
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| Error::Fetch {
                url: url.to_string(),
                source,
            })?;
        let bytes = response.bytes().await.map_err(|source| Error::Fetch {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    async fn fetch_text(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| Error::Fetch {
                url: url.to_string(),
                source,
            })?;
        let bytes = response.bytes().await.map_err(|source| Error::Fetch {
            url: url.to_string(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Best effort: a page that cannot be cached is still a page.
    async fn store(&self, path: &Path, text: &str) {
        if let Err(e) = fs::create_dir_all(&self.cache_dir).await {
            debug!("cannot create cache directory: {e}");
            return;
        }
        if let Err(e) = fs::write(path, text).await {
            debug!("cannot cache {}: {e}", path.display());
        }
    }

    fn cache_path(&self, url: &Url) -> PathBuf {
        self.cache_dir
            .join(urlencoding::encode(url.as_str()).as_ref())
    }
}

impl Default for CachedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use url::Url;

    use super::*;

    #[tokio::test]
    async fn cached_page_is_served_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let client = CachedClient::with_cache_dir(dir.path());
        let url = Url::parse("https://peps.python.org/pep-0001/").unwrap();

        fs::write(client.cache_path(&url), "<html>cached</html>")
            .await
            .unwrap();

        let body = client.get_text(&url).await.unwrap();
        assert_eq!(body, "<html>cached</html>");
    }

    #[tokio::test]
    async fn clearing_a_missing_cache_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let client = CachedClient::with_cache_dir(dir.path().join("nope"));
        client.clear_cache().await.unwrap();
    }

    #[tokio::test]
    async fn clearing_drops_cached_pages() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("pages");
        let client = CachedClient::with_cache_dir(&cache);
        let url = Url::parse("https://peps.python.org/pep-0001/").unwrap();

        fs::create_dir_all(&cache).await.unwrap();
        fs::write(client.cache_path(&url), "stale").await.unwrap();
        client.clear_cache().await.unwrap();

        assert!(!cache.exists());
    }

    #[test]
    fn cache_file_names_are_url_encoded() {
        let client = CachedClient::with_cache_dir("http_cache");
        let url = Url::parse("https://docs.python.org/3/whatsnew/").unwrap();
        let name = client.cache_path(&url);
        let name = name.file_name().unwrap().to_string_lossy().into_owned();
        assert!(!name.contains('/'));
        assert!(name.contains("docs.python.org"));
    }
}
