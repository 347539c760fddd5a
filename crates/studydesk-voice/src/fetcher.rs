use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use studydesk_types::Accent;

use crate::PronounceError;

/// Source of pronunciation audio
#[async_trait]
pub trait VoiceFetcher: Send + Sync {
    /// Download audio for an already normalized word
    async fn fetch(&self, word: &str, accent: Accent) -> Result<Vec<u8>, PronounceError>;
}

/// Youdao `dictvoice` endpoint
#[derive(Clone)]
pub struct YoudaoFetcher {
    client: reqwest::Client,
    host: String,
}

impl YoudaoFetcher {
    pub fn new(host: impl Into<String>, timeout: Duration) -> Result<Self, PronounceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
        })
    }

    /// `<host>/dictvoice?audio=<word>&type=<1|2>`
    pub fn endpoint(&self, word: &str, accent: Accent) -> Result<Url, PronounceError> {
        let type_id = accent.type_id().to_string();
        Url::parse_with_params(
            &format!("{}/dictvoice", self.host),
            &[("audio", word), ("type", type_id.as_str())],
        )
        .map_err(|e| PronounceError::InvalidEndpoint(format!("{}: {e}", self.host)))
    }
}

#[async_trait]
impl VoiceFetcher for YoudaoFetcher {
    async fn fetch(&self, word: &str, accent: Accent) -> Result<Vec<u8>, PronounceError> {
        let url = self.endpoint(word, accent)?;
        tracing::debug!("Fetching pronunciation: {url}");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(PronounceError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(PronounceError::EmptyBody);
        }

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::PronunciationCache;

    const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
    const EMPTY_OK: &str =
        "HTTP/1.1 200 OK\r\nContent-Type: audio/mpeg\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

    /// Answers one request with `response`, or holds the socket open when `None`
    async fn serve_once(response: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            match response {
                Some(response) => {
                    socket.write_all(response.as_bytes()).await.unwrap();
                    socket.shutdown().await.ok();
                }
                None => tokio::time::sleep(Duration::from_secs(5)).await,
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_endpoint_encodes_word() {
        let fetcher = YoudaoFetcher::new("https://dict.youdao.com/", Duration::from_secs(5)).unwrap();

        let url = fetcher.endpoint("hello world", Accent::Us).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dict.youdao.com/dictvoice?audio=hello+world&type=2"
        );

        let url = fetcher.endpoint("苹果", Accent::Uk).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("audio".to_string(), "苹果".to_string()),
                ("type".to_string(), "1".to_string())
            ]
        );
    }

    #[test]
    fn test_invalid_host() {
        let fetcher = YoudaoFetcher::new("not a host", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            fetcher.endpoint("x", Accent::Uk),
            Err(PronounceError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_status() {
        let host = serve_once(Some(NOT_FOUND)).await;
        let fetcher = YoudaoFetcher::new(host, Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch("hello", Accent::Us).await.unwrap_err();
        assert!(matches!(err, PronounceError::Status(404)), "{err:?}");
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let host = serve_once(None).await;
        let fetcher = YoudaoFetcher::new(host, Duration::from_millis(100)).unwrap();

        let err = fetcher.fetch("hello", Accent::Uk).await.unwrap_err();
        match err {
            PronounceError::NetworkError(e) => assert!(e.is_timeout(), "{e}"),
            other => panic!("expected a network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_audio_is_rejected() {
        let host = serve_once(Some(EMPTY_OK)).await;
        let fetcher = YoudaoFetcher::new(host, Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch("hello", Accent::Us).await.unwrap_err();
        assert!(matches!(err, PronounceError::EmptyBody), "{err:?}");
    }

    #[tokio::test]
    async fn test_failed_download_leaves_cache_untouched() {
        let dir = std::env::temp_dir().join(format!(
            "studydesk-voice-{}-youdao-failure",
            std::process::id()
        ));
        std::fs::remove_dir_all(&dir).ok();

        let host = serve_once(Some(NOT_FOUND)).await;
        let fetcher = YoudaoFetcher::new(host, Duration::from_secs(5)).unwrap();
        let cache = PronunciationCache::new(dir.clone(), fetcher).unwrap();
        let before = std::fs::read_dir(&dir).unwrap().count();

        let err = cache.get_audio("hello", Accent::Us).await.unwrap_err();
        assert!(matches!(err, PronounceError::Status(404)), "{err:?}");
        assert!(cache.cached("hello", Accent::Us).is_none());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), before);
        assert_eq!(before, 0);

        std::fs::remove_dir_all(&dir).ok();
    }
}
