use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use log::{debug, info};
use reqwest::multipart::Form;
use reqwest::{Client, ClientBuilder, Proxy, StatusCode};
use url::Url;

use super::{ErrorBody, VideoInfo};
use crate::errors::{AppError, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

/// Progress callback: bytes received so far, total size if the server sent one.
pub type ProgressFn<'a> = &'a mut (dyn FnMut(u64, Option<u64>) + Send);

/// Gateway to the remote downloader service.
#[async_trait]
pub trait VideoApi: Send + Sync {
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo>;
    async fn download(
        &self,
        url: &str,
        format_id: &str,
        on_progress: ProgressFn<'_>,
    ) -> Result<Vec<u8>>;
}

pub struct HttpVideoApi {
    client: Client,
    base_url: Url,
}

impl HttpVideoApi {
    pub fn new(base_url: &str, proxy: Option<&str>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Validation(format!("Dirección del servidor inválida: {e}")))?;

        // No overall request timeout: a download waits for the server
        // to finish, however long that takes.
        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(15))
            .gzip(true)
            .brotli(true)
            .tcp_keepalive(Duration::from_secs(60));

        if let Some(proxy_url) = proxy {
            builder = builder.proxy(Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Validation(format!("Dirección del servidor inválida: {e}")))
    }
}

#[async_trait]
impl VideoApi for HttpVideoApi {
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo> {
        debug!("POST /info for {}", url);
        let form = Form::new().text("url", url.to_string());
        let response = self
            .client
            .post(self.endpoint("info")?)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }

        let info: VideoInfo = response.json().await?;
        info!("Found {} formats for \"{}\"", info.formats.len(), info.title);
        Ok(info)
    }

    async fn download(
        &self,
        url: &str,
        format_id: &str,
        on_progress: ProgressFn<'_>,
    ) -> Result<Vec<u8>> {
        debug!("POST /download for {} (format {})", url, format_id);
        let form = Form::new()
            .text("url", url.to_string())
            .text("format_id", format_id.to_string());
        let response = self
            .client
            .post(self.endpoint("download")?)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }

        let total = response.content_length();
        let mut stream = response.bytes_stream();
        let mut data = Vec::new();
        let mut downloaded = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            downloaded += chunk.len() as u64;
            data.extend_from_slice(&chunk);
            on_progress(downloaded, total);
        }

        info!("Received {} bytes", data.len());
        Ok(data)
    }
}

/// Maps a non-2xx response to a server error, using the structured
/// `detail` field when the body parses and the bare status otherwise.
fn error_from_response(status: StatusCode, body: &[u8]) -> AppError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail);
    AppError::Server {
        status: status.as_u16(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_detail_is_surfaced() {
        let err = error_from_response(StatusCode::BAD_REQUEST, br#"{"detail":"invalid url"}"#);
        assert_eq!(err.to_string(), "invalid url");
    }

    #[test]
    fn missing_detail_falls_back_to_status() {
        let err = error_from_response(StatusCode::NOT_FOUND, br#"{}"#);
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        let err = error_from_response(StatusCode::INTERNAL_SERVER_ERROR, b"<html>boom</html>");
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn endpoints_join_onto_the_base_url() {
        let api = HttpVideoApi::new("http://127.0.0.1:8000", None).unwrap();
        assert_eq!(api.endpoint("info").unwrap().as_str(), "http://127.0.0.1:8000/info");
        assert_eq!(
            api.endpoint("download").unwrap().as_str(),
            "http://127.0.0.1:8000/download"
        );
    }
}
