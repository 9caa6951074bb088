use std::sync::Arc;

use reqwest::{header, multipart, RequestBuilder, Response};
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::{SessionStorage, JWT_ACCESS_TOKEN};

/// Transport bound to `<server>/api/`. Every domain call goes through here.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    root: Url,
    storage: Arc<dyn SessionStorage>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, storage: Arc<dyn SessionStorage>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            root: config.api_root()?,
            storage,
        })
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Resolve a request target like `file/list?file=/a&page=0`.
    pub fn url(&self, target: &str) -> Result<Url, ApiError> {
        Ok(self.root.join(target.trim_start_matches('/'))?)
    }

    // 요청 인터셉터: 저장된 access token 부착
    fn attach_credentials(&self, req: RequestBuilder) -> RequestBuilder {
        match self.storage.get(JWT_ACCESS_TOKEN) {
            Some(token) if !token.is_empty() => req.bearer_auth(token),
            _ => req,
        }
    }

    pub async fn get(&self, target: &str) -> Result<Response, ApiError> {
        let url = self.url(target)?;
        log::debug!("GET {}", url);
        let req = self.attach_credentials(self.client.get(url));
        self.send(req).await
    }

    /// GET with an explicit bearer instead of the stored access token.
    pub async fn get_with_bearer(&self, target: &str, token: &str) -> Result<Response, ApiError> {
        let url = self.url(target)?;
        log::debug!("GET {} (explicit bearer)", url);
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    pub async fn get_json(&self, target: &str) -> Result<serde_json::Value, ApiError> {
        let resp = self.get(target).await?;
        read_json(resp).await
    }

    pub async fn post_json<B>(&self, target: &str, body: &B) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(target)?;
        log::debug!("POST {}", url);
        let req = self.attach_credentials(self.client.post(url).json(body));
        self.send(req).await
    }

    pub async fn post_multipart(
        &self,
        target: &str,
        form: multipart::Form,
    ) -> Result<Response, ApiError> {
        let url = self.url(target)?;
        log::debug!("POST {} (multipart)", url);
        let req = self.attach_credentials(self.client.post(url).multipart(form));
        self.send(req).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await?;
        check_status(resp).await
    }
}

/// Non-2xx responses become `ApiError::Status` carrying the body text.
pub async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    log::debug!("← {} {}", status, body);
    Err(ApiError::Status { status, body })
}

/// Empty bodies read as `null`; plain-text bodies as a JSON string.
pub async fn read_json(resp: Response) -> Result<serde_json::Value, ApiError> {
    let is_json = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("json"));
    let text = resp.text().await?;
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }
}

/// Percent-encode a query value, leaving `/` readable.
pub fn query_value(value: &str) -> String {
    urlencoding::encode(value).replace("%2F", "/")
}
