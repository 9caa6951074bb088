use std::path::Path;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::{Context, Policy};
use crate::error::ApiError;
use crate::http::{query_value, read_json};
use crate::store::{Action, Store};
use crate::types::{FileInfo, KeywordData, Listing, PageData};

const UPLOAD_CHUNK: usize = 64 * 1024;

/// `file/list?{file|folder}={path}&type={type}&page={page}`
pub fn list_target(page: &PageData) -> String {
    format!(
        "file/list?{}={}&type={}&page={}",
        page.identifier,
        query_value(&page.path),
        query_value(&page.kind),
        page.page
    )
}

pub struct Files<'a> {
    ctx: &'a Context,
}

impl<'a> Files<'a> {
    pub(crate) fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    // GET <base>/file/download/{fileId}
    pub async fn download(&self, file_id: u64) -> Result<Vec<u8>, ApiError> {
        let ctx = self.ctx;
        match self.request_download(file_id).await {
            Ok(bytes) => {
                ctx.store.dispatch(Action::DownloadSuccess {
                    file_id,
                    size: bytes.len(),
                });
                Ok(bytes)
            }
            Err(err) => {
                ctx.report(&err, Policy::Transfer);
                Err(err)
            }
        }
    }

    pub fn download_url(&self, file_id: u64) -> Result<url::Url, ApiError> {
        self.ctx.http.url(&format!("file/download/{}", file_id))
    }

    async fn request_download(&self, file_id: u64) -> Result<Vec<u8>, ApiError> {
        let resp = self
            .ctx
            .http
            .get(&format!("file/download/{}", file_id))
            .await?;
        Ok(resp.bytes().await?.to_vec())
    }

    // POST <base>/file/upload (multipart)
    /// Streams the file and dispatches `FileProgress` as chunks go out.
    pub async fn upload(&self, path: &Path) -> Result<Value, ApiError> {
        let ctx = self.ctx;
        match self.request_upload(path).await {
            Ok(body) => {
                ctx.store.dispatch(Action::FileSuccess(body.clone()));
                Ok(body)
            }
            Err(err) => {
                ctx.report(&err, Policy::Transfer);
                Err(err)
            }
        }
    }

    async fn request_upload(&self, path: &Path) -> Result<Value, ApiError> {
        let file = File::open(path).await?;
        let total = file.metadata().await?.len();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        self.ctx.store.dispatch(Action::FileProgress(0));
        let body = progress_body(file, total, self.ctx.store.clone());
        let part = Part::stream_with_length(body, total).file_name(filename);
        let form = Form::new().part("file", part);

        let resp = self.ctx.http.post_multipart("file/upload", form).await?;
        read_json(resp).await
    }

    // GET <base>/file/list?...
    pub async fn list<T: DeserializeOwned>(&self, page: &PageData) -> Result<Listing<T>, ApiError> {
        self.ctx.read(&list_target(page)).await
    }

    // GET <base>/file/info/{fileId}
    pub async fn info(&self, file_id: u64) -> Result<FileInfo, ApiError> {
        self.ctx.read(&format!("file/info/{}", file_id)).await
    }

    // GET <base>/file/search?keyword={keyword}&page={page}
    pub async fn search(&self, query: &KeywordData) -> Result<Listing<FileInfo>, ApiError> {
        let target = format!(
            "file/search?keyword={}&page={}",
            query_value(&query.keyword),
            query.page
        );
        self.ctx.read(&target).await
    }
}

pub(crate) fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

/// Streams the file from disk, dispatching the running percentage per chunk.
fn progress_body(file: File, total: u64, store: Store) -> Body {
    let mut sent = 0u64;
    let chunks = ReaderStream::with_capacity(file, UPLOAD_CHUNK).map(move |chunk| {
        if let Ok(bytes) = &chunk {
            sent += bytes.len() as u64;
            store.dispatch(Action::FileProgress(percent(sent, total)));
        }
        chunk
    });
    Body::wrap_stream(chunks)
}
