use serde_json::Value;

use super::Context;
use crate::error::ApiError;
use crate::http::query_value;
use crate::types::{FolderInfo, Listing};

pub struct Status<'a> {
    ctx: &'a Context,
}

impl<'a> Status<'a> {
    pub(crate) fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    // GET <base>/status/download
    /// Download counters; the shape is server-defined.
    pub async fn download(&self) -> Result<Value, ApiError> {
        self.ctx.read("status/download").await
    }

    // GET <base>/status/folder?type={type}
    pub async fn folder(&self, kind: &str) -> Result<Listing<FolderInfo>, ApiError> {
        self.ctx
            .read(&format!("status/folder?type={}", query_value(kind)))
            .await
    }
}
