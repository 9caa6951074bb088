use super::Context;
use crate::error::ApiError;
use crate::types::{Listing, SettingInfo};

pub struct Settings<'a> {
    ctx: &'a Context,
}

impl<'a> Settings<'a> {
    pub(crate) fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    // GET <base>/setting/info?id={serverId}
    pub async fn info(&self, server_id: u64) -> Result<SettingInfo, ApiError> {
        self.ctx.read(&format!("setting/info?id={}", server_id)).await
    }

    // GET <base>/setting/list/{page}
    pub async fn list(&self, page: u32) -> Result<Listing<SettingInfo>, ApiError> {
        self.ctx.read(&format!("setting/list/{}", page)).await
    }
}
