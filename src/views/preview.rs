use url::Url;

use crate::api::Api;
use crate::types::FileInfo;

#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    NoPhoto,
    Photo { info: FileInfo, url: Url },
}

/// Shows the selected image, if any.
pub struct PhotoPreview {
    api: Api,
    current: Preview,
}

impl PhotoPreview {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            current: Preview::NoPhoto,
        }
    }

    pub fn current(&self) -> &Preview {
        &self.current
    }

    /// An empty or non-numeric id clears the preview. A failed lookup keeps
    /// what is on screen.
    pub async fn select(&mut self, file_id: &str) {
        let Ok(id) = file_id.trim().parse::<u64>() else {
            if !file_id.is_empty() {
                log::debug!("preview: ignoring file id {:?}", file_id);
            }
            self.current = Preview::NoPhoto;
            return;
        };
        let files = self.api.file();
        let Ok(info) = files.info(id).await else {
            return;
        };
        match files.download_url(id) {
            Ok(url) => self.current = Preview::Photo { info, url },
            Err(e) => log::warn!("preview url: {}", e),
        }
    }
}
