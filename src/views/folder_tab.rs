use crate::api::Api;
use crate::pager::FolderTabs;
use crate::types::FolderInfo;

/// Folder picker for one file type.
pub struct FolderTabButton {
    tabs: FolderTabs,
    kind: String,
    path: String,
    open: bool,
}

impl FolderTabButton {
    pub async fn mount(api: Api, kind: impl Into<String>, path: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            tabs: FolderTabs::mount(api, &kind).await,
            kind,
            path: path.into(),
            open: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_current(&self, path: &str) -> bool {
        self.path == path
    }

    pub fn entries(&self) -> Vec<FolderInfo> {
        self.tabs.data().datas
    }

    /// Refreshes the folder list and toggles the popup.
    pub async fn show(&mut self) {
        self.tabs.fetch(&self.kind).await;
        self.open = !self.open;
    }

    pub fn select(&mut self, path: impl Into<String>) {
        self.path = path.into();
        self.open = false;
    }
}
