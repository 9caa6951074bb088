//! Paged data-fetch controllers.
//!
//! Each controller owns a page cursor and the most recent result. Every
//! request takes a ticket from a monotonic counter; a response is applied only
//! when its ticket is newer than the one last applied, so a slow response for
//! an old page or keyword never overwrites a newer one. Failures are already
//! reported by the [`Api`] layer and leave the previous data in place.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::Api;
use crate::error::ApiError;
use crate::types::{FileInfo, FolderInfo, Identifier, KeywordData, Listing, PageData, SettingInfo};

// ============================================================================
// Sequencing
// ============================================================================

struct Latest<T> {
    issued: AtomicU64,
    slot: Mutex<(u64, T)>,
}

impl<T: Clone> Latest<T> {
    fn new(initial: T) -> Self {
        Self {
            issued: AtomicU64::new(0),
            slot: Mutex::new((0, initial)),
        }
    }

    fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns false when a newer response already landed.
    fn apply(&self, ticket: u64, value: T) -> bool {
        let Ok(mut slot) = self.slot.lock() else {
            return false;
        };
        if ticket <= slot.0 {
            log::debug!("stale response dropped (ticket {} ≤ {})", ticket, slot.0);
            return false;
        }
        *slot = (ticket, value);
        true
    }

    /// Records a failed request so older responses still in flight are
    /// dropped. The current value stays.
    fn settle(&self, ticket: u64) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.0 = slot.0.max(ticket);
        }
    }

    fn get(&self) -> T {
        match self.slot.lock() {
            Ok(slot) => slot.1.clone(),
            Err(poisoned) => poisoned.into_inner().1.clone(),
        }
    }
}

// ============================================================================
// Page sources
// ============================================================================

#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Clone + Default + Send;

    async fn fetch(&self, page: u32) -> Result<Self::Item, ApiError>;
}

/// `file.list` for one path/type, as files or as folders.
pub struct PathListing<T> {
    api: Api,
    path: String,
    kind: String,
    identifier: Identifier,
    _item: std::marker::PhantomData<fn() -> T>,
}

impl PathListing<FileInfo> {
    pub fn files(api: Api, path: impl Into<String>, kind: impl Into<String>) -> Self {
        PathListing::with_identifier(api, path, kind, Identifier::File)
    }
}

impl PathListing<FolderInfo> {
    pub fn folders(api: Api, path: impl Into<String>, kind: impl Into<String>) -> Self {
        PathListing::with_identifier(api, path, kind, Identifier::Folder)
    }
}

impl<T> PathListing<T> {
    fn with_identifier(
        api: Api,
        path: impl Into<String>,
        kind: impl Into<String>,
        identifier: Identifier,
    ) -> Self {
        Self {
            api,
            path: path.into(),
            kind: kind.into(),
            identifier,
            _item: std::marker::PhantomData,
        }
    }

    pub fn page_data(&self, page: u32) -> PageData {
        PageData {
            page,
            path: self.path.clone(),
            kind: self.kind.clone(),
            identifier: self.identifier,
        }
    }
}

#[async_trait]
impl<T> PageSource for PathListing<T>
where
    T: serde::de::DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Item = Listing<T>;

    async fn fetch(&self, page: u32) -> Result<Listing<T>, ApiError> {
        self.api.file().list(&self.page_data(page)).await
    }
}

/// `setting.list`
pub struct SettingListing {
    api: Api,
}

impl SettingListing {
    pub fn new(api: Api) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource for SettingListing {
    type Item = Listing<SettingInfo>;

    async fn fetch(&self, page: u32) -> Result<Listing<SettingInfo>, ApiError> {
        self.api.setting().list(page).await
    }
}

// ============================================================================
// PagedList: folder / file / setting lists
// ============================================================================

pub struct PagedList<S: PageSource> {
    source: S,
    page: Mutex<u32>,
    data: Latest<S::Item>,
}

pub type FilePathPageList = PagedList<PathListing<FileInfo>>;
pub type FolderPathPageList = PagedList<PathListing<FolderInfo>>;
pub type SettingPageList = PagedList<SettingListing>;

impl<S: PageSource> PagedList<S> {
    /// Page 0, empty data, one fetch.
    pub async fn mount(source: S) -> Self {
        let list = Self {
            source,
            page: Mutex::new(0),
            data: Latest::new(S::Item::default()),
        };
        list.load(0).await;
        list
    }

    pub fn page(&self) -> u32 {
        self.page.lock().map(|p| *p).unwrap_or(0)
    }

    pub fn data(&self) -> S::Item {
        self.data.get()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn set_page(&self, page: u32) {
        if let Ok(mut current) = self.page.lock() {
            *current = page;
        }
        self.load(page).await;
    }

    pub async fn refresh(&self) {
        self.load(self.page()).await;
    }

    async fn load(&self, page: u32) {
        let ticket = self.data.ticket();
        match self.source.fetch(page).await {
            Ok(item) => {
                self.data.apply(ticket, item);
            }
            Err(e) => {
                self.data.settle(ticket);
                log::debug!("page {} fetch failed, keeping previous data: {}", page, e);
            }
        }
    }
}

// ============================================================================
// KeywordPageList: search
// ============================================================================

#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search(&self, query: &KeywordData) -> Result<Listing<FileInfo>, ApiError>;
}

#[async_trait]
impl SearchSource for Api {
    async fn search(&self, query: &KeywordData) -> Result<Listing<FileInfo>, ApiError> {
        self.file().search(query).await
    }
}

pub struct KeywordPageList<S: SearchSource> {
    source: S,
    query: Mutex<KeywordData>,
    data: Latest<Listing<FileInfo>>,
}

impl<S: SearchSource> KeywordPageList<S> {
    pub async fn mount(source: S, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let list = Self {
            source,
            query: Mutex::new(KeywordData {
                page: 0,
                keyword: String::new(),
            }),
            data: Latest::new(Listing::default()),
        };
        list.fetch(0, &keyword).await;
        list
    }

    pub fn data(&self) -> Listing<FileInfo> {
        self.data.get()
    }

    pub fn query(&self) -> KeywordData {
        self.query
            .lock()
            .map(|q| q.clone())
            .unwrap_or(KeywordData {
                page: 0,
                keyword: String::new(),
            })
    }

    /// An empty keyword clears the results without a request.
    pub async fn fetch(&self, page: u32, keyword: &str) {
        let query = KeywordData {
            page,
            keyword: keyword.to_string(),
        };
        if let Ok(mut current) = self.query.lock() {
            *current = query.clone();
        }

        let ticket = self.data.ticket();
        if keyword.is_empty() {
            self.data.apply(ticket, Listing::default());
            return;
        }
        match self.source.search(&query).await {
            Ok(listing) => {
                self.data.apply(ticket, listing);
            }
            Err(e) => {
                self.data.settle(ticket);
                log::debug!("search '{}' failed, keeping previous data: {}", keyword, e);
            }
        }
    }
}

// ============================================================================
// FolderTabs: folder picker
// ============================================================================

pub struct FolderTabs {
    api: Api,
    data: Latest<Listing<FolderInfo>>,
}

impl FolderTabs {
    pub async fn mount(api: Api, kind: &str) -> Self {
        let tabs = Self {
            api,
            data: Latest::new(Listing::default()),
        };
        tabs.fetch(kind).await;
        tabs
    }

    pub fn data(&self) -> Listing<FolderInfo> {
        self.data.get()
    }

    pub async fn fetch(&self, kind: &str) {
        let ticket = self.data.ticket();
        match self.api.status().folder(kind).await {
            Ok(listing) => {
                self.data.apply(ticket, listing);
            }
            Err(_) => self.data.settle(ticket),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use reqwest::StatusCode;

    /// Returns `page * 10` as the single item; pages listed in `slow` take longer.
    #[derive(Clone, Default)]
    struct FakePages {
        calls: Arc<Mutex<Vec<u32>>>,
        slow: Vec<u32>,
        failing: Vec<u32>,
    }

    impl FakePages {
        fn calls(&self) -> Vec<u32> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for FakePages {
        type Item = Listing<u32>;

        async fn fetch(&self, page: u32) -> Result<Listing<u32>, ApiError> {
            self.calls.lock().unwrap().push(page);
            let delay = if self.slow.contains(&page) { 60 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if self.failing.contains(&page) {
                return Err(ApiError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: "boom".into(),
                });
            }
            Ok(Listing {
                datas: vec![page * 10],
                size: None,
            })
        }
    }

    #[derive(Clone, Default)]
    struct FakeSearch {
        calls: Arc<Mutex<Vec<KeywordData>>>,
    }

    #[async_trait]
    impl SearchSource for FakeSearch {
        async fn search(&self, query: &KeywordData) -> Result<Listing<FileInfo>, ApiError> {
            self.calls.lock().unwrap().push(query.clone());
            let delay = if query.keyword == "c" { 60 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(Listing {
                datas: vec![FileInfo {
                    id: query.page as u64,
                    file_id: query.keyword.clone(),
                    filename: format!("{}.txt", query.keyword),
                    file_size: 1,
                    description: None,
                    created_at: "2022-01-01".into(),
                    is_like: None,
                    shared: None,
                }],
                size: Some(1),
            })
        }
    }

    #[tokio::test]
    async fn mount_fetches_page_zero_once() {
        let source = FakePages::default();
        let list = PagedList::mount(source.clone()).await;
        assert_eq!(source.calls(), vec![0]);
        assert_eq!(list.page(), 0);
        assert_eq!(list.data().datas, vec![0]);
    }

    #[tokio::test]
    async fn each_set_page_issues_exactly_one_fetch() {
        let source = FakePages::default();
        let list = PagedList::mount(source.clone()).await;
        for page in [1, 4, 4, 2] {
            list.set_page(page).await;
        }
        assert_eq!(source.calls(), vec![0, 1, 4, 4, 2]);
        assert_eq!(list.page(), 2);
        assert_eq!(list.data().datas, vec![20]);

        list.refresh().await;
        assert_eq!(source.calls().last(), Some(&2));
    }

    #[tokio::test]
    async fn stale_response_does_not_overwrite_newer_page() {
        let source = FakePages {
            slow: vec![1],
            ..FakePages::default()
        };
        let list = PagedList::mount(source.clone()).await;

        // page 1 is requested first but answers last
        tokio::join!(list.set_page(1), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            list.set_page(2).await;
        });

        assert_eq!(list.page(), 2);
        assert_eq!(list.data().datas, vec![20]);
    }

    #[tokio::test]
    async fn failed_newer_page_still_drops_older_response() {
        let source = FakePages {
            slow: vec![1],
            failing: vec![2],
            ..FakePages::default()
        };
        let list = PagedList::mount(source.clone()).await;

        tokio::join!(list.set_page(1), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            list.set_page(2).await;
        });

        // page 1 rows must not show up under the page 2 cursor
        assert_eq!(list.page(), 2);
        assert_eq!(list.data().datas, vec![0]);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_data() {
        let source = FakePages {
            failing: vec![3],
            ..FakePages::default()
        };
        let list = PagedList::mount(source).await;
        list.set_page(1).await;
        list.set_page(3).await;
        assert_eq!(list.page(), 3);
        assert_eq!(list.data().datas, vec![10]);
    }

    #[tokio::test]
    async fn empty_keyword_never_hits_the_server() {
        let source = FakeSearch::default();
        let list = KeywordPageList::mount(source.clone(), "").await;
        assert!(source.calls.lock().unwrap().is_empty());
        assert!(list.data().is_empty());

        list.fetch(0, "cat").await;
        assert_eq!(list.data().len(), 1);

        list.fetch(0, "").await;
        assert!(list.data().is_empty());
        assert_eq!(source.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn keyword_fetch_passes_page_and_keyword() {
        let source = FakeSearch::default();
        let list = KeywordPageList::mount(source.clone(), "dog").await;
        list.fetch(2, "dog").await;
        let calls = source.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                KeywordData { page: 0, keyword: "dog".into() },
                KeywordData { page: 2, keyword: "dog".into() },
            ]
        );
        assert_eq!(list.query().page, 2);
    }

    #[tokio::test]
    async fn fast_typing_keeps_latest_keyword_results() {
        let source = FakeSearch::default();
        let list = KeywordPageList::mount(source, "").await;

        // "c" is slow and typed before "ca"
        tokio::join!(list.fetch(0, "c"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            list.fetch(0, "ca").await;
        });

        assert_eq!(list.data().datas[0].file_id, "ca");
        assert_eq!(list.query().keyword, "ca");
    }

    #[tokio::test]
    async fn clearing_keyword_discards_in_flight_search() {
        let source = FakeSearch::default();
        let list = KeywordPageList::mount(source, "").await;

        tokio::join!(list.fetch(0, "c"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            list.fetch(0, "").await;
        });

        assert!(list.data().is_empty());
    }
}
