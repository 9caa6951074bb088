use std::time::{Duration, Instant};

use crate::pager::{KeywordPageList, SearchSource};
use crate::types::{FileInfo, Listing};

/// How long the "download succeeded" notice stays up. Cosmetic only.
pub const DOWNLOAD_FLASH: Duration = Duration::from_secs(2);
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [10, 25, 100];

#[derive(Debug, Clone, PartialEq)]
pub enum SearchView {
    /// "키워드를 입력해 주세요"
    Placeholder,
    Results(Listing<FileInfo>),
}

pub struct SearchModal<S: SearchSource> {
    list: KeywordPageList<S>,
    keyword: String,
    page: u32,
    rows_per_page: usize,
    open: bool,
    flash_until: Option<Instant>,
}

impl<S: SearchSource> SearchModal<S> {
    pub async fn mount(source: S) -> Self {
        Self {
            list: KeywordPageList::mount(source, "").await,
            keyword: String::new(),
            page: 0,
            rows_per_page: ROWS_PER_PAGE_OPTIONS[0],
            open: false,
            flash_until: None,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Every keystroke restarts the search from page 0.
    pub async fn input(&mut self, text: &str) {
        self.page = 0;
        self.keyword = text.to_string();
        self.list.fetch(0, text).await;
    }

    pub async fn change_page(&mut self, page: u32) {
        self.page = page;
        self.list.fetch(page, &self.keyword).await;
    }

    pub async fn set_rows_per_page(&mut self, rows: usize) {
        self.rows_per_page = rows;
        self.change_page(0).await;
    }

    pub fn clear(&mut self) {
        self.keyword.clear();
        self.page = 0;
    }

    pub fn download_click(&mut self, file: &FileInfo, now: Instant) {
        log::debug!("search: download clicked for {}", file.file_id);
        self.flash_until = Some(now + DOWNLOAD_FLASH);
    }

    pub fn flash_visible(&self, now: Instant) -> bool {
        self.flash_until.is_some_and(|until| now < until)
    }

    pub fn view(&self) -> SearchView {
        if self.keyword.is_empty() {
            SearchView::Placeholder
        } else {
            SearchView::Results(self.list.data())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::error::ApiError;
    use crate::types::KeywordData;

    #[derive(Clone, Default)]
    struct Echo {
        calls: Arc<Mutex<Vec<KeywordData>>>,
    }

    #[async_trait]
    impl SearchSource for Echo {
        async fn search(&self, query: &KeywordData) -> Result<Listing<FileInfo>, ApiError> {
            self.calls.lock().unwrap().push(query.clone());
            Ok(Listing {
                datas: vec![file(&query.keyword)],
                size: None,
            })
        }
    }

    fn file(name: &str) -> FileInfo {
        FileInfo {
            id: 1,
            file_id: format!("node-{}", name),
            filename: name.to_string(),
            file_size: 10,
            description: None,
            created_at: "2022-01-01".into(),
            is_like: None,
            shared: None,
        }
    }

    #[tokio::test]
    async fn placeholder_until_keyword_is_typed() {
        let source = Echo::default();
        let mut modal = SearchModal::mount(source.clone()).await;
        assert_eq!(modal.view(), SearchView::Placeholder);
        assert!(source.calls.lock().unwrap().is_empty());

        modal.input("cat").await;
        match modal.view() {
            SearchView::Results(listing) => assert_eq!(listing.datas[0].filename, "cat"),
            other => panic!("unexpected view {:?}", other),
        }

        modal.clear();
        assert_eq!(modal.view(), SearchView::Placeholder);
    }

    #[tokio::test]
    async fn paging_reuses_keyword_and_rows_reset_page() {
        let source = Echo::default();
        let mut modal = SearchModal::mount(source.clone()).await;
        modal.input("dog").await;
        modal.change_page(3).await;
        assert_eq!(modal.page(), 3);

        modal.set_rows_per_page(25).await;
        assert_eq!(modal.page(), 0);
        assert_eq!(modal.rows_per_page(), 25);

        let calls = source.calls.lock().unwrap().clone();
        let pages: Vec<u32> = calls.iter().map(|c| c.page).collect();
        assert_eq!(pages, vec![0, 3, 0]);
        assert!(calls.iter().all(|c| c.keyword == "dog"));
    }

    #[tokio::test]
    async fn download_flash_lasts_two_seconds() {
        let mut modal = SearchModal::mount(Echo::default()).await;
        let now = Instant::now();
        assert!(!modal.flash_visible(now));

        modal.download_click(&file("a"), now);
        assert!(modal.flash_visible(now + Duration::from_millis(1999)));
        assert!(!modal.flash_visible(now + DOWNLOAD_FLASH));
    }
}
