mod common;

use common::Harness;
use drive_client::pager::{FilePathPageList, FolderPathPageList, PagedList, PathListing, SettingListing};
use drive_client::views::{FolderTabButton, PhotoPreview, Preview, SearchModal, SearchView};
use httpmock::prelude::*;
use serde_json::json;

fn file_row(id: u64, name: &str) -> serde_json::Value {
    json!({ "id": id, "fileId": format!("Qm{}", id), "filename": name, "fileSize": 1, "createdAt": "2022-01-01" })
}

#[tokio::test]
async fn file_list_fetches_once_per_page_change() {
    let server = MockServer::start_async().await;
    let page0 = server.mock(|when, then| {
        when.method(GET)
            .path("/api/file/list")
            .query_param("file", "/photos")
            .query_param("type", "photo")
            .query_param("page", "0");
        then.status(200).json_body(json!({ "datas": [file_row(1, "a.png")] }));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET)
            .path("/api/file/list")
            .query_param("file", "/photos")
            .query_param("type", "photo")
            .query_param("page", "2");
        then.status(200).json_body(json!({ "datas": [file_row(9, "z.png")] }));
    });

    let h = Harness::new(&server.base_url());
    let list: FilePathPageList =
        PagedList::mount(PathListing::files(h.api.clone(), "/photos", "photo")).await;
    assert_eq!(list.data().datas[0].filename, "a.png");

    list.set_page(2).await;
    page0.assert();
    page2.assert();
    assert_eq!(list.page(), 2);
    assert_eq!(list.data().datas[0].filename, "z.png");
}

#[tokio::test]
async fn folder_list_uses_folder_identifier() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/file/list")
            .query_param("folder", "/")
            .query_param("type", "all")
            .query_param("page", "0");
        then.status(200).json_body(json!({ "datas": [{ "path": "/docs", "count": 2 }] }));
    });

    let h = Harness::new(&server.base_url());
    let list: FolderPathPageList =
        PagedList::mount(PathListing::folders(h.api.clone(), "/", "all")).await;

    mock.assert();
    assert_eq!(list.data().datas[0].path, "/docs");
}

#[tokio::test]
async fn failed_page_keeps_previous_rows_and_toasts() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/setting/list/0");
        then.status(200).json_body(json!({
            "datas": [{ "id": 1, "host": "node1", "port": 5001, "size": 10 }]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/setting/list/1");
        then.status(504);
    });

    let h = Harness::new(&server.base_url());
    let list = PagedList::mount(SettingListing::new(h.api.clone())).await;
    list.set_page(1).await;

    assert_eq!(list.page(), 1);
    assert_eq!(list.data().datas[0].host, "node1");
    assert_eq!(h.toasts().len(), 1);
}

#[tokio::test]
async fn search_modal_stays_silent_until_a_keyword_is_typed() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/file/search")
            .query_param("keyword", "trip")
            .query_param("page", "0");
        then.status(200).json_body(json!({ "datas": [file_row(4, "trip.mp4")] }));
    });

    let h = Harness::new(&server.base_url());
    let mut modal = SearchModal::mount(h.api.clone()).await;
    assert_eq!(modal.view(), SearchView::Placeholder);
    // an unmatched request would have produced a 404 toast
    assert!(h.toasts().is_empty());

    modal.input("trip").await;
    mock.assert();
    match modal.view() {
        SearchView::Results(listing) => assert_eq!(listing.datas[0].filename, "trip.mp4"),
        other => panic!("unexpected view {:?}", other),
    }
}

#[tokio::test]
async fn folder_tab_refreshes_on_show_and_selects() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/status/folder").query_param("type", "video");
        then.status(200).json_body(json!({
            "datas": [{ "path": "/", "count": 1 }, { "path": "/movies", "count": 5 }]
        }));
    });

    let h = Harness::new(&server.base_url());
    let mut button = FolderTabButton::mount(h.api.clone(), "video", "/").await;
    assert_eq!(button.entries().len(), 2);

    button.show().await;
    assert!(button.is_open());
    button.select("/movies");
    assert!(!button.is_open());
    assert!(button.is_current("/movies"));
}

#[tokio::test]
async fn photo_preview_loads_info_or_shows_nothing() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/file/info/12");
        then.status(200).json_body(file_row(12, "sunset.jpg"));
    });

    let h = Harness::new(&server.base_url());
    let mut preview = PhotoPreview::new(h.api.clone());
    assert_eq!(preview.current(), &Preview::NoPhoto);

    preview.select("12").await;
    match preview.current() {
        Preview::Photo { info, url } => {
            assert_eq!(info.filename, "sunset.jpg");
            assert!(url.as_str().ends_with("/api/file/download/12"));
        }
        other => panic!("unexpected preview {:?}", other),
    }

    preview.select("").await;
    assert_eq!(preview.current(), &Preview::NoPhoto);
}
