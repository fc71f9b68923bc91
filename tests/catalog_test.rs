//! Integration tests for the catalog service in both serving modes.

mod common;

use assert_matches::assert_matches;
use common::TestHarness;
use mediashelf::config::CatalogMode;
use mediashelf_common::{Error, MediaType};

#[tokio::test]
async fn on_demand_listing_scenario() {
    let h = TestHarness::new(CatalogMode::OnDemand);

    let entries = h.catalog.list_library_path(0, "a", false, 1, 100).await.unwrap();
    let mut names: Vec<&str> = entries.iter().map(|e| e.relative_path.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["a/Inception.2010.1080p.mkv", "a/sub"]);

    let movie = entries
        .iter()
        .find(|e| e.relative_path == "a/Inception.2010.1080p.mkv")
        .unwrap();
    assert_eq!(movie.media_type, MediaType::Movie);
    assert_eq!(movie.name, "Inception");
    assert_eq!(movie.line1, "2010-07-16");
    assert_eq!(movie.line2, "8.8/10");
    assert_eq!(movie.icon, "https://img.test/original/poster.jpg");

    let sub = entries.iter().find(|e| e.relative_path == "a/sub").unwrap();
    assert!(sub.is_directory);
    assert_eq!(sub.media_type, MediaType::Directory);
    assert_eq!(sub.icon, h.config.icons.folder);
}

#[tokio::test]
async fn hidden_entries_on_request() {
    let h = TestHarness::new(CatalogMode::OnDemand);

    let visible = h.catalog.list_library_path(0, "a", false, 1, 100).await.unwrap();
    assert!(visible.iter().all(|e| !e.name.starts_with('.')));

    let all = h.catalog.list_library_path(0, "a", true, 1, 100).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().any(|e| e.name == ".hidden"));
}

#[tokio::test]
async fn episode_uses_tv_search_only() {
    let h = TestHarness::new(CatalogMode::OnDemand);

    let entries = h.catalog.list_library_path(0, "shows", false, 1, 100).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].media_type, MediaType::TvShow);
    assert_eq!(entries[0].name, "Foo");
    assert_eq!(entries[0].extras.get("season").map(String::as_str), Some("1"));
    assert_eq!(entries[0].extras.get("episode").map(String::as_str), Some("2"));

    assert_eq!(h.provider.tv_calls(), 1);
    assert_eq!(h.provider.movie_calls(), 0);
}

#[tokio::test]
async fn music_image_and_unknown_types() {
    let h = TestHarness::new(CatalogMode::OnDemand);

    let music = h.catalog.get_entry(0, "music/song.flac").await.unwrap();
    assert_eq!(music.media_type, MediaType::Music);
    assert_eq!(music.icon, h.config.icons.flac);

    let image = h.catalog.get_entry(0, "pics/cover.jpg").await.unwrap();
    assert_eq!(image.media_type, MediaType::Image);
    assert_eq!(image.icon, "/api/libraries/0/raw/pics/cover.jpg");

    let unknown = h.catalog.get_entry(0, "notes.xyz").await.unwrap();
    assert_eq!(unknown.media_type, MediaType::File);
    assert_eq!(unknown.icon, h.config.icons.file);
    assert_eq!(unknown.line1, "5 bytes");

    assert_eq!(h.provider.movie_calls(), 0);
    assert_eq!(h.provider.tv_calls(), 0);
}

#[tokio::test]
async fn repeated_listings_look_up_once() {
    let h = TestHarness::new(CatalogMode::OnDemand);

    let first = h.catalog.list_library_path(0, "a", false, 1, 100).await.unwrap();
    let second = h.catalog.list_library_path(0, "a", false, 1, 100).await.unwrap();
    h.catalog.get_entry(0, "a/Inception.2010.1080p.mkv").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.provider.movie_calls(), 1);
}

#[tokio::test]
async fn background_index_serves_pages() {
    let h = TestHarness::new(CatalogMode::Background);
    h.index().await;
    assert!(h.catalog.is_indexed(0).unwrap());

    // Every video was looked up exactly once during the walk.
    assert_eq!(h.provider.movie_calls(), 1);
    assert_eq!(h.provider.tv_calls(), 1);

    let root = h.catalog.list_library_path(0, "", false, 1, 100).await.unwrap();
    let mut names: Vec<&str> = root.iter().map(|e| e.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["a", "music", "notes.xyz", "pics", "shows"]);

    let page1 = h.catalog.list_library_path(0, "", false, 1, 2).await.unwrap();
    let page1_again = h.catalog.list_library_path(0, "", false, 1, 2).await.unwrap();
    let page3 = h.catalog.list_library_path(0, "", false, 3, 2).await.unwrap();
    assert_eq!(page1, page1_again);
    assert_eq!(page1[..], root[..2]);
    assert_eq!(page3[..], root[4..]);
    assert!(h.catalog.list_library_path(0, "", false, 4, 2).await.unwrap().is_empty());

    let movies = h.catalog.list_library_path(0, "a", false, 0, -1).await.unwrap();
    let movie = movies.iter().find(|e| e.media_type == MediaType::Movie).unwrap();
    assert_eq!(movie.line2, "8.8/10");
    assert_eq!(h.provider.movie_calls(), 1);
}

#[tokio::test]
async fn out_of_range_library_and_escapes() {
    for mode in [CatalogMode::OnDemand, CatalogMode::Background] {
        let h = TestHarness::new(mode);
        assert_matches!(
            h.catalog.list_library_path(1, "", false, 1, 10).await,
            Err(Error::LibraryNotFound(1))
        );
        assert_matches!(h.catalog.get_entry(99, "").await, Err(Error::LibraryNotFound(99)));
        assert_matches!(
            h.catalog.list_library_path(0, "a/../..", false, 1, 10).await,
            Err(Error::PathNotAccessible { .. })
        );
        assert_matches!(
            h.catalog.list_library_path(0, "missing", false, 1, 10).await,
            Err(Error::PathNotAccessible { .. })
        );
    }
}
