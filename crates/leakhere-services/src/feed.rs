//! Paged gallery listing with client-side type filter and sort order.

use std::sync::Arc;

use leakhere_core::gallery::{filter_and_sort, has_more, merge_page, SortOrder, TypeFilter};
use leakhere_core::models::{FilesQuery, MediaFile};
use leakhere_core::ports::{FilesApi, Notice, Notifier};
use leakhere_core::CdnUrlRewriter;

use crate::error::ServiceError;

pub struct GalleryFeed {
    files: Arc<dyn FilesApi>,
    notifier: Arc<dyn Notifier>,
    cdn: CdnUrlRewriter,
    page_size: u32,
    items: Vec<MediaFile>,
    next_page: u32,
    has_more: bool,
    search: Option<String>,
    filter: TypeFilter,
    sort: SortOrder,
}

impl GalleryFeed {
    pub fn new(
        files: Arc<dyn FilesApi>,
        notifier: Arc<dyn Notifier>,
        cdn: CdnUrlRewriter,
        page_size: u32,
    ) -> Self {
        Self {
            files,
            notifier,
            cdn,
            page_size: page_size.max(1),
            items: Vec::new(),
            next_page: 1,
            has_more: true,
            search: None,
            filter: TypeFilter::All,
            sort: SortOrder::Recent,
        }
    }

    /// Drop everything loaded and fetch page 1 for `search`.
    pub async fn refresh(&mut self, search: Option<&str>) -> Result<(), ServiceError> {
        self.search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self.next_page = 1;
        self.has_more = true;
        self.fetch(true).await
    }

    /// Fetch the next page. A no-op once the listing is exhausted.
    pub async fn load_more(&mut self) -> Result<(), ServiceError> {
        if !self.has_more {
            return Ok(());
        }
        self.fetch(false).await
    }

    #[tracing::instrument(skip(self), fields(page = self.next_page, search = ?self.search))]
    async fn fetch(&mut self, reset: bool) -> Result<(), ServiceError> {
        let query = FilesQuery::new(self.next_page, self.page_size, self.search.as_deref());

        let page = match self.files.list_files(&query).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load files");
                self.has_more = false;
                if reset {
                    self.items.clear();
                }
                self.notifier.notify(Notice::error("Failed to load files"));
                return Err(ServiceError::api_with(e, "Failed to load files"));
            }
        };

        let fetched = page.files.len();
        self.has_more = has_more(page.pagination.as_ref(), fetched, self.page_size);

        let files = page.files.into_iter().map(|f| self.to_cdn(f)).collect();
        merge_page(&mut self.items, files, reset);
        self.next_page += 1;

        tracing::debug!(fetched, total = self.items.len(), has_more = self.has_more, "Loaded page");
        Ok(())
    }

    fn to_cdn(&self, mut file: MediaFile) -> MediaFile {
        file.download_url = file.download_url.map(|u| self.cdn.rewrite(&u));
        file.thumbnail_url = file.thumbnail_url.map(|u| self.cdn.rewrite(&u));
        file
    }

    /// Loaded items after the current filter and sort.
    pub fn visible(&self) -> Vec<MediaFile> {
        filter_and_sort(&self.items, self.filter, self.sort)
    }

    pub fn items(&self) -> &[MediaFile] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn set_filter(&mut self, filter: TypeFilter) {
        self.filter = filter;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockFilesApi, RecordingNotifier};
    use leakhere_core::models::{FileTypeCategory, FilesPage, Pagination};

    fn media(id: &str, kind: &str, views: u64) -> MediaFile {
        MediaFile {
            file_id: id.to_string(),
            file_type: Some(kind.to_string()),
            view_count: Some(views),
            download_url: Some(format!(
                "https://uploadhere-storage-pc.s3.amazonaws.com/{kind}/{id}"
            )),
            ..Default::default()
        }
    }

    fn page(files: Vec<MediaFile>, has_next: Option<bool>) -> FilesPage {
        FilesPage {
            files,
            pagination: has_next.map(|has_next| Pagination {
                has_next: Some(has_next),
                ..Default::default()
            }),
        }
    }

    fn feed(api: Arc<MockFilesApi>, page_size: u32) -> (GalleryFeed, Arc<RecordingNotifier>) {
        let notifier = RecordingNotifier::new();
        let feed = GalleryFeed::new(
            api,
            notifier.clone(),
            CdnUrlRewriter::new("cdn.test"),
            page_size,
        );
        (feed, notifier)
    }

    #[tokio::test]
    async fn pages_accumulate_without_duplicates() {
        let api = Arc::new(
            MockFilesApi::default()
                .with_page(
                    1,
                    page(vec![media("a", "images", 1), media("b", "videos", 5)], Some(true)),
                )
                .with_page(
                    2,
                    page(vec![media("b", "videos", 5), media("c", "images", 9)], Some(false)),
                ),
        );
        let (mut feed, _) = feed(api.clone(), 2);

        feed.refresh(None).await.unwrap();
        feed.load_more().await.unwrap();
        assert!(!feed.has_more());
        feed.load_more().await.unwrap();

        let ids: Vec<_> = feed.items().iter().map(|f| f.file_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(api.queries.lock().unwrap().len(), 2);
        assert_eq!(
            feed.items()[0].download_url.as_deref(),
            Some("https://cdn.test/images/a")
        );
    }

    #[tokio::test]
    async fn short_page_without_pagination_ends_listing() {
        let api = Arc::new(
            MockFilesApi::default().with_page(1, page(vec![media("a", "images", 1)], None)),
        );
        let (mut feed, _) = feed(api, 20);
        feed.refresh(Some("  ")).await.unwrap();
        assert!(!feed.has_more());
    }

    #[tokio::test]
    async fn refresh_sends_search_and_resets() {
        let api = Arc::new(
            MockFilesApi::default().with_page(1, page(vec![media("a", "images", 1)], Some(true))),
        );
        let (mut feed, _) = feed(api.clone(), 1);

        feed.refresh(None).await.unwrap();
        feed.refresh(Some(" cats ")).await.unwrap();

        let queries = api.queries.lock().unwrap();
        assert_eq!(queries[1].page, 1);
        assert_eq!(queries[1].search.as_deref(), Some("cats"));
        assert_eq!(feed.items().len(), 1);
    }

    #[tokio::test]
    async fn visible_applies_filter_and_sort() {
        let api = Arc::new(MockFilesApi::default().with_page(
            1,
            page(
                vec![media("a", "images", 1), media("b", "videos", 5), media("c", "images", 9)],
                Some(false),
            ),
        ));
        let (mut feed, _) = feed(api, 20);
        feed.refresh(None).await.unwrap();

        feed.set_filter(TypeFilter::Only(FileTypeCategory::Images));
        feed.set_sort(SortOrder::Views);
        let ids: Vec<_> = feed.visible().into_iter().map(|f| f.file_id).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn failure_stops_paging_and_notifies() {
        let api = Arc::new(
            MockFilesApi::default().with_page(1, page(vec![media("a", "images", 1)], Some(true))),
        );
        let (mut feed, notifier) = feed(api.clone(), 1);
        feed.refresh(None).await.unwrap();

        api.fail_listing();
        let err = feed.load_more().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load files");
        assert!(!feed.has_more());
        assert_eq!(feed.items().len(), 1);
        assert_eq!(notifier.messages(), vec!["Failed to load files"]);
    }
}
