//! Filter, sort and pagination state of the task list.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{Pagination, SortKey, Task, TaskQuery, TaskStats, TaskStatus};
use crate::error::ClientError;
use crate::ports::TaskApi;

use super::{Debouncer, SessionStore};

pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(400);

/// What happened to the response of one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was the latest and is now visible.
    Applied,
    /// A newer request was issued meanwhile; the response was dropped.
    Superseded,
}

/// Everything the view needs to render the list.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskListView {
    pub query: TaskQuery,
    pub tasks: Vec<Task>,
    pub total: u64,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl TaskListView {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.query.page,
            limit: self.query.limit,
            total: self.total,
        }
    }

    pub fn stats(&self, now: DateTime<Utc>) -> TaskStats {
        TaskStats::from_tasks(&self.tasks, now)
    }
}

/// Owns the list query and the last applied page.
///
/// Every fetch takes a generation number; a response is applied only if no
/// newer fetch was issued after it, so overlapping requests resolve to the
/// most recently issued one regardless of arrival order.
#[derive(Clone)]
pub struct TaskQueryController {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn TaskApi>,
    session: SessionStore,
    state: Mutex<ListState>,
    generation: AtomicU64,
    search: Debouncer,
}

struct ListState {
    query: TaskQuery,
    tasks: Vec<Task>,
    total: u64,
    loading: bool,
    last_error: Option<String>,
}

impl TaskQueryController {
    pub fn new(
        api: Arc<dyn TaskApi>,
        session: SessionStore,
        page_size: u32,
        search_delay: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                session,
                state: Mutex::new(ListState {
                    query: TaskQuery::new(page_size),
                    tasks: Vec::new(),
                    total: 0,
                    loading: false,
                    last_error: None,
                }),
                generation: AtomicU64::new(0),
                search: Debouncer::new(search_delay),
            }),
        }
    }

    pub async fn snapshot(&self) -> TaskListView {
        let state = self.inner.state.lock().await;
        TaskListView {
            query: state.query.clone(),
            tasks: state.tasks.clone(),
            total: state.total,
            loading: state.loading,
            last_error: state.last_error.clone(),
        }
    }

    /// Issue one list request for the current query.
    pub async fn fetch_page(&self) -> Result<FetchOutcome, ClientError> {
        let (generation, query) = {
            let mut state = self.inner.state.lock().await;
            let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            (generation, state.query.clone())
        };

        tracing::debug!(
            generation,
            page = query.page,
            status = ?query.status,
            sort = ?query.sort,
            search = %query.search,
            "Fetching tasks"
        );

        let result = self.inner.api.list(&query).await;

        let mut state = self.inner.state.lock().await;
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding superseded task page");
            return Ok(FetchOutcome::Superseded);
        }

        state.loading = false;
        match result {
            Ok(page) => {
                state.tasks = page.tasks;
                state.total = page.total;
                state.last_error = None;
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                state.last_error = Some(e.user_message().to_string());
                drop(state);
                tracing::warn!(error = %e, "Task list request failed");
                Err(self.inner.session.check_error(e).await)
            }
        }
    }

    /// Filter by status (`None` = all). Resets to page 1 and refetches.
    pub async fn set_status(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<FetchOutcome, ClientError> {
        {
            let mut state = self.inner.state.lock().await;
            state.query.status = status;
            state.query.page = 1;
        }
        self.fetch_page().await
    }

    /// Change the ordering. Resets to page 1 and refetches.
    pub async fn set_sort(&self, sort: SortKey) -> Result<FetchOutcome, ClientError> {
        {
            let mut state = self.inner.state.lock().await;
            state.query.sort = sort;
            state.query.page = 1;
        }
        self.fetch_page().await
    }

    /// Update the search text now and refetch once typing pauses.
    pub async fn set_search(&self, search: impl Into<String>) {
        {
            let mut state = self.inner.state.lock().await;
            state.query.search = search.into();
        }

        let controller = self.clone();
        self.inner.search.schedule(async move {
            if let Err(e) = controller.fetch_page().await {
                tracing::warn!(error = %e, "Debounced search failed");
            }
        });
    }

    /// Whether a search refetch is waiting for the quiet period or still in
    /// flight.
    pub fn search_pending(&self) -> bool {
        self.inner.search.is_pending()
    }

    /// Go to `page`. Pages outside `1..=total_pages` and the current page
    /// are ignored and return `Ok(None)` without a request.
    pub async fn set_page(&self, page: u32) -> Result<Option<FetchOutcome>, ClientError> {
        {
            let mut state = self.inner.state.lock().await;
            let pagination = Pagination {
                page: state.query.page,
                limit: state.query.limit,
                total: state.total,
            };
            if page == state.query.page || !pagination.contains(page) {
                tracing::debug!(page, total_pages = pagination.total_pages(), "Page change ignored");
                return Ok(None);
            }
            state.query.page = page;
        }
        self.fetch_page().await.map(Some)
    }

    pub async fn next_page(&self) -> Result<Option<FetchOutcome>, ClientError> {
        let page = self.inner.state.lock().await.query.page;
        self.set_page(page.saturating_add(1)).await
    }

    pub async fn previous_page(&self) -> Result<Option<FetchOutcome>, ClientError> {
        let page = self.inner.state.lock().await.query.page;
        self.set_page(page.saturating_sub(1)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenKind;
    use crate::ports::{AuthError, Route};
    use crate::testing::{
        FakeAuthApi, FakeTaskApi, MemoryStore, RecordingNavigator, ScriptedPage, task,
    };

    struct Harness {
        api: Arc<FakeTaskApi>,
        navigator: Arc<RecordingNavigator>,
        session: SessionStore,
        controller: TaskQueryController,
    }

    async fn harness(api: FakeTaskApi) -> Harness {
        let api = Arc::new(api);
        let navigator = Arc::new(RecordingNavigator::default());
        let stored = [(TokenKind::Access, "a"), (TokenKind::Refresh, "r")];
        let session = SessionStore::new(
            Arc::new(FakeAuthApi::default()),
            Arc::new(MemoryStore::with(&stored)),
            Arc::new(MemoryStore::with(&stored)),
            navigator.clone(),
        );
        session.initialize().await;

        let controller = TaskQueryController::new(
            api.clone(),
            session.clone(),
            DEFAULT_PAGE_SIZE,
            DEFAULT_SEARCH_DELAY,
        );
        Harness {
            api,
            navigator,
            session,
            controller,
        }
    }

    fn page_of(ids: &[&str]) -> Vec<Task> {
        ids.iter().map(|id| task(id, TaskStatus::Pending)).collect()
    }

    #[tokio::test]
    async fn test_fetch_applies_page() {
        let h = harness(FakeTaskApi::scripted(vec![ScriptedPage::ok(
            0,
            page_of(&["1", "2"]),
            12,
        )]))
        .await;

        let outcome = h.controller.fetch_page().await.unwrap();
        assert_eq!(outcome, FetchOutcome::Applied);

        let view = h.controller.snapshot().await;
        assert_eq!(view.tasks.len(), 2);
        assert_eq!(view.total, 12);
        assert!(!view.loading);
        assert_eq!(view.pagination().total_pages(), 3);

        let query = &h.api.queries()[0];
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 5);
    }

    #[tokio::test]
    async fn test_out_of_range_pages_are_ignored() {
        let h = harness(FakeTaskApi::scripted(vec![ScriptedPage::ok(
            0,
            page_of(&["1"]),
            12,
        )]))
        .await;
        h.controller.fetch_page().await.unwrap();

        assert_eq!(h.controller.set_page(0).await.unwrap(), None);
        assert_eq!(h.controller.set_page(4).await.unwrap(), None);
        assert_eq!(h.controller.previous_page().await.unwrap(), None);
        assert_eq!(h.api.queries().len(), 1);

        assert_eq!(
            h.controller.set_page(3).await.unwrap(),
            Some(FetchOutcome::Applied)
        );
        assert_eq!(h.api.queries().last().unwrap().page, 3);
    }

    #[tokio::test]
    async fn test_status_change_resets_page_before_fetch() {
        let h = harness(FakeTaskApi::scripted(vec![
            ScriptedPage::ok(0, page_of(&["1"]), 12),
            ScriptedPage::ok(0, page_of(&["11"]), 12),
        ]))
        .await;
        h.controller.fetch_page().await.unwrap();
        h.controller.set_page(3).await.unwrap();
        assert_eq!(h.controller.snapshot().await.query.page, 3);

        h.controller
            .set_status(Some(TaskStatus::Completed))
            .await
            .unwrap();

        let sent = h.api.queries().last().cloned().unwrap();
        assert_eq!(sent.page, 1);
        assert_eq!(sent.status, Some(TaskStatus::Completed));
        assert_eq!(h.controller.snapshot().await.query.page, 1);
    }

    #[tokio::test]
    async fn test_sort_change_resets_page() {
        let h = harness(FakeTaskApi::scripted(vec![ScriptedPage::ok(
            0,
            page_of(&["1"]),
            12,
        )]))
        .await;
        h.controller.fetch_page().await.unwrap();
        h.controller.set_page(2).await.unwrap();

        h.controller.set_sort(SortKey::Due).await.unwrap();

        let sent = h.api.queries().last().cloned().unwrap();
        assert_eq!(sent.page, 1);
        assert_eq!(sent.sort, SortKey::Due);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_request_wins() {
        // The first request is slower than the second one.
        let h = harness(FakeTaskApi::scripted(vec![
            ScriptedPage::ok(300, page_of(&["stale"]), 1),
            ScriptedPage::ok(50, page_of(&["fresh"]), 1),
        ]))
        .await;

        let first = {
            let controller = h.controller.clone();
            tokio::spawn(async move {
                controller
                    .set_status(Some(TaskStatus::Pending))
                    .await
                    .unwrap()
            })
        };
        tokio::task::yield_now().await;
        let second = h.controller.set_sort(SortKey::Priority).await.unwrap();

        assert_eq!(second, FetchOutcome::Applied);
        assert_eq!(first.await.unwrap(), FetchOutcome::Superseded);

        let view = h.controller.snapshot().await;
        assert_eq!(view.tasks.len(), 1);
        assert_eq!(view.tasks[0].id, "fresh");
        assert!(!view.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_error_is_discarded() {
        let h = harness(FakeTaskApi::scripted(vec![
            ScriptedPage::err(300, ClientError::Network("reset".to_string())),
            ScriptedPage::ok(10, page_of(&["ok"]), 1),
        ]))
        .await;

        let first = {
            let controller = h.controller.clone();
            tokio::spawn(async move { controller.fetch_page().await })
        };
        tokio::task::yield_now().await;
        h.controller.fetch_page().await.unwrap();

        assert_eq!(first.await.unwrap().unwrap(), FetchOutcome::Superseded);
        assert_eq!(h.controller.snapshot().await.last_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced() {
        let h = harness(FakeTaskApi::default()).await;

        for text in ["r", "re", "rep", "report"] {
            h.controller.set_search(text).await;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        // Search text is visible immediately, no request yet.
        assert_eq!(h.controller.snapshot().await.query.search, "report");
        assert!(h.api.queries().is_empty());
        assert!(h.controller.search_pending());

        tokio::time::sleep(Duration::from_millis(500)).await;

        let queries = h.api.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].search, "report");
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_pending_until_its_request_settles() {
        let h = harness(FakeTaskApi::scripted(vec![ScriptedPage::ok(
            300,
            page_of(&["match"]),
            1,
        )]))
        .await;

        h.controller.set_search("match").await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        // Timer fired, request still running.
        assert_eq!(h.api.queries().len(), 1);
        assert!(h.controller.search_pending());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!h.controller.search_pending());
        assert_eq!(h.controller.snapshot().await.tasks[0].id, "match");
    }

    #[tokio::test]
    async fn test_search_keeps_page() {
        let h = harness(FakeTaskApi::scripted(vec![ScriptedPage::ok(
            0,
            page_of(&["1"]),
            12,
        )]))
        .await;
        h.controller.fetch_page().await.unwrap();
        h.controller.set_page(2).await.unwrap();

        h.controller.set_search("x").await;

        assert_eq!(h.controller.snapshot().await.query.page, 2);
    }

    #[tokio::test]
    async fn test_unauthorized_list_expires_session() {
        let h = harness(FakeTaskApi::scripted(vec![ScriptedPage::err(
            0,
            AuthError::SessionExpired.into(),
        )]))
        .await;
        assert!(h.session.is_authenticated().await);

        let err = h.controller.fetch_page().await.unwrap_err();

        assert!(err.is_session_expired());
        assert!(!h.session.is_authenticated().await);
        assert_eq!(h.navigator.last(), Some(Route::Login));

        let view = h.controller.snapshot().await;
        assert!(!view.loading);
        assert!(view.last_error.is_some());
    }
}
