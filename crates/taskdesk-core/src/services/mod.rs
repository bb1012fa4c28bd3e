//! Application services - session lifecycle, list querying and task
//! mutations, written against the ports only.

mod debounce;
mod session;
mod task_actions;
mod task_query;

pub use debounce::Debouncer;
pub use session::SessionStore;
pub use task_actions::{TaskAction, TaskActions};
pub use task_query::{
    DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DELAY, FetchOutcome, TaskListView, TaskQueryController,
};
