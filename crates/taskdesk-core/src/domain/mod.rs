//! Domain entities - the client's view of the task service.

mod query;
mod session;
mod task;
mod user;

pub use query::{Pagination, SortKey, TaskPage, TaskQuery, TaskStats, total_pages};
pub use session::{
    AuthTokens, Credentials, LoginGrant, RefreshGrant, Registration, Session, TokenKind,
};
pub use task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
pub use user::User;
