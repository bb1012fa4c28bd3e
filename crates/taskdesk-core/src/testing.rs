//! In-crate fakes for the ports, used by the service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    AuthTokens, Credentials, LoginGrant, NewTask, RefreshGrant, Registration, Task, TaskPage,
    TaskPatch, TaskPriority, TaskQuery, TaskStatus, TokenKind, User,
};
use crate::error::ClientError;
use crate::ports::{AuthApi, AuthError, Navigator, Route, StorageError, TaskApi, TokenStore};

pub fn user(email: &str) -> User {
    User {
        id: Some("u1".to_string()),
        name: Some("Test User".to_string()),
        email: Some(email.to_string()),
        extra: Default::default(),
    }
}

pub fn task(id: &str, status: TaskStatus) -> Task {
    let now = Utc::now();
    Task {
        id: id.to_string(),
        title: format!("Task {id}"),
        description: None,
        status,
        priority: TaskPriority::Low,
        due_date: None,
        created_at: now,
        updated_at: now,
    }
}

fn network_error() -> ClientError {
    ClientError::Network("connection refused".to_string())
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<TokenKind, String>>,
}

impl MemoryStore {
    pub fn with(tokens: &[(TokenKind, &str)]) -> Self {
        let store = Self::default();
        {
            let mut values = store.values.lock().unwrap();
            for (kind, value) in tokens {
                values.insert(*kind, value.to_string());
            }
        }
        store
    }

    pub fn peek(&self, kind: TokenKind) -> Option<String> {
        self.values.lock().unwrap().get(&kind).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn get(&self, kind: TokenKind) -> Option<String> {
        self.peek(kind)
    }

    async fn set(&self, kind: TokenKind, value: &str) -> Result<(), StorageError> {
        self.values.lock().unwrap().insert(kind, value.to_string());
        Ok(())
    }

    async fn remove(&self, kind: TokenKind) -> Result<(), StorageError> {
        self.values.lock().unwrap().remove(&kind);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes.lock().unwrap().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// How a fake auth endpoint answers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Reject,
    Offline,
}

pub struct FakeAuthApi {
    pub login_reply: Reply,
    pub refresh_reply: Reply,
    pub logout_reply: Reply,
    pub register_reply: Reply,
    pub calls: AtomicUsize,
}

impl Default for FakeAuthApi {
    fn default() -> Self {
        Self {
            login_reply: Reply::Ok,
            refresh_reply: Reply::Ok,
            logout_reply: Reply::Ok,
            register_reply: Reply::Ok,
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeAuthApi {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.login_reply {
            Reply::Ok => Ok(LoginGrant {
                tokens: AuthTokens {
                    access_token: "access-1".to_string(),
                    refresh_token: "refresh-1".to_string(),
                },
                user: user(&credentials.email),
            }),
            Reply::Reject => Err(ClientError::Server {
                status: 404,
                message: "User not found".to_string(),
            }),
            Reply::Offline => Err(network_error()),
        }
    }

    async fn register(&self, _registration: &Registration) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.register_reply {
            Reply::Ok => Ok(()),
            Reply::Reject => Err(ClientError::Server {
                status: 409,
                message: "Email taken".to_string(),
            }),
            Reply::Offline => Err(network_error()),
        }
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<RefreshGrant, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.refresh_reply {
            Reply::Ok => Ok(RefreshGrant {
                access_token: "access-2".to_string(),
                user: user("me@example.com"),
            }),
            Reply::Reject => Err(AuthError::RefreshRejected("expired".to_string()).into()),
            Reply::Offline => Err(network_error()),
        }
    }

    async fn logout(&self, _refresh_token: &str) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.logout_reply {
            Reply::Ok => Ok(()),
            Reply::Reject => Err(AuthError::SessionExpired.into()),
            Reply::Offline => Err(network_error()),
        }
    }
}

/// One scripted answer to a list call.
pub struct ScriptedPage {
    pub delay: Duration,
    pub result: Result<TaskPage, ClientError>,
}

impl ScriptedPage {
    pub fn ok(delay_ms: u64, tasks: Vec<Task>, total: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            result: Ok(TaskPage { tasks, total }),
        }
    }

    pub fn err(delay_ms: u64, error: ClientError) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            result: Err(error),
        }
    }
}

/// Task API whose list calls answer from a script, in call order.
/// Once the script is exhausted every list call returns an empty page.
#[derive(Default)]
pub struct FakeTaskApi {
    script: Mutex<VecDeque<ScriptedPage>>,
    queries: Mutex<Vec<TaskQuery>>,
    mutations: Mutex<Vec<String>>,
    fail_mutations: bool,
    mutation_delay: Duration,
}

impl FakeTaskApi {
    pub fn scripted(pages: Vec<ScriptedPage>) -> Self {
        Self {
            script: Mutex::new(pages.into()),
            ..Default::default()
        }
    }

    /// Every mutation answers 500.
    pub fn failing() -> Self {
        Self {
            fail_mutations: true,
            ..Default::default()
        }
    }

    pub fn with_mutation_delay(mut self, delay: Duration) -> Self {
        self.mutation_delay = delay;
        self
    }

    pub fn queries(&self) -> Vec<TaskQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    async fn record(&self, call: String) -> Result<(), ClientError> {
        self.mutations.lock().unwrap().push(call);
        tokio::time::sleep(self.mutation_delay).await;
        if self.fail_mutations {
            Err(ClientError::Server {
                status: 500,
                message: "boom".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskApi for FakeTaskApi {
    async fn list(&self, query: &TaskQuery) -> Result<TaskPage, ClientError> {
        self.queries.lock().unwrap().push(query.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(scripted) => {
                tokio::time::sleep(scripted.delay).await;
                scripted.result
            }
            None => Ok(TaskPage::default()),
        }
    }

    async fn create(&self, task: &NewTask) -> Result<(), ClientError> {
        self.record(format!("create:{}", task.title)).await
    }

    async fn update(&self, id: &str, _patch: &TaskPatch) -> Result<(), ClientError> {
        self.record(format!("update:{id}")).await
    }

    async fn toggle(&self, id: &str) -> Result<(), ClientError> {
        self.record(format!("toggle:{id}")).await
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.record(format!("delete:{id}")).await
    }
}
