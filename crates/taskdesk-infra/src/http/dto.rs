//! Wire types for the REST API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use taskdesk_core::domain::{
    NewTask, Task, TaskPatch, TaskPriority, TaskQuery, TaskStatus, User,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The confirmation field is checked locally and never sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of both `/auth/refresh` and `/auth/logout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub user: User,
}

/// Query string of `GET /tasks`. Empty criteria are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListParams {
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// Blank criteria are left out; search text is sent trimmed.
impl From<&TaskQuery> for TaskListParams {
    fn from(query: &TaskQuery) -> Self {
        let search = query.search.trim();
        Self {
            page: query.page,
            limit: query.limit,
            status: query.status,
            search: (!search.is_empty()).then(|| search.to_string()),
            sort: query.sort.as_param().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub total: u64,
}

/// `dueDate` is always present, `null` when the task has none.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}

impl From<&NewTask> for CreateTaskRequest {
    fn from(task: &NewTask) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date,
        }
    }
}

/// Partial update. Untouched fields are omitted; cleared ones are sent as `null`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl From<&TaskPatch> for UpdateTaskRequest {
    fn from(patch: &TaskPatch) -> Self {
        Self {
            title: patch.title.clone(),
            description: patch.description.clone(),
            priority: patch.priority,
            due_date: patch.due_date,
        }
    }
}

/// Error body returned by the server. `message` is a string, or a list of
/// strings for request validation failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> Option<String> {
        let message = match self.message {
            Some(Value::String(s)) => Some(s),
            Some(Value::Array(items)) => {
                let parts: Vec<String> = items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        };
        message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskdesk_core::domain::SortKey;

    #[test]
    fn test_list_params_skip_empty_criteria() {
        let mut query = TaskQuery::new(5);
        query.search = "   ".to_string();

        let params = TaskListParams::from(&query);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"page": 1, "limit": 5})
        );

        query.status = Some(TaskStatus::Completed);
        query.search = " milk ".to_string();
        query.sort = SortKey::Due;
        assert_eq!(
            serde_json::to_value(TaskListParams::from(&query)).unwrap(),
            json!({"page": 1, "limit": 5, "status": "COMPLETED", "search": "milk", "sort": "due"})
        );
    }

    #[test]
    fn test_create_request_sends_null_due_date() {
        let body = CreateTaskRequest::from(&NewTask::new("Buy milk"));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"title": "Buy milk", "dueDate": null})
        );

        let task = NewTask::new("Ship")
            .with_priority(TaskPriority::High)
            .with_due_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(
            serde_json::to_value(CreateTaskRequest::from(&task)).unwrap(),
            json!({"title": "Ship", "priority": "HIGH", "dueDate": "2026-03-01"})
        );
    }

    #[test]
    fn test_update_request_distinguishes_cleared_from_untouched() {
        let patch = TaskPatch {
            priority: Some(TaskPriority::Medium),
            due_date: Some(None),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(UpdateTaskRequest::from(&patch)).unwrap(),
            json!({"priority": "MEDIUM", "dueDate": null})
        );
    }

    #[test]
    fn test_error_body_message_shapes() {
        let body: ApiErrorBody = serde_json::from_value(json!({"message": "Task not found"})).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Task not found"));

        let body: ApiErrorBody =
            serde_json::from_value(json!({"message": ["title should not be empty", "bad date"]}))
                .unwrap();
        assert_eq!(
            body.into_message().as_deref(),
            Some("title should not be empty, bad date")
        );

        let body: ApiErrorBody = serde_json::from_value(json!({"error": "Conflict"})).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Conflict"));

        assert_eq!(ApiErrorBody::default().into_message(), None);
    }
}
