//! Backend request and response types.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every backend response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

/// Error details in a failed envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub tg_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub default_database_id: Option<String>,
    #[serde(default)]
    pub notion_connected: Option<bool>,
}

/// Result of `GET /auth/status`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthStatus {
    pub user: UserProfile,
    #[serde(default)]
    pub notion_connected: bool,
    #[serde(default)]
    pub pending_sync_count: Option<u64>,
    #[serde(default)]
    pub redirect_hint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NotionAuthUrl {
    pub url: String,
}

/// Notion sync state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SyncStatus {
    Synced,
    Pending,
    Failed,
}

/// Chat message captured when a task was created.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskContextSnapshot {
    #[serde(rename = "ID")]
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub author: Option<String>,
    pub text: String,
    pub created_at: String,
}

/// A task as the backend serializes it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(rename = "ID")]
    pub id: String,
    pub title: String,
    pub status: String,
    pub sync_status: SyncStatus,
    #[serde(rename = "DatabaseID", default)]
    pub database_id: Option<String>,
    #[serde(rename = "NotionURL", default)]
    pub notion_url: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "ChatJumpURL", default)]
    pub chat_jump_url: Option<String>,
    #[serde(default)]
    pub snapshots: Vec<TaskContextSnapshot>,
    #[serde(default)]
    pub assignees: Vec<serde_json::Value>,
}

/// List item wrapper used by `GET /tasks`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskDetail {
    pub task: Task,
}

/// `{"items": [...]}` wrapper used by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Query parameters for `GET /tasks`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListTasksParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `PATCH /tasks/{id}`.
///
/// `due_at: Some(None)` sends `null` and clears the due date.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatchTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<Option<String>>,
}

/// Body of `PATCH /me/settings`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateSettingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_database_id: Option<String>,
}

/// Binding state of a Telegram group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum GroupStatus {
    Connected,
    Unbound,
    Inactive,
    #[serde(other)]
    Unknown,
}

/// The caller's role in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum GroupRole {
    Admin,
    Member,
    #[serde(other)]
    Unknown,
}

/// A Notion database the user can bind.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A Telegram group the user belongs to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    pub status: GroupStatus,
    #[serde(default)]
    pub db: Option<DatabaseSummary>,
    pub role: GroupRole,
}

/// Result of binding or unbinding a group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupBinding {
    pub group_id: String,
    #[serde(default)]
    pub db_id: Option<String>,
    pub status: GroupStatus,
}

/// Body of the group bind and database validate/init calls.
#[derive(Debug, Clone, Serialize)]
pub struct BindGroupRequest {
    pub db_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl BindGroupRequest {
    pub fn new(db_id: impl Into<String>) -> Self {
        Self {
            db_id: db_id.into(),
            mode: None,
        }
    }
}

/// Whether a Notion database has the properties tasks need.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(alias = "valid", default)]
    pub compatible: bool,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(alias = "missing_properties", default)]
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Outcome of creating missing properties in a Notion database.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InitResult {
    pub initialized: bool,
    #[serde(alias = "created_properties", default)]
    pub created_fields: Vec<String>,
}

/// A comment on a task.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Comment {
    pub id: String,
    pub task_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

/// Body of `POST /tasks/{id}/comments`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_uses_backend_field_names() {
        let task: Task = serde_json::from_value(json!({
            "ID": "t1",
            "Title": "Ship it",
            "Status": "To Do",
            "SyncStatus": "Pending",
            "DatabaseID": "db1",
            "CreatedAt": "2024-01-01T00:00:00Z",
            "Snapshots": [
                {"ID": "s1", "Role": "me", "Text": "do it", "CreatedAt": "2024-01-01T00:00:00Z"}
            ]
        }))
        .unwrap();

        assert_eq!(task.id, "t1");
        assert_eq!(task.sync_status, SyncStatus::Pending);
        assert_eq!(task.database_id.as_deref(), Some("db1"));
        assert_eq!(task.notion_url, None);
        assert_eq!(task.snapshots[0].role, "me");
        assert!(task.assignees.is_empty());
    }

    #[test]
    fn test_patch_clears_due_date_with_null() {
        let clear = PatchTaskRequest {
            due_at: Some(None),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&clear).unwrap(), json!({"due_at": null}));

        let status_only = PatchTaskRequest {
            status: Some("Done".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&status_only).unwrap(), json!({"status": "Done"}));
    }

    #[test]
    fn test_auth_status_tolerates_extra_user_fields() {
        let status: AuthStatus = serde_json::from_value(json!({
            "user": {"id": "u1", "tg_id": 42, "name": "Ann", "username": "ann", "telegram_photo": ""},
            "notion_connected": false,
            "pending_sync_count": 0,
            "redirect_hint": null
        }))
        .unwrap();

        assert_eq!(status.user.tg_id, Some(42));
        assert!(!status.notion_connected);
        assert_eq!(status.redirect_hint, None);
    }

    #[test]
    fn test_group_tolerates_unknown_status() {
        let group: Group = serde_json::from_value(json!({
            "id": "g1",
            "title": "Ops",
            "status": "Archived",
            "db": {"id": "db1", "name": "Tasks", "workspace": "Acme"},
            "role": "Admin"
        }))
        .unwrap();

        assert_eq!(group.status, GroupStatus::Unknown);
        assert_eq!(group.role, GroupRole::Admin);
        assert_eq!(group.db.unwrap().workspace.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_validation_result_accepts_both_spellings() {
        let backend: ValidationResult = serde_json::from_value(json!({
            "id": "db1",
            "name": "Tasks",
            "required_fields": ["Status"],
            "missing_fields": ["Status"],
            "compatible": false
        }))
        .unwrap();
        assert!(!backend.compatible);
        assert_eq!(backend.missing_fields, vec!["Status"]);

        let web: ValidationResult = serde_json::from_value(json!({
            "valid": true,
            "missing_properties": [],
            "name": "Tasks"
        }))
        .unwrap();
        assert!(web.compatible);
    }

    #[test]
    fn test_init_result_alias() {
        let result: InitResult = serde_json::from_value(json!({
            "initialized": true,
            "created_properties": ["Due"]
        }))
        .unwrap();
        assert_eq!(result.created_fields, vec!["Due"]);
    }

    #[test]
    fn test_bind_request_omits_mode() {
        let body = serde_json::to_value(BindGroupRequest::new("db1")).unwrap();
        assert_eq!(body, json!({"db_id": "db1"}));
    }
}
