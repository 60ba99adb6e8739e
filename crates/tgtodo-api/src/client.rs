//! Backend API client.

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tgtodo_core::config;
use tgtodo_initdata::InitDataResolver;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, Result};
use crate::types::{
    ApiResponse, AuthStatus, BindGroupRequest, Comment, CreateCommentRequest, CreateTaskRequest,
    DatabaseSummary, Group, GroupBinding, InitResult, ItemList, ListTasksParams, NotionAuthUrl,
    PatchTaskRequest, Task, TaskDetail, UpdateSettingsRequest, UserProfile, ValidationResult,
};

/// Header carrying the Telegram launch payload.
pub const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

/// tg-todo backend client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    resolver: Arc<InitDataResolver>,
}

impl ApiClient {
    /// Create a client for `base_url` (normalized to end in `/api`).
    pub fn new(base_url: &str, resolver: Arc<InitDataResolver>) -> Result<Self> {
        let normalized = config::normalize_base_url(base_url);
        let base_url = match Url::parse(&normalized) {
            Ok(url) if !url.cannot_be_a_base() => url,
            _ => return Err(ApiError::InvalidBaseUrl(normalized)),
        };
        let http = reqwest::Client::builder()
            .timeout(config::API_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            resolver,
        })
    }

    /// Create a client for the configured backend.
    ///
    /// Uses `TGTODO_API_BASE_URL`, falling back to the local default.
    pub fn from_env(resolver: Arc<InitDataResolver>) -> Result<Self> {
        Self::new(&config::api_base_url(), resolver)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `GET /auth/status`, forwarding the deep-link start parameter.
    ///
    /// Refuses locally when no init data resolves.
    pub async fn auth_status(&self, start_param: Option<&str>) -> Result<AuthStatus> {
        self.require_init_data()?;
        let mut request = self.request(Method::GET, &["auth", "status"]);
        if let Some(start_param) = start_param.filter(|p| !p.is_empty()) {
            request = request.query(&[("start_param", start_param)]);
        }
        self.send(request).await
    }

    /// `GET /auth/notion/url`: the Notion OAuth link for this user.
    pub async fn notion_auth_url(&self) -> Result<String> {
        self.require_init_data()?;
        let link: NotionAuthUrl = self.send(self.request(Method::GET, &["auth", "notion", "url"])).await?;
        Ok(link.url)
    }

    pub async fn me(&self) -> Result<UserProfile> {
        self.send(self.request(Method::GET, &["me"])).await
    }

    pub async fn update_settings(&self, settings: &UpdateSettingsRequest) -> Result<UserProfile> {
        self.send(self.request(Method::PATCH, &["me", "settings"]).json(settings))
            .await
    }

    pub async fn list_tasks(&self, params: &ListTasksParams) -> Result<Vec<TaskDetail>> {
        let list: ItemList<TaskDetail> = self
            .send(self.request(Method::GET, &["tasks"]).query(params))
            .await?;
        Ok(list.items)
    }

    pub async fn get_task(&self, id: &str) -> Result<Task> {
        self.send(self.request(Method::GET, &["tasks", id]))
            .await
    }

    pub async fn create_task(&self, task: &CreateTaskRequest) -> Result<Task> {
        self.send(self.request(Method::POST, &["tasks"]).json(task))
            .await
    }

    /// Change title, status or due date.
    pub async fn patch_task(&self, id: &str, patch: &PatchTaskRequest) -> Result<Task> {
        self.send(self.request(Method::PATCH, &["tasks", id]).json(patch))
            .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let _: Option<serde_json::Value> = self
            .send_envelope(self.request(Method::DELETE, &["tasks", id]))
            .await?;
        Ok(())
    }

    pub async fn list_comments(&self, task_id: &str) -> Result<Vec<Comment>> {
        let comments: Option<Vec<Comment>> = self
            .send_envelope(self.request(Method::GET, &["tasks", task_id, "comments"]))
            .await?;
        Ok(comments.unwrap_or_default())
    }

    pub async fn create_comment(
        &self,
        task_id: &str,
        comment: &CreateCommentRequest,
    ) -> Result<Comment> {
        self.send(
            self.request(Method::POST, &["tasks", task_id, "comments"])
                .json(comment),
        )
        .await
    }

    /// Groups the user shares with the bot.
    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        let list: ItemList<Group> = self.send(self.request(Method::GET, &["groups"])).await?;
        Ok(list.items)
    }

    /// Bind a group to a Notion database. Admins only.
    pub async fn bind_group(&self, group_id: &str, db_id: &str) -> Result<GroupBinding> {
        self.send(
            self.request(Method::POST, &["groups", group_id, "bind"])
                .json(&BindGroupRequest::new(db_id)),
        )
        .await
    }

    pub async fn unbind_group(&self, group_id: &str) -> Result<GroupBinding> {
        self.send(self.request(Method::POST, &["groups", group_id, "unbind"]))
            .await
    }

    /// Check that a database has the properties tasks need before binding.
    pub async fn validate_group_database(
        &self,
        group_id: &str,
        db_id: &str,
    ) -> Result<ValidationResult> {
        self.send(
            self.request(Method::POST, &["groups", group_id, "db", "validate"])
                .json(&BindGroupRequest::new(db_id)),
        )
        .await
    }

    /// Create the missing task properties in a database.
    pub async fn init_group_database(&self, group_id: &str, db_id: &str) -> Result<InitResult> {
        self.send(
            self.request(Method::POST, &["groups", group_id, "db", "init"])
                .json(&BindGroupRequest::new(db_id)),
        )
        .await
    }

    /// Notion databases visible to the user, optionally filtered by name.
    pub async fn list_databases(&self, search: Option<&str>) -> Result<Vec<DatabaseSummary>> {
        let mut request = self.request(Method::GET, &["databases"]);
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            request = request.query(&[("search", search)]);
        }
        let list: ItemList<DatabaseSummary> = self.send(request).await?;
        Ok(list.items)
    }

    fn require_init_data(&self) -> Result<()> {
        match self.resolver.resolve() {
            Some(_) => Ok(()),
            None => Err(ApiError::MissingInitData),
        }
    }

    /// Start a request with the init data header attached when available.
    ///
    /// Each segment is percent-encoded, so ids cannot add path components.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        debug!(method = %method, url = %url, "Requesting");

        let request = self
            .http
            .request(method, url.clone())
            .header(ACCEPT, "application/json");
        match self.resolver.resolve() {
            Some(init_data) => request.header(INIT_DATA_HEADER, init_data.as_str()),
            None => {
                warn!(path = url.path(), "No init data found for request");
                request
            }
        }
    }

    /// Send and unwrap `data`, which must be present.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let data = self.send_envelope(request).await?;
        data.ok_or_else(|| ApiError::Rejected {
            code: None,
            message: "response carried no data".to_string(),
        })
    }

    async fn send_envelope<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_response(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            let error = envelope.error.unwrap_or_default();
            return Err(ApiError::Rejected {
                code: error.code,
                message: error.message.unwrap_or_else(|| "request failed".to_string()),
            });
        }
        Ok(envelope.data)
    }
}
