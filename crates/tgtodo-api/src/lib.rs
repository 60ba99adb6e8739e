//! HTTP client for the tg-todo backend.
//!
//! Every request carries the resolved Telegram init data in the
//! `X-Telegram-Init-Data` header; the backend verifies it and maps it to a
//! user. Requests go out without the header when nothing resolves and the
//! backend decides what to do with them.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, INIT_DATA_HEADER};
pub use error::{ApiError, Result};
pub use types::{
    ApiResponse, AuthStatus, BindGroupRequest, Comment, CreateCommentRequest, CreateTaskRequest,
    DatabaseSummary, ErrorBody, Group, GroupBinding, GroupRole, GroupStatus, InitResult,
    ListTasksParams, PatchTaskRequest, SyncStatus, Task, TaskContextSnapshot, TaskDetail,
    UpdateSettingsRequest, UserProfile, ValidationResult,
};
