use serde::Serialize;
use serde_json::Value;
use shared::types::{ApiResponse, AssignData, ListQuery, Page, TransitionData};

use crate::http::{ApiError, HttpClient};

type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

// Workflow records and logs are rendered as-is, so they stay untyped.

pub async fn list_workflows(http: &HttpClient, query: &ListQuery) -> ApiResult<Page<Value>> {
    http.get("/workflow/", query.to_pairs()).await
}

pub async fn get_workflow(http: &HttpClient, id: i64) -> ApiResult<Value> {
    http.get(&format!("/workflow/{}/", id), Vec::new()).await
}

pub async fn transition(http: &HttpClient, id: i64, data: &TransitionData) -> ApiResult<Value> {
    http.post(&format!("/workflow/{}/transition/", id), data).await
}

pub async fn assign(http: &HttpClient, id: i64, data: &AssignData) -> ApiResult<Value> {
    http.post(&format!("/workflow/{}/assign/", id), data).await
}

pub async fn my_tasks(http: &HttpClient) -> ApiResult<Vec<Value>> {
    http.get("/workflow/my_tasks/", Vec::new()).await
}

pub async fn status_options(http: &HttpClient) -> ApiResult<Value> {
    http.get("/workflow/status_options/", Vec::new()).await
}

pub async fn logs(http: &HttpClient, query: &ListQuery) -> ApiResult<Page<Value>> {
    http.get("/workflow/logs/", query.to_pairs()).await
}

// Test tasks

pub async fn list_tasks(http: &HttpClient, query: &ListQuery) -> ApiResult<Page<Value>> {
    http.get("/workflow/tasks/", query.to_pairs()).await
}

pub async fn create_task<B: Serialize>(http: &HttpClient, data: &B) -> ApiResult<Value> {
    http.post("/workflow/tasks/", data).await
}

pub async fn start_task(http: &HttpClient, id: i64) -> ApiResult<Value> {
    http.post_empty(&format!("/workflow/tasks/{}/start/", id)).await
}

pub async fn complete_task(http: &HttpClient, id: i64) -> ApiResult<Value> {
    http.post_empty(&format!("/workflow/tasks/{}/complete/", id))
        .await
}
