use serde::Serialize;
use serde_json::Value;
use shared::types::{
    ApiResponse, ChangePasswordData, Department, ListQuery, LoginData, LoginPayload, LogoutData,
    Page, RegistrationData, ResetPasswordData, UserProfile,
};

use crate::http::{ApiError, HttpClient};

type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

pub async fn login(http: &HttpClient, credentials: &LoginData) -> ApiResult<LoginPayload> {
    http.post("/users/auth/login/", credentials).await
}

pub async fn logout(http: &HttpClient, body: &LogoutData) -> ApiResult<Value> {
    http.post("/users/auth/logout/", body).await
}

pub async fn register(http: &HttpClient, data: &RegistrationData) -> ApiResult<UserProfile> {
    http.post("/users/auth/register/", data).await
}

// ---------------------------------------------------------------------------
// Current user
// ---------------------------------------------------------------------------

pub async fn get_user_info(http: &HttpClient) -> ApiResult<UserProfile> {
    http.get("/users/me/", Vec::new()).await
}

pub async fn update_user_info<B: Serialize>(http: &HttpClient, data: &B) -> ApiResult<UserProfile> {
    http.put("/users/me/", data).await
}

pub async fn change_password(http: &HttpClient, data: &ChangePasswordData) -> ApiResult<Value> {
    http.post("/users/change_password/", data).await
}

// ---------------------------------------------------------------------------
// User management
// ---------------------------------------------------------------------------

pub async fn list_users(http: &HttpClient, query: &ListQuery) -> ApiResult<Page<UserProfile>> {
    http.get("/users/", query.to_pairs()).await
}

pub async fn create_user(http: &HttpClient, data: &RegistrationData) -> ApiResult<UserProfile> {
    http.post("/users/", data).await
}

pub async fn update_user<B: Serialize>(http: &HttpClient, id: i64, data: &B) -> ApiResult<UserProfile> {
    http.put(&format!("/users/{}/", id), data).await
}

pub async fn delete_user(http: &HttpClient, id: i64) -> ApiResult<Value> {
    http.delete(&format!("/users/{}/", id)).await
}

pub async fn reset_user_password(
    http: &HttpClient,
    id: i64,
    data: &ResetPasswordData,
) -> ApiResult<Value> {
    http.post(&format!("/users/{}/reset_password/", id), data).await
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

pub async fn list_departments(http: &HttpClient, query: &ListQuery) -> ApiResult<Page<Department>> {
    http.get("/users/departments/", query.to_pairs()).await
}

pub async fn department_tree(http: &HttpClient) -> ApiResult<Vec<Department>> {
    http.get("/users/departments/tree/", Vec::new()).await
}

pub async fn create_department<B: Serialize>(http: &HttpClient, data: &B) -> ApiResult<Department> {
    http.post("/users/departments/", data).await
}

pub async fn update_department<B: Serialize>(
    http: &HttpClient,
    id: i64,
    data: &B,
) -> ApiResult<Department> {
    http.put(&format!("/users/departments/{}/", id), data).await
}

pub async fn delete_department(http: &HttpClient, id: i64) -> ApiResult<Value> {
    http.delete(&format!("/users/departments/{}/", id)).await
}
