use serde::Serialize;
use serde_json::Value;
use shared::types::{ApiResponse, ClientRecord, CommissionRecord, ListQuery, Page, ReceiveRecord};

use crate::http::{ApiError, HttpClient};

type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

// Clients

pub async fn list_clients(http: &HttpClient, query: &ListQuery) -> ApiResult<Page<ClientRecord>> {
    http.get("/samples/clients/", query.to_pairs()).await
}

pub async fn get_client(http: &HttpClient, id: i64) -> ApiResult<ClientRecord> {
    http.get(&format!("/samples/clients/{}/", id), Vec::new()).await
}

pub async fn create_client<B: Serialize>(http: &HttpClient, data: &B) -> ApiResult<ClientRecord> {
    http.post("/samples/clients/", data).await
}

pub async fn update_client<B: Serialize>(
    http: &HttpClient,
    id: i64,
    data: &B,
) -> ApiResult<ClientRecord> {
    http.put(&format!("/samples/clients/{}/", id), data).await
}

pub async fn delete_client(http: &HttpClient, id: i64) -> ApiResult<Value> {
    http.delete(&format!("/samples/clients/{}/", id)).await
}

// Commissions

pub async fn list_commissions(
    http: &HttpClient,
    query: &ListQuery,
) -> ApiResult<Page<CommissionRecord>> {
    http.get("/samples/commissions/", query.to_pairs()).await
}

pub async fn get_commission(http: &HttpClient, id: i64) -> ApiResult<CommissionRecord> {
    http.get(&format!("/samples/commissions/{}/", id), Vec::new())
        .await
}

pub async fn create_commission<B: Serialize>(
    http: &HttpClient,
    data: &B,
) -> ApiResult<CommissionRecord> {
    http.post("/samples/commissions/", data).await
}

pub async fn update_commission<B: Serialize>(
    http: &HttpClient,
    id: i64,
    data: &B,
) -> ApiResult<CommissionRecord> {
    http.put(&format!("/samples/commissions/{}/", id), data).await
}

pub async fn delete_commission(http: &HttpClient, id: i64) -> ApiResult<Value> {
    http.delete(&format!("/samples/commissions/{}/", id)).await
}

/// Draft -> submitted. The server rejects anything else.
pub async fn submit_commission(http: &HttpClient, id: i64) -> ApiResult<CommissionRecord> {
    http.post_empty(&format!("/samples/commissions/{}/submit/", id))
        .await
}

pub async fn cancel_commission(http: &HttpClient, id: i64) -> ApiResult<CommissionRecord> {
    http.post_empty(&format!("/samples/commissions/{}/cancel/", id))
        .await
}

// Receives

pub async fn list_receives(http: &HttpClient, query: &ListQuery) -> ApiResult<Page<ReceiveRecord>> {
    http.get("/samples/receives/", query.to_pairs()).await
}

pub async fn get_receive(http: &HttpClient, id: i64) -> ApiResult<ReceiveRecord> {
    http.get(&format!("/samples/receives/{}/", id), Vec::new()).await
}

pub async fn create_receive<B: Serialize>(http: &HttpClient, data: &B) -> ApiResult<ReceiveRecord> {
    http.post("/samples/receives/", data).await
}
