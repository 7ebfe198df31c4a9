//! v1 history handlers.

use axum::extract::{Path, State};
use axum_extra::extract::Query;

use crate::api::v1::dto::{HistoryRecordResponse, ListHistoryQuery, ListHistoryResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;
use crate::db::HistoryStore;

/// `GET /api/v1/history/{userId}`
///
/// Newest first, page-numbered. Unknown users get an empty first page, not
/// an error, so a fresh install reads cleanly.
#[utoipa::path(
    get,
    path = "/api/v1/history/{userId}",
    tag = "history",
    operation_id = "history.list",
    params(
        ("userId" = String, Path, description = "User ID"),
        ("page" = Option<u32>, Query, description = "1-based page number, default 1"),
        ("limit" = Option<u32>, Query, description = "Records per page, default 15, max 100"),
    ),
    responses(
        (status = 200, description = "History page", body = ListHistoryResponse),
        (status = 500, description = "Store failure", body = ApiError),
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ListHistoryQuery>,
) -> ApiResponse<ListHistoryResponse> {
    let query = query.normalized();

    let records = match state
        .db
        .list_history(&user_id, query.page, query.limit)
        .await
    {
        Ok(records) => records,
        Err(e) => return e.into(),
    };
    let total = match state.db.count_history(&user_id).await {
        Ok(total) => total,
        Err(e) => return e.into(),
    };

    let records = records.into_iter().map(HistoryRecordResponse::from).collect();
    ApiResponse::success_with_meta(
        ListHistoryResponse { records },
        ResponseMeta {
            page: query.page,
            limit: query.limit,
            total,
        },
    )
}
