use crate::error::AppError;
use crate::schemas::{ListQuery, SearchRequest, SearchResponse, TransactionListResponse};
use crate::utils::lenient::decimal_to_f64;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};

/// Every upstream page (up to the configured cap), re-paginated locally.
#[utoipa::path(
    get,
    path = "/api/transactions",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of transactions", body = TransactionListResponse),
        (status = 500, description = "Upstream call failed", body = crate::schemas::ErrorResponse)
    ),
    tag = "Transactions"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let page = state
        .transactions
        .list(query.page_request())
        .await
        .map_err(|e| AppError::upstream("Failed to fetch transactions", e))?;

    let account = state.config.current_account_id.clone();
    let (incoming, outgoing) = page
        .sums
        .as_ref()
        .map(|s| (decimal_to_f64(&s.incoming), decimal_to_f64(&s.outgoing)))
        .unwrap_or_default();

    Ok(Json(TransactionListResponse::new(
        page.views(account.as_deref()),
        page.meta,
        incoming,
        outgoing,
        account,
    )))
}

/// One upstream search, paginated in memory.
#[utoipa::path(
    post,
    path = "/api/transactions/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Page of matching transactions", body = SearchResponse),
        (status = 400, description = "Body is not a valid search request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Upstream call failed", body = crate::schemas::ErrorResponse)
    ),
    tag = "Transactions"
)]
pub async fn search_transactions(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let page = state
        .transactions
        .search(&request.query, request.page_request())
        .await
        .map_err(|e| AppError::upstream("Failed to search transactions", e))?;

    let account = state.config.current_account_id.clone();
    Ok(Json(SearchResponse::new(
        page.views(account.as_deref()),
        page.meta,
        account,
    )))
}
