use crate::domain::{Direction, Transaction, TransactionView};
use crate::handlers;
use crate::health::{DependencyStatus, HealthResponse};
use crate::schemas::{
    ErrorResponse, LivenessResponse, SearchRequest, SearchResponse, TransactionListResponse,
};
use utoipa::OpenApi;

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root,
        handlers::health,
        handlers::transactions::list_transactions,
        handlers::transactions::search_transactions,
        handlers::dashboard::dashboard,
    ),
    components(
        schemas(
            Transaction,
            TransactionView,
            Direction,
            TransactionListResponse,
            SearchRequest,
            SearchResponse,
            LivenessResponse,
            ErrorResponse,
            HealthResponse,
            DependencyStatus,
        )
    ),
    info(
        title = "YaYa Wallet Transaction Dashboard API",
        description = "Signed proxy over the YaYa Wallet transaction API with local pagination"
    ),
    tags(
        (name = "Health", description = "Liveness and dependency health"),
        (name = "Transactions", description = "Listing and search"),
        (name = "Dashboard", description = "Server-rendered transaction table"),
    )
)]
pub struct ApiDoc;
