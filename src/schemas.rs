use crate::domain::TransactionView;
use crate::utils::lenient;
use crate::utils::pagination::{PageMeta, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// `?p=&limit=` on the listing endpoint. Non-numeric values fall back to the
/// defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number (default 1)
    #[serde(default, deserialize_with = "lenient::deserialize_opt_u32")]
    pub p: Option<u32>,
    /// Page size (default 10)
    #[serde(default, deserialize_with = "lenient::deserialize_opt_u32")]
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.p, self.limit)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    /// Number or numeric string
    #[serde(default, deserialize_with = "lenient::deserialize_opt_u32")]
    pub p: Option<u32>,
    #[serde(default, deserialize_with = "lenient::deserialize_opt_u32")]
    pub limit: Option<u32>,
}

impl SearchRequest {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.p, self.limit)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListResponse {
    pub data: Vec<TransactionView>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
    /// Whether `page` is the last local page.
    pub last_page: bool,
    pub per_page: u32,
    pub incoming_sum: f64,
    pub outgoing_sum: f64,
    pub current_user_account_id: Option<String>,
}

impl TransactionListResponse {
    pub fn new(
        data: Vec<TransactionView>,
        meta: PageMeta,
        incoming_sum: f64,
        outgoing_sum: f64,
        current_user_account_id: Option<String>,
    ) -> Self {
        Self {
            data,
            total: meta.total,
            page: meta.page,
            limit: meta.limit,
            total_pages: meta.total_pages,
            last_page: meta.is_last_page,
            per_page: meta.limit,
            incoming_sum,
            outgoing_sum,
            current_user_account_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub data: Vec<TransactionView>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
    pub current_user_account_id: Option<String>,
}

impl SearchResponse {
    pub fn new(
        data: Vec<TransactionView>,
        meta: PageMeta,
        current_user_account_id: Option<String>,
    ) -> Self {
        Self {
            data,
            total: meta.total,
            page: meta.page,
            limit: meta.limit,
            total_pages: meta.total_pages,
            current_user_account_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LivenessResponse {
    pub message: String,
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}
