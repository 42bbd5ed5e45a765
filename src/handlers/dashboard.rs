use crate::presentation::DashboardView;
use crate::utils::lenient;
use crate::utils::pagination::PageRequest;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    #[serde(default, deserialize_with = "lenient::deserialize_opt_u32")]
    pub p: Option<u32>,
    #[serde(default, deserialize_with = "lenient::deserialize_opt_u32")]
    pub limit: Option<u32>,
    /// Search text; blank means list mode
    pub q: Option<String>,
}

impl DashboardQuery {
    fn search_text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Server-rendered transaction table. Upstream failures become an error
/// banner so the page stays usable.
#[utoipa::path(
    get,
    path = "/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard page", content_type = "text/html", body = String)
    ),
    tag = "Dashboard"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let request = PageRequest::new(query.p, query.limit);
    let search = query.search_text();
    let account = state.config.current_account_id.as_deref();

    let result = match search {
        Some(text) => state.transactions.search(text, request).await,
        None => state.transactions.list(request).await,
    };

    let view = match result {
        Ok(page) => DashboardView::loaded(&page, search, account),
        Err(e) => {
            let context = if search.is_some() {
                "Failed to search transactions"
            } else {
                "Failed to fetch transactions"
            };
            tracing::error!(error = %e, details = %e.details(), "{}", context);
            DashboardView::failed(context, search, request.limit)
        }
    };

    Html(view.render())
}
