//! Server-rendered transaction dashboard.

pub mod format;
pub mod pagination;
pub mod table;

use crate::services::TransactionPage;
use crate::utils::pagination::PageMeta;
use htmlescape::encode_minimal;
use std::fmt::Write;
use table::TransactionRow;

const STYLE: &str = r#"
body { margin: 0; padding: 20px; background: #f8fafc; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif; }
.container { max-width: 1200px; margin: 0 auto; }
.header { margin-bottom: 32px; padding: 24px; text-align: center; color: #fff; border-radius: 16px; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }
.header h1 { margin: 0 0 8px 0; font-size: 32px; }
.header p { margin: 0; opacity: 0.9; }
.card { background: #fff; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.08); margin-bottom: 20px; }
.search { display: flex; gap: 12px; padding: 16px; }
.search input { flex: 1; padding: 12px 16px; border: 2px solid #e5e7eb; border-radius: 8px; font-size: 14px; }
.search button, .search a { padding: 12px 24px; border: none; border-radius: 8px; color: #fff; font-weight: 600; text-decoration: none; background: #3b82f6; }
.search a { background: #6b7280; }
.banner { padding: 16px; border-radius: 8px; margin-bottom: 20px; font-size: 14px; }
.banner.error { background: #fef2f2; border: 1px solid #fecaca; color: #dc2626; }
.banner.info { background: #eff6ff; border: 1px solid #bfdbfe; color: #1d4ed8; }
.empty { padding: 40px; text-align: center; color: #6b7280; }
.empty-hint { color: #9ca3af; font-size: 14px; margin-top: 8px; }
.scroll { overflow-x: auto; }
table { width: 100%; min-width: 800px; border-collapse: collapse; }
th { text-align: left; padding: 16px 12px; font-size: 14px; color: #374151; background: #f8fafc; border-bottom: 2px solid #e5e7eb; }
td { padding: 16px 12px; font-size: 14px; border-bottom: 1px solid #f3f4f6; vertical-align: top; }
td.mono { font-family: monospace; font-size: 13px; }
td.amount { font-weight: 600; text-align: right; }
td.date { font-size: 13px; color: #6b7280; }
.badge { padding: 4px 12px; border-radius: 20px; font-size: 12px; font-weight: 600; }
.badge.incoming { color: #059669; background: #ecfdf5; }
.badge.outgoing { color: #dc2626; background: #fef2f2; }
.pagination { display: flex; flex-direction: column; gap: 16px; align-items: center; padding: 16px; }
.summary { font-size: 14px; color: #6b7280; }
.controls { display: flex; gap: 8px; }
.btn { padding: 8px 16px; border: 2px solid #e5e7eb; border-radius: 6px; color: #374151; text-decoration: none; font-size: 14px; }
.btn.active { background: #3b82f6; border-color: #3b82f6; color: #fff; }
.btn.disabled { background: #f9fafb; color: #9ca3af; border-color: #f3f4f6; }
footer { margin-top: 40px; text-align: center; color: #6b7280; font-size: 14px; }
"#;

/// Everything the dashboard page shows for one request.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub query: Option<String>,
    pub limit: u32,
    pub rows: Vec<TransactionRow>,
    pub meta: Option<PageMeta>,
    pub error: Option<String>,
}

impl DashboardView {
    pub fn loaded(
        page: &TransactionPage,
        query: Option<&str>,
        current_account_id: Option<&str>,
    ) -> Self {
        Self {
            query: query.map(str::to_string),
            limit: page.meta.limit,
            rows: table::rows(&page.transactions, current_account_id),
            meta: Some(page.meta),
            error: None,
        }
    }

    /// Error banner over an empty table.
    pub fn failed(message: impl Into<String>, query: Option<&str>, limit: u32) -> Self {
        Self {
            query: query.map(str::to_string),
            limit,
            rows: Vec::new(),
            meta: None,
            error: Some(message.into()),
        }
    }

    pub fn render(&self) -> String {
        let query = self.query.as_deref();
        let mut html = String::with_capacity(8 * 1024);

        let _ = write!(
            html,
            concat!(
                "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
                "<title>YaYa Wallet Transaction Dashboard</title><style>{}</style></head>",
                "<body><div class=\"container\">",
                "<div class=\"header\"><h1>YaYa Wallet Transaction Dashboard</h1>",
                "<p>Monitor and search your transaction history</p></div>"
            ),
            STYLE
        );

        html.push_str(&self.render_search_form());

        if let Some(error) = &self.error {
            let _ = write!(
                html,
                r#"<div class="banner error"><strong>Error:</strong> {}</div>"#,
                encode_minimal(error)
            );
        }

        if let Some(q) = query {
            let _ = write!(
                html,
                r#"<div class="banner info">Search results for: <strong>"{}"</strong>"#,
                encode_minimal(q)
            );
            if let Some(meta) = self.meta.filter(|m| m.total > 0) {
                let _ = write!(html, " ({} results found)", meta.total);
            }
            html.push_str("</div>");
        }

        html.push_str(&table::render_table(&self.rows));

        if let Some(meta) = &self.meta {
            if !self.rows.is_empty() {
                html.push_str(&pagination::render_pagination(meta, query));
            }
        }

        html.push_str(concat!(
            "<footer><p>YaYa Wallet Transaction Dashboard</p>",
            "<p>Requests to the wallet API are signed server-side</p></footer>",
            "</div></body></html>"
        ));
        html
    }

    fn render_search_form(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            concat!(
                r#"<form class="card search" method="get" action="/dashboard">"#,
                r#"<input type="text" name="q" value="{}" "#,
                r#"placeholder="Search by sender, receiver, cause, or transaction ID...">"#,
                r#"<input type="hidden" name="limit" value="{}">"#,
                r#"<button type="submit">Search</button>"#
            ),
            encode_minimal(self.query.as_deref().unwrap_or_default()),
            self.limit
        );
        if self.query.is_some() {
            let _ = write!(
                html,
                r#"<a href="{}">Clear</a>"#,
                encode_minimal(&pagination::page_href(1, self.limit, None))
            );
        }
        html.push_str("</form>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Transaction;
    use crate::utils::pagination::PageRequest;
    use serde_json::json;

    fn page(count: usize, request: PageRequest) -> TransactionPage {
        let all: Vec<serde_json::Value> = (0..count)
            .map(|i| json!({ "id": format!("tx-{}", i), "amount": 10 }))
            .collect();
        TransactionPage {
            transactions: request.slice(&all).iter().map(Transaction::from_upstream).collect(),
            meta: PageMeta::new(request, count),
            sums: None,
        }
    }

    #[test]
    fn test_loaded_page_renders_table_and_pagination() {
        let page = page(13, PageRequest::new(Some(2), Some(10)));
        let html = DashboardView::loaded(&page, None, None).render();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("tx-10"));
        assert!(html.contains("Showing 11 to 13 of 13 transactions"));
        assert!(!html.contains("Search results for"));
        assert!(!html.contains(">Clear</a>"));
    }

    #[test]
    fn test_search_banner_and_clear_link() {
        let page = page(3, PageRequest::default());
        let html = DashboardView::loaded(&page, Some("tea \"time\""), None).render();

        assert!(html.contains("Search results for: <strong>\"tea &quot;time&quot;\"</strong> (3 results found)"));
        assert!(html.contains(r#"value="tea &quot;time&quot;""#));
        assert!(html.contains(r#"<a href="/dashboard?p=1&amp;limit=10">Clear</a>"#));
    }

    #[test]
    fn test_empty_search_has_no_count_or_pagination() {
        let page = page(0, PageRequest::default());
        let html = DashboardView::loaded(&page, Some("nothing"), None).render();

        assert!(html.contains("No transactions found"));
        assert!(!html.contains("results found"));
        assert!(!html.contains("class=\"card pagination\""));
    }

    #[test]
    fn test_failed_view_shows_error_and_empty_state() {
        let html = DashboardView::failed("Failed to fetch transactions", None, 10).render();

        assert!(html.contains("<strong>Error:</strong> Failed to fetch transactions"));
        assert!(html.contains("No transactions found"));
        assert!(!html.contains("class=\"card pagination\""));
    }
}
