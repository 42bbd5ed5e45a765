//! Listing and search over the wallet API, re-paginated locally.

use crate::domain::{Transaction, TransactionView};
use crate::services::aggregator::TransactionAggregator;
use crate::utils::pagination::{PageMeta, PageRequest};
use crate::yaya::{YayaClient, YayaError};
use bigdecimal::BigDecimal;
use tracing::info;

/// One locally paginated page of normalized transactions.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub meta: PageMeta,
    pub sums: Option<Sums>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sums {
    pub incoming: BigDecimal,
    pub outgoing: BigDecimal,
}

impl TransactionPage {
    pub fn views(&self, current_account_id: Option<&str>) -> Vec<TransactionView> {
        self.transactions
            .iter()
            .cloned()
            .map(|tx| TransactionView::new(tx, current_account_id))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct TransactionService {
    client: YayaClient,
    aggregator: TransactionAggregator,
}

impl TransactionService {
    pub fn new(client: YayaClient, aggregator: TransactionAggregator) -> Self {
        Self { client, aggregator }
    }

    /// Aggregates every upstream page, then slices out the requested page.
    /// Metadata reflects the aggregated count, not the upstream total.
    pub async fn list(&self, request: PageRequest) -> Result<TransactionPage, YayaError> {
        let aggregate = self.aggregator.fetch_all(&self.client).await?;

        let meta = PageMeta::new(request, aggregate.data.len());
        let transactions = request
            .slice(&aggregate.data)
            .iter()
            .map(Transaction::from_upstream)
            .collect();

        info!(
            pages_fetched = aggregate.pages_fetched,
            aggregated = meta.total,
            upstream_total = aggregate.upstream_total,
            page = request.page,
            limit = request.limit,
            "Listed transactions"
        );

        Ok(TransactionPage {
            transactions,
            meta,
            sums: Some(Sums {
                incoming: aggregate.incoming_sum,
                outgoing: aggregate.outgoing_sum,
            }),
        })
    }

    /// One upstream search call, paginated in memory.
    pub async fn search(
        &self,
        query: &str,
        request: PageRequest,
    ) -> Result<TransactionPage, YayaError> {
        let results = self.client.search(query).await?.data;

        let meta = PageMeta::new(request, results.len());
        let transactions: Vec<Transaction> = request
            .slice(&results)
            .iter()
            .map(Transaction::from_upstream)
            .collect();

        info!(
            query = %query,
            results = results.len(),
            page = request.page,
            limit = request.limit,
            returned = transactions.len(),
            "Searched transactions"
        );

        Ok(TransactionPage {
            transactions,
            meta,
            sums: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use crate::services::aggregator::SumsSource;
    use crate::yaya::client::{FIND_BY_USER_PATH, SEARCH_PATH};
    use mockito::Matcher;
    use serde_json::json;

    fn service(base_url: String) -> TransactionService {
        let client = YayaClient::new(&UpstreamConfig {
            base_url,
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        });
        TransactionService::new(client, TransactionAggregator::new(10, SumsSource::FirstPage))
    }

    fn page_body(ids: std::ops::Range<usize>, last_page: u32, incoming: u32) -> String {
        let data: Vec<_> = ids.map(|i| json!({ "id": format!("tx-{}", i) })).collect();
        json!({
            "data": data,
            "total": 13,
            "lastPage": last_page,
            "incomingSum": incoming,
            "outgoingSum": 5
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_list_second_page_of_aggregate() {
        let mut server = mockito::Server::new_async().await;

        let first = server
            .mock("GET", FIND_BY_USER_PATH)
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(page_body(1..11, 2, 100))
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", FIND_BY_USER_PATH)
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(page_body(11..14, 2, 999))
            .expect(1)
            .create_async()
            .await;

        let page = service(server.url())
            .list(PageRequest::new(Some(2), Some(10)))
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;

        let ids: Vec<&str> = page.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tx-11", "tx-12", "tx-13"]);
        assert_eq!(page.meta.total, 13);
        assert_eq!(page.meta.total_pages, 2);
        assert!(page.meta.is_last_page);

        let sums = page.sums.unwrap();
        assert_eq!(sums.incoming, BigDecimal::from(100));
        assert_eq!(sums.outgoing, BigDecimal::from(5));
    }

    #[tokio::test]
    async fn test_search_paginates_in_memory() {
        let mut server = mockito::Server::new_async().await;

        let data: Vec<_> = (0..25).map(|i| json!({ "id": i })).collect();
        let mock = server
            .mock("POST", SEARCH_PATH)
            .match_body(Matcher::Json(json!({ "query": "coffee" })))
            .with_status(200)
            .with_body(json!({ "data": data }).to_string())
            .expect(1)
            .create_async()
            .await;

        let page = service(server.url())
            .search("coffee", PageRequest::new(Some(3), Some(10)))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.transactions.len(), 5);
        assert_eq!(page.transactions[0].id, "20");
        assert_eq!(page.meta.total, 25);
        assert_eq!(page.meta.total_pages, 3);
        assert!(page.sums.is_none());
    }

    #[tokio::test]
    async fn test_search_error_is_returned() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", SEARCH_PATH)
            .with_status(500)
            .with_body(r#"{"error":"upstream down"}"#)
            .create_async()
            .await;

        let err = service(server.url())
            .search("x", PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.details()["error"], "upstream down");
    }
}
