//! Aggregation loop over the upstream `find-by-user` listing.
//!
//! The upstream API paginates server-side; the dashboard re-paginates locally,
//! so every listing request first walks the upstream pages and concatenates
//! them. The walk is bounded by `max_pages` so a misbehaving upstream that
//! keeps reporting more pages cannot hold a request open forever.

use crate::yaya::{UpstreamPage, YayaClient, YayaError};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, warn};

pub const DEFAULT_MAX_PAGES: u32 = 10;

/// Which upstream page(s) the incoming/outgoing sums are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SumsSource {
    /// Sums reported with page 1. The upstream reports account-wide sums on
    /// every page, and page 1 is the only one that is always fetched.
    #[default]
    FirstPage,
    /// Sums reported with the last page fetched.
    LastPage,
    /// Sums added up across every page fetched.
    Summed,
}

impl SumsSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstPage => "first",
            Self::LastPage => "last",
            Self::Summed => "summed",
        }
    }
}

impl FromStr for SumsSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" | "first_page" => Ok(Self::FirstPage),
            "last" | "last_page" => Ok(Self::LastPage),
            "summed" | "sum" => Ok(Self::Summed),
            other => Err(anyhow::anyhow!(
                "SUMS_SOURCE must be first, last or summed, got {:?}",
                other
            )),
        }
    }
}

/// Anything that can serve numbered pages of the user's transactions.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<UpstreamPage, YayaError>;
}

#[async_trait]
impl PageSource for YayaClient {
    async fn fetch_page(&self, page: u32) -> Result<UpstreamPage, YayaError> {
        self.find_by_user(page).await
    }
}

/// Every upstream record fetched for one listing request.
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    pub data: Vec<Value>,
    /// Total as reported by the last page fetched. Informational only;
    /// local pagination uses `data.len()`.
    pub upstream_total: u64,
    pub pages_fetched: u32,
    pub incoming_sum: BigDecimal,
    pub outgoing_sum: BigDecimal,
}

#[derive(Debug, Clone, Copy)]
pub struct TransactionAggregator {
    max_pages: u32,
    sums_source: SumsSource,
}

impl Default for TransactionAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGES, SumsSource::default())
    }
}

impl TransactionAggregator {
    pub fn new(max_pages: u32, sums_source: SumsSource) -> Self {
        Self {
            max_pages: max_pages.max(1),
            sums_source,
        }
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Walks upstream pages from 1 until the reported last page, an empty
    /// page, or the page cap, whichever comes first.
    pub async fn fetch_all<S>(&self, source: &S) -> Result<AggregateResult, YayaError>
    where
        S: PageSource + ?Sized,
    {
        let mut result = AggregateResult::default();
        let mut page = 1;

        loop {
            let upstream = source.fetch_page(page).await?;
            let item_count = upstream.data.len();
            let last_page = upstream.last_page.unwrap_or(1);

            debug!(
                page,
                items = item_count,
                last_page,
                "Fetched upstream transaction page"
            );

            match self.sums_source {
                SumsSource::FirstPage if page == 1 => {
                    result.incoming_sum = upstream.incoming_sum;
                    result.outgoing_sum = upstream.outgoing_sum;
                }
                SumsSource::FirstPage => {}
                SumsSource::LastPage => {
                    result.incoming_sum = upstream.incoming_sum;
                    result.outgoing_sum = upstream.outgoing_sum;
                }
                SumsSource::Summed => {
                    result.incoming_sum += upstream.incoming_sum;
                    result.outgoing_sum += upstream.outgoing_sum;
                }
            }

            result.upstream_total = upstream.total;
            result.data.extend(upstream.data);
            result.pages_fetched = page;

            if item_count == 0 || page >= last_page {
                break;
            }
            if page >= self.max_pages {
                warn!(
                    max_pages = self.max_pages,
                    last_page, "Upstream page cap reached, listing is truncated"
                );
                break;
            }
            page += 1;
        }

        Ok(result)
    }
}
