pub mod aggregator;
pub mod transactions;

pub use aggregator::{AggregateResult, PageSource, SumsSource, TransactionAggregator};
pub use transactions::{Sums, TransactionPage, TransactionService};
