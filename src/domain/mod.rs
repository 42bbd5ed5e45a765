pub mod transaction;

pub use transaction::{Direction, Timestamp, Transaction, TransactionView};
