//! Transaction domain entity.
//!
//! Upstream records are loosely typed and name the same field several ways.
//! They are mapped once, at the API boundary, into [`Transaction`].

use crate::utils::lenient::{self, decimal_from_value};
use bigdecimal::BigDecimal;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Placeholder shown for missing text fields.
pub const MISSING: &str = "-";
pub const DEFAULT_CURRENCY: &str = "ETB";

const ID_KEYS: &[&str] = &["id", "transactionId", "transaction_id"];
const CAUSE_KEYS: &[&str] = &["cause", "note", "description"];
const CREATED_AT_KEYS: &[&str] = &[
    "created_at_time",
    "createdAt",
    "created_at",
    "date",
    "timestamp",
];

/// When a transaction was created, as the upstream reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Unix time in seconds.
    Unix(i64),
    Text(String),
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Incoming => "Incoming",
            Direction::Outgoing => "Outgoing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub sender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_account: Option<String>,
    pub receiver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_account: Option<String>,
    #[serde(serialize_with = "lenient::serialize_decimal")]
    #[schema(value_type = f64)]
    pub amount: BigDecimal,
    pub currency: String,
    pub cause: String,
    /// Unix seconds (number), a date string, or null when missing.
    #[schema(value_type = Option<Object>, example = json!(1700000000))]
    pub created_at: Timestamp,
}

impl Transaction {
    pub fn from_upstream(raw: &Value) -> Self {
        let id = first_text(raw, ID_KEYS).unwrap_or_else(|| MISSING.to_string());
        let (sender, sender_account) = party(raw, "sender");
        let (receiver, receiver_account) = party(raw, "receiver");

        let amount = first_truthy(raw, &["amount"])
            .and_then(decimal_from_value)
            .unwrap_or_default();
        let currency = first_text(raw, &["currency"])
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let cause = first_text(raw, CAUSE_KEYS).unwrap_or_else(|| MISSING.to_string());

        let created_at = match first_truthy(raw, CREATED_AT_KEYS) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .map(Timestamp::Unix)
                .unwrap_or(Timestamp::Missing),
            Some(Value::String(s)) => Timestamp::Text(s.clone()),
            _ => Timestamp::Missing,
        };

        Self {
            id,
            sender,
            sender_account,
            receiver,
            receiver_account,
            amount,
            currency,
            cause,
            created_at,
        }
    }

    /// Money moved from the account to itself.
    pub fn is_top_up(&self) -> bool {
        let same_name = self.sender != MISSING && self.sender == self.receiver;
        let same_account = self.sender_account.is_some() && self.sender_account == self.receiver_account;
        same_name || same_account
    }

    /// Top-ups are incoming; otherwise incoming iff the receiver is the
    /// configured account.
    pub fn direction(&self, current_account_id: Option<&str>) -> Direction {
        if self.is_top_up() {
            return Direction::Incoming;
        }

        match current_account_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) if self.receiver_account.as_deref() == Some(id) || self.receiver == id => {
                Direction::Incoming
            }
            _ => Direction::Outgoing,
        }
    }
}

/// Normalized record with its direction relative to the configured account.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TransactionView {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub direction: Direction,
}

impl TransactionView {
    pub fn new(transaction: Transaction, current_account_id: Option<&str>) -> Self {
        let direction = transaction.direction(current_account_id);
        Self {
            transaction,
            direction,
        }
    }
}

/// Values the upstream uses to mean "absent": null, false, 0 and "".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn first_truthy<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| is_truthy(value))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .filter(|value| is_truthy(value))
        .find_map(as_text)
}

/// Display name and account of `sender` / `receiver`.
///
/// Name: `{role}.name`, then `{role}_name`, then `{role}` itself when it is a
/// plain value. Account: `{role}.account`, then `{role}_account`.
fn party(raw: &Value, role: &str) -> (String, Option<String>) {
    let nested = raw.get(role);

    let name = nested
        .and_then(|p| p.get("name"))
        .filter(|v| is_truthy(v))
        .and_then(as_text)
        .or_else(|| {
            raw.get(format!("{}_name", role))
                .filter(|v| is_truthy(v))
                .and_then(as_text)
        })
        .or_else(|| nested.filter(|v| is_truthy(v)).and_then(as_text))
        .unwrap_or_else(|| MISSING.to_string());

    let account = nested
        .and_then(|p| p.get("account"))
        .and_then(as_text)
        .or_else(|| raw.get(format!("{}_account", role)).and_then(as_text));

    (name, account)
}
