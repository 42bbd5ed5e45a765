use crate::domain::{Direction, Transaction};
use crate::presentation::format::{format_amount, format_date};
use htmlescape::encode_minimal;
use std::fmt::Write;

const COLUMNS: [&str; 8] = [
    "Transaction ID",
    "Sender",
    "Receiver",
    "Amount",
    "Currency",
    "Cause",
    "Created At",
    "Direction",
];

/// One display row of the transaction table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub id: String,
    pub sender: String,
    pub receiver: String,
    pub amount: String,
    pub currency: String,
    pub cause: String,
    pub created_at: String,
    pub direction: Direction,
}

impl TransactionRow {
    pub fn new(tx: &Transaction, current_account_id: Option<&str>) -> Self {
        Self {
            id: tx.id.clone(),
            sender: tx.sender.clone(),
            receiver: tx.receiver.clone(),
            amount: format_amount(&tx.amount, &tx.currency),
            currency: tx.currency.clone(),
            cause: tx.cause.clone(),
            created_at: format_date(&tx.created_at),
            direction: tx.direction(current_account_id),
        }
    }
}

pub fn rows(transactions: &[Transaction], current_account_id: Option<&str>) -> Vec<TransactionRow> {
    transactions
        .iter()
        .map(|tx| TransactionRow::new(tx, current_account_id))
        .collect()
}

/// Renders the table, or the empty state when there are no rows.
pub fn render_table(rows: &[TransactionRow]) -> String {
    if rows.is_empty() {
        return concat!(
            r#"<div class="card empty">"#,
            r#"<div class="empty-title">No transactions found</div>"#,
            r#"<div class="empty-hint">Try adjusting your search criteria</div>"#,
            "</div>"
        )
        .to_string();
    }

    let mut html = String::from(r#"<div class="card"><div class="scroll"><table><thead><tr>"#);
    for column in COLUMNS {
        let _ = write!(html, "<th>{}</th>", column);
    }
    html.push_str("</tr></thead><tbody>");

    for row in rows {
        let direction_class = match row.direction {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
        };
        let _ = write!(
            html,
            concat!(
                "<tr>",
                r#"<td class="mono">{}</td>"#,
                "<td>{}</td>",
                "<td>{}</td>",
                r#"<td class="amount">{}</td>"#,
                r#"<td class="currency">{}</td>"#,
                "<td>{}</td>",
                r#"<td class="date">{}</td>"#,
                r#"<td><span class="badge {}">{}</span></td>"#,
                "</tr>"
            ),
            encode_minimal(&row.id),
            encode_minimal(&row.sender),
            encode_minimal(&row.receiver),
            encode_minimal(&row.amount),
            encode_minimal(&row.currency),
            encode_minimal(&row.cause),
            encode_minimal(&row.created_at),
            direction_class,
            row.direction.label(),
        );
    }

    html.push_str("</tbody></table></div></div>");
    html
}
