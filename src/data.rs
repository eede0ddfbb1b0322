use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const STATEMENT_DIGITS: u32 = 2;

/// One row of the ledger file exactly as it arrives: every field still text.
/// The file carries no header line, so the fields deserialize positionally
/// as `date,from,to,amount`. Turning this into a `Transaction` is where parsing
/// (and the amount policy) happens, so everything downstream of the reader
/// works on typed values only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct RawRecord {
    pub date: String,
    pub from: String,
    pub to: String,
    pub amount: String,
}

/// A fully parsed transfer. Immutable once loaded; the ledger only ever
/// appends these at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

/// What a date group keeps per transfer. The date itself is the group key in
/// the entries index and is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

/// What to do with an amount field that isn't a non-negative decimal number.
///
/// `CoerceToZero` keeps the row with a zero amount and says nothing, which is
/// the historical behavior of this ledger format; whether that's actually
/// wanted is an open question with stakeholders, so the strict alternative is
/// a mode rather than a code change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmountPolicy {
    #[default]
    CoerceToZero,
    Reject,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("line {line}: unparseable date {value:?}")]
    InvalidDate { line: u64, value: String },
    #[error("line {line}: unparseable amount {value:?}")]
    InvalidAmount { line: u64, value: String },
}

// ISO first; the slash/dash fallbacks are day-first, like the upstream
// producers of these files.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Lenient calendar-date parsing over the formats seen in ledger files.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

impl RawRecord {
    /// Parse the text fields into a `Transaction`. A date that matches no
    /// known format fails the row outright; the amount field goes through
    /// `policy`, with negative amounts treated the same as unparseable ones
    /// since a transfer amount can't be negative.
    pub(crate) fn into_transaction(
        self,
        line: u64,
        policy: AmountPolicy,
    ) -> Result<Transaction, Error> {
        let date = parse_date(&self.date).ok_or_else(|| Error::InvalidDate {
            line,
            value: self.date.clone(),
        })?;
        let amount = match self.amount.trim().parse::<Decimal>() {
            Ok(amount) if !amount.is_sign_negative() => amount,
            _ => match policy {
                AmountPolicy::CoerceToZero => Decimal::ZERO,
                AmountPolicy::Reject => {
                    return Err(Error::InvalidAmount {
                        line,
                        value: self.amount,
                    })
                }
            },
        };
        Ok(Transaction {
            date,
            from: self.from,
            to: self.to,
            amount,
        })
    }
}
