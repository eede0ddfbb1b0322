mod compute;
mod data;
mod read;
mod write;

pub use compute::Ledger;
pub use data::{parse_date, AmountPolicy, Entry, Error, Transaction};
