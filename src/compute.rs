use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use log::error;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::data::{parse_date, AmountPolicy, Entry, Transaction, STATEMENT_DIGITS};
use crate::read::{read_transactions, TransactionSink};
use crate::write::dump_state;

/// The ledger proper: every transfer folded into a per-entity running
/// balance, plus an index of entries grouped by date for historical
/// statements. Entities have no registry; any string seen in a transfer is
/// one. Both maps are public so callers can poke at the raw state when
/// debugging; they are built once at load time and never touched again, so a
/// loaded ledger can be handed to any number of reader threads as-is.
///
/// Invariant: each transfer debits `from` and credits `to` by the same
/// amount, so the balances always sum to exactly zero.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    pub balances: BTreeMap<String, Decimal>,
    pub entries: BTreeMap<NaiveDate, Vec<Entry>>,
}

impl TransactionSink for Ledger {
    fn record(&mut self, tx: Transaction) {
        *self.balances.entry(tx.from.clone()).or_default() -= tx.amount;
        *self.balances.entry(tx.to.clone()).or_default() += tx.amount;
        self.entries.entry(tx.date).or_default().push(Entry {
            from: tx.from,
            to: tx.to,
            amount: tx.amount,
        });
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a ledger from any CSV stream.
    pub fn from_reader<R: std::io::Read>(
        reader: R,
        policy: AmountPolicy,
    ) -> Result<Self, anyhow::Error> {
        let mut ledger = Self::new();
        read_transactions(reader, policy, &mut ledger)?;
        Ok(ledger)
    }

    /// Load a ledger from a CSV file, surfacing any failure to the caller.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::from_reader(file, AmountPolicy::default())
    }

    /// Like [`Ledger::from_path`], but a failed load is logged and yields an
    /// empty ledger instead of an error. This is the mode the CLI runs in:
    /// whatever happens to the file, queries keep working (over nothing).
    pub fn from_path_or_empty<P: AsRef<Path>>(path: P) -> Self {
        Self::from_path(path).unwrap_or_else(|e| {
            error!("{e:#}");
            Self::new()
        })
    }

    /// Net balance of `entity` across every loaded transfer, or `None` for
    /// an entity that never appears in one.
    pub fn balance_for(&self, entity: &str) -> Option<Decimal> {
        self.balances.get(entity).copied()
    }

    /// Net position of `entity` counting only transfers dated strictly
    /// before `date` (the date itself is excluded). Outgoing and incoming
    /// subtotals each round to two places before they are netted; rounding
    /// only the net would drift from the issued statements by a cent.
    pub fn statement_on(&self, date: NaiveDate, entity: &str) -> Decimal {
        let mut outgoing = Decimal::ZERO;
        let mut incoming = Decimal::ZERO;
        for entry in self.entries.range(..date).flat_map(|(_, group)| group) {
            if entry.from == entity {
                outgoing += entry.amount;
            }
            if entry.to == entity {
                incoming += entry.amount;
            }
        }
        round_subtotal(incoming) - round_subtotal(outgoing)
    }

    /// [`Ledger::statement_on`] for a date still in text form, parsed
    /// leniently. An unparseable date is logged and yields `None` rather
    /// than an error.
    pub fn statement_on_str(&self, date: &str, entity: &str) -> Option<Decimal> {
        match parse_date(date) {
            Some(parsed) => Some(self.statement_on(parsed, entity)),
            None => {
                error!("unparseable statement date {date:?}");
                None
            }
        }
    }

    /// Write a readable rendering of the entries index and the balance map.
    /// Inspection only; nothing parses this back.
    pub fn dump<W: Write>(&self, writer: W) -> Result<(), anyhow::Error> {
        dump_state(writer, self)
    }
}

// Statements round half away from zero, not half to even.
fn round_subtotal(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(STATEMENT_DIGITS, RoundingStrategy::MidpointAwayFromZero)
}
