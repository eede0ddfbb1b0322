use anyhow::Context;

use crate::data::{AmountPolicy, RawRecord, Transaction};

/// Trait for doing something with a `Transaction` decoded from a CSV row.
/// The ledger implements it to fold rows into its indexes, and mock
/// implementations let tests check exactly what the reader produced.
pub(crate) trait TransactionSink {
    fn record(&mut self, tx: Transaction);
}

/// CSV importer for ledger rows. The format has no header line and four
/// columns, `date,from,to,amount`; surrounding whitespace per field is
/// trimmed. Undecodable rows (wrong column count, unparseable date, or a bad
/// amount under `AmountPolicy::Reject`) fail the whole read, with the line
/// number attached.
pub(crate) fn read_transactions<R: std::io::Read, S: TransactionSink>(
    reader: R,
    policy: AmountPolicy,
    sink: &mut S,
) -> Result<(), anyhow::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut record = csv::StringRecord::new();
    while rdr.read_record(&mut record).context("reading csv row")? {
        let line = record.position().map_or(0, |position| position.line());
        let raw: RawRecord = record
            .deserialize(None)
            .with_context(|| format!("line {line}: undecodable row"))?;
        sink.record(raw.into_transaction(line, policy)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::data::{AmountPolicy, Error, Transaction};
    use crate::read::{read_transactions, TransactionSink};

    #[derive(Default)]
    struct TxStorage {
        txs: Vec<Transaction>,
    }
    impl TransactionSink for TxStorage {
        fn record(&mut self, tx: Transaction) {
            self.txs.push(tx);
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn read_rows() {
        let mut storage = TxStorage::default();
        let rows = b"\
2015-01-01, john,  mary, 100.00
2015-01-02, mary,  john, 30.00
2015/01/05, doris, john, 12.5
";
        read_transactions(&rows[..], AmountPolicy::default(), &mut storage).unwrap();
        assert_eq!(
            storage.txs,
            [
                Transaction {
                    date: date(2015, 1, 1),
                    from: "john".into(),
                    to: "mary".into(),
                    amount: dec!(100.00),
                },
                Transaction {
                    date: date(2015, 1, 2),
                    from: "mary".into(),
                    to: "john".into(),
                    amount: dec!(30.00),
                },
                Transaction {
                    date: date(2015, 1, 5),
                    from: "doris".into(),
                    to: "john".into(),
                    amount: dec!(12.5),
                },
            ]
        );
    }

    #[test]
    fn malformed_amount_reads_as_zero() {
        let mut storage = TxStorage::default();
        read_transactions(
            &b"2015-01-01,john,mary,banana\n"[..],
            AmountPolicy::default(),
            &mut storage,
        )
        .unwrap();
        assert_eq!(storage.txs[0].amount, dec!(0));
    }

    #[test]
    fn malformed_amount_fails_strict_read() {
        let mut storage = TxStorage::default();
        let err = read_transactions(
            &b"2015-01-01,john,mary,100.00\n2015-01-02,mary,john,banana\n"[..],
            AmountPolicy::Reject,
            &mut storage,
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::InvalidAmount {
                line: 2,
                value: "banana".into()
            })
        );
    }

    #[test]
    fn malformed_date_fails_the_read() {
        let mut storage = TxStorage::default();
        let err = read_transactions(
            &b"whenever,john,mary,100.00\n"[..],
            AmountPolicy::default(),
            &mut storage,
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::InvalidDate {
                line: 1,
                value: "whenever".into()
            })
        );
    }

    #[test]
    fn short_row_fails_the_read() {
        let mut storage = TxStorage::default();
        assert!(read_transactions(
            &b"2015-01-01,john,mary\n"[..],
            AmountPolicy::default(),
            &mut storage,
        )
        .is_err());
    }
}
