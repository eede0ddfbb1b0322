use std::io::Write;

use anyhow::Context;

use crate::compute::Ledger;

/// Render the ledger's full internal state: the entries index first, then
/// the balance map, each as a pretty-printed JSON document. Both maps are
/// ordered, so the rendering is byte-for-byte reproducible for a given file.
pub(crate) fn dump_state<W: Write>(mut writer: W, ledger: &Ledger) -> Result<(), anyhow::Error> {
    serde_json::to_writer_pretty(&mut writer, &ledger.entries).context("rendering entries")?;
    writeln!(writer)?;
    serde_json::to_writer_pretty(&mut writer, &ledger.balances).context("rendering balances")?;
    writeln!(writer)?;
    Ok(())
}
