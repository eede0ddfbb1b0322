use ledger::Ledger;

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let mut args = std::env::args();
    let binary = args.next().unwrap_or_else(|| "ledger".to_string());
    let path = match args.next() {
        Some(path) => path,
        None => {
            println!("Process a ledger file in CSV format.");
            println!();
            println!("Usage: {binary} target.csv");
            return Ok(());
        }
    };

    // Bad or missing files log to stderr and leave an empty ledger; stdout
    // only ever carries the dump.
    let ledger = Ledger::from_path_or_empty(path);
    ledger.dump(std::io::stdout())?;
    Ok(())
}
