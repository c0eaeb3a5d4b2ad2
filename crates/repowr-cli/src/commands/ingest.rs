use crate::support::{AppConfig, load_store_or_exit, print_json, save_store_or_exit};
use repowr_address::AddressCodec;
use repowr_ledger::{ingest, read_transfers};
use repowr_protocol::MemoValidator;
use serde_json::json;

pub fn run(
    transfers: String,
    store: Option<String>,
    limit: Option<usize>,
    config: AppConfig,
    json_output: bool,
) {
    let store_path = config.store_path(store);
    let mut records = read_transfers(&transfers).unwrap_or_else(|e| {
        eprintln!("error: failed to read {transfers}: {e}");
        std::process::exit(1);
    });
    if let Some(limit) = limit.or(config.transfers_limit) {
        records.truncate(limit);
    }

    let mut ledger = load_store_or_exit(&store_path, config.address);
    let stats = ingest(
        &mut ledger,
        &MemoValidator::new(config.protocol),
        &AddressCodec::new(config.address),
        records,
    );
    save_store_or_exit(&ledger, &store_path);

    if json_output {
        print_json(&json!({
            "transfers_path": transfers,
            "store_path": store_path.display().to_string(),
            "stats": stats,
            "store": ledger.stats(),
        }));
        return;
    }

    println!("repowr ingest {transfers}");
    println!("  Store: {}", store_path.display());
    println!("  Transfers: {}", stats.total);
    println!("  With memo: {}", stats.parsed);
    println!("  Valid: {}", stats.valid);
    println!("  Invalid: {}", stats.invalid);
    println!("  Saved: {}", stats.saved);
    println!("  Duplicates: {}", stats.duplicates);
    println!("  Ratings: {}", stats.ratings);
    println!("  Profiles: {}", stats.profiles);
}
