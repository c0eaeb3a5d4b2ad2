use crate::support::{AppConfig, format_timestamp, load_store_or_exit, print_json, short_address};
use repowr_ledger::RatingRecord;
use serde_json::{Value, json};

pub fn run(
    address: String,
    store: Option<String>,
    limit: Option<usize>,
    config: AppConfig,
    json_output: bool,
) {
    let store_path = config.store_path(store);
    let limit = limit.unwrap_or(config.review_limit);
    let ledger = load_store_or_exit(&store_path, config.address);

    let Some(resolved) = ledger.resolve(&address) else {
        eprintln!("error: address not found: {}", address.trim());
        std::process::exit(1);
    };
    let mut received = ledger.ratings_received(&resolved.address);
    let mut given = ledger.ratings_given(&resolved.address);
    received.truncate(limit);
    given.truncate(limit);

    if json_output {
        print_json(&json!({
            "address": resolved.address,
            "match_tier": resolved.tier,
            "received": received.iter().map(|r| review_json(r, &r.sender)).collect::<Vec<_>>(),
            "given": given.iter().map(|r| review_json(r, &r.receiver)).collect::<Vec<_>>(),
        }));
        return;
    }

    println!("repowr reviews {}", short_address(&resolved.address));
    print_reviews("Received", "from", &received, |r| &r.sender);
    print_reviews("Given", "to", &given, |r| &r.receiver);
}

fn review_json(record: &RatingRecord, counterparty: &str) -> Value {
    json!({
        "tx_id": record.tx_id,
        "counterparty": counterparty,
        "timestamp": record.timestamp,
        "rating": record.rating(),
        "category": record.message.effective_category(),
        "comment": record.message.comment,
    })
}

fn print_reviews(
    label: &str,
    direction: &str,
    records: &[&RatingRecord],
    counterparty: impl Fn(&RatingRecord) -> &String,
) {
    println!("  {label} ({}):", records.len());
    if records.is_empty() {
        println!("    - none");
    }
    for &record in records {
        let comment = record.message.comment.as_deref().unwrap_or("");
        println!(
            "    - {} {}/5 {} {} {}",
            format_timestamp(record.timestamp),
            record.rating(),
            direction,
            short_address(counterparty(record)),
            comment
        );
    }
}
