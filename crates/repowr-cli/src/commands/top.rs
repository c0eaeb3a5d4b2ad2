use crate::support::{AppConfig, load_store_or_exit, print_json, short_address};
use repowr_ledger::compute_reputation;
use serde_json::json;

pub fn run(store: Option<String>, count: Option<usize>, config: AppConfig, json_output: bool) {
    let store_path = config.store_path(store);
    let count = count.unwrap_or(config.top_count);
    let ledger = load_store_or_exit(&store_path, config.address);
    let table = compute_reputation(&ledger);
    let top = table.top(count);

    if json_output {
        let entries: Vec<_> = top
            .iter()
            .map(|reputation| {
                json!({
                    "reputation": reputation,
                    "nickname": ledger
                        .profile(&reputation.address)
                        .map(|p| p.identity.nickname.clone()),
                })
            })
            .collect();
        print_json(&json!({
            "store_path": store_path.display().to_string(),
            "count": entries.len(),
            "entries": entries,
        }));
        return;
    }

    println!("repowr top {count}");
    if top.is_empty() {
        println!("  (no ratings yet)");
    }
    for (rank, reputation) in top.iter().enumerate() {
        let name = ledger
            .profile(&reputation.address)
            .map(|p| p.identity.nickname.as_str())
            .filter(|nickname| !nickname.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| short_address(&reputation.address));
        println!(
            "  {}. {name}  {:.2} ({} rating(s))",
            rank + 1,
            reputation.final_score,
            reputation.total_ratings
        );
    }
}
