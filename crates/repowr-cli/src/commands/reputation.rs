use crate::support::{AppConfig, load_store_or_exit, print_json, short_address, yes_no};
use repowr_ledger::compute_reputation;
use serde_json::json;

pub fn run(address: String, store: Option<String>, config: AppConfig, json_output: bool) {
    let store_path = config.store_path(store);
    let ledger = load_store_or_exit(&store_path, config.address);

    let Some(resolved) = ledger.resolve(&address) else {
        eprintln!("error: no reputation found for {}", address.trim());
        std::process::exit(1);
    };
    let table = compute_reputation(&ledger);
    let reputation = table.get(&resolved.address);
    let profile = ledger.profile(&resolved.address);

    if json_output {
        print_json(&json!({
            "query": address,
            "address": resolved.address,
            "match_tier": resolved.tier,
            "authoritative": resolved.tier.is_authoritative(),
            "reputation": reputation,
            "profile": profile,
        }));
        return;
    }

    println!("repowr reputation {}", short_address(&resolved.address));
    println!("  Address: {}", resolved.address);
    println!(
        "  Match: {} (authoritative: {})",
        resolved.tier.as_str(),
        yes_no(resolved.tier.is_authoritative())
    );
    if let Some(profile) = profile {
        let identity = &profile.identity;
        println!("  Nickname: {}", identity.nickname);
        println!("  Bio: {}", identity.bio);
        if let Some(skills) = &identity.skills {
            println!("  Skills: {}", skills.join(", "));
        }
        if let Some(languages) = &identity.languages {
            println!("  Languages: {}", languages.join(", "));
        }
        if let Some(links) = &identity.links {
            for (platform, link) in links {
                if let Some(link) = link.as_str() {
                    println!("  {platform}: {link}");
                }
            }
        }
    }
    match reputation {
        Some(reputation) => {
            println!("  Score: {:.2}", reputation.final_score);
            println!("  Ratings received: {}", reputation.total_ratings);
            println!("  Ratings given: {}", reputation.ratings_given);
            for (category, ratings) in &reputation.by_category {
                println!("  {category}: {} rating(s)", ratings.len());
            }
        }
        None => println!("  Score: no ratings received"),
    }
}
