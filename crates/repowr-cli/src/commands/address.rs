use crate::support::print_json;
use repowr_address::{AddressCodec, CodecOptions, normalize_for_comparison};
use serde_json::json;

pub fn run(address: String, options: CodecOptions, json_output: bool) {
    let codec = AddressCodec::new(options);
    let form = codec.to_raw(&address).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let comparison_key = normalize_for_comparison(&address);
    let friendly = form.canonical().map(|canonical| {
        json!({
            "bounceable": canonical.to_friendly(true),
            "non_bounceable": canonical.to_friendly(false),
        })
    });

    if json_output {
        print_json(&json!({
            "input": address,
            "form": form.kind(),
            "canonical_key": form.canonical_key(),
            "workchain": form.canonical().map(|c| c.workchain()),
            "comparison_key": comparison_key,
            "friendly": friendly,
        }));
        return;
    }

    println!("repowr address {}", address.trim());
    println!("  Form: {}", form.kind());
    println!("  Canonical key: {}", form.canonical_key());
    println!("  Comparison key: {comparison_key}");
    if let Some(canonical) = form.canonical() {
        println!("  Bounceable: {}", canonical.to_friendly(true));
        println!("  Non-bounceable: {}", canonical.to_friendly(false));
    }
}
