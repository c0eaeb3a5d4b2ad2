use repowr_address::CanonicalAddress;
use serde_json::{Value, json};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const HASH_ALICE: &str = "83dfd552e63729b472fcbcc8c45ebcc6691702558b68ec7527e1ba403a0f31a8";
const HASH_BOB: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
const HASH_CAROL: &str = "fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210";

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "repowr-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Runs inside `dir` so a stray `repowr.toml` elsewhere is never picked up.
fn run_repowr<I, S>(dir: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_repowr");
    Command::new(bin)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("repowr command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn friendly(hash: &str) -> String {
    CanonicalAddress::from_hex(0, hash)
        .expect("fixture hash")
        .to_friendly(false)
}

fn raw(hash: &str) -> String {
    format!("0:{hash}")
}

/// Alice rates Bob twice, Carol rates Bob once, Bob rates Alice, Bob sets a
/// profile. One memo is junk and one transfer is repeated.
fn write_sample_transfers(path: &Path) {
    let transfers = [
        json!({"transaction_hash": "t1", "sender": {"address": friendly(HASH_ALICE)},
               "recipient": {"address": raw(HASH_BOB)}, "amount": "1000000000",
               "timestamp": 1_700_000_000, "comment": "repOWR:5:fast and honest:"}),
        json!({"transaction_hash": "t2", "sender": friendly(HASH_CAROL), "recipient": raw(HASH_BOB),
               "amount": "1000000000", "timestamp": 1_700_000_100,
               "comment": r#"{"protocol":"repOWR","rating":4,"type":"deal","comment":"ok"}"#}),
        json!({"transaction_hash": "t3", "sender": friendly(HASH_ALICE), "recipient": raw(HASH_BOB),
               "amount": "1000000000", "timestamp": 1_700_000_200, "comment": "repOWR:3::"}),
        json!({"transaction_hash": "t4", "sender": raw(HASH_BOB), "recipient": raw(HASH_ALICE),
               "amount": "1000000000", "timestamp": 1_700_000_300, "comment": "repOWR:5:thanks:"}),
        json!({"transaction_hash": "t5", "sender": friendly(HASH_BOB), "recipient": raw(HASH_ALICE),
               "amount": "1", "timestamp": 1_700_000_400,
               "comment": r#"{"protocol":"repOWR","type":"identity","nickname":"bob","bio":"builder","skills":["rust"]}"#}),
        json!({"transaction_hash": "t6", "sender": raw(HASH_ALICE), "recipient": raw(HASH_BOB),
               "amount": "1", "timestamp": 1_700_000_500, "comment": "gm"}),
        json!({"transaction_hash": "t1", "sender": raw(HASH_ALICE), "recipient": raw(HASH_BOB),
               "amount": "1", "timestamp": 1_700_000_600, "comment": "repOWR:1:replayed:"}),
    ];
    let mut text = String::from("# sample export\n");
    for transfer in transfers {
        text.push_str(&serde_json::to_string(&transfer).expect("fixture serializes"));
        text.push('\n');
    }
    fs::write(path, text).expect("transfers should be written");
}

fn ingest_sample(dir: &Path) -> PathBuf {
    let transfers = dir.join("transfers.jsonl");
    let store = dir.join("store.jsonl");
    write_sample_transfers(&transfers);
    let output = run_repowr(
        dir,
        [
            "ingest",
            "--transfers",
            transfers.to_str().expect("utf-8 path"),
            "--store",
            store.to_str().expect("utf-8 path"),
        ],
    );
    assert_success(&output);
    store
}

#[test]
fn validate_json_reports_accepted_rating() {
    let tmp = TempDirGuard::new("validate-accept");
    let output = run_repowr(tmp.path(), ["validate", "repOWR:5:great:", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["outcome"], "accepted");
    assert_eq!(payload["message"]["kind"], "rating");
    assert_eq!(payload["message"]["rating"], 5);
    assert_eq!(payload["message"]["comment"], "great");
}

#[test]
fn validate_rejection_is_not_a_process_failure() {
    let tmp = TempDirGuard::new("validate-reject");
    let output = run_repowr(tmp.path(), ["validate", "repOWR:9::", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["outcome"], "rejected");
    assert_eq!(payload["kind"], "field_out_of_range");

    let text = run_repowr(tmp.path(), ["validate", "hello"]);
    assert_success(&text);
    let stdout = stdout_text(&text);
    assert!(stdout.contains("Outcome: rejected (malformed_grammar)"), "{stdout}");
    assert!(stdout.contains("not a protocol message"), "{stdout}");
}

#[test]
fn address_json_reports_canonical_forms() {
    let tmp = TempDirGuard::new("address");
    let output = run_repowr(tmp.path(), ["address", friendly(HASH_ALICE).as_str(), "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["form"], "friendly");
    assert_eq!(payload["canonical_key"], raw(HASH_ALICE));
    assert_eq!(payload["workchain"], 0);
    assert_eq!(payload["friendly"]["non_bounceable"], friendly(HASH_ALICE));

    let opaque = parse_json_stdout(&run_repowr(
        tmp.path(),
        ["address", "not-an-address", "--json"],
    ));
    assert_eq!(opaque["form"], "opaque");
    assert_eq!(opaque["friendly"], Value::Null);
}

#[test]
fn address_with_bad_raw_hash_fails() {
    let tmp = TempDirGuard::new("address-bad");
    let output = run_repowr(tmp.path(), ["address", "0:abc"]);
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: invalid raw address"), "{stderr}");
}

#[test]
fn ingest_json_reports_stats_and_persists_store() {
    let tmp = TempDirGuard::new("ingest");
    let transfers = tmp.path().join("transfers.jsonl");
    let store = tmp.path().join("data").join("store.jsonl");
    write_sample_transfers(&transfers);

    let output = run_repowr(
        tmp.path(),
        [
            "ingest",
            "--transfers",
            transfers.to_str().expect("utf-8 path"),
            "--store",
            store.to_str().expect("utf-8 path"),
            "--json",
        ],
    );
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(
        payload["stats"],
        json!({
            "total": 7, "parsed": 7, "valid": 6, "invalid": 1, "saved": 6,
            "duplicates": 1, "ratings": 4, "profiles": 1
        })
    );
    assert_eq!(payload["store"]["transactions"], 6);
    assert!(store.exists());

    // Re-ingesting the same export only produces duplicates.
    let again = parse_json_stdout(&run_repowr(
        tmp.path(),
        [
            "ingest",
            "--transfers",
            transfers.to_str().expect("utf-8 path"),
            "--store",
            store.to_str().expect("utf-8 path"),
            "--json",
        ],
    ));
    assert_eq!(again["stats"]["saved"], 0);
    assert_eq!(again["stats"]["duplicates"], 7);
}

#[test]
fn ingest_limit_truncates_the_export() {
    let tmp = TempDirGuard::new("ingest-limit");
    let transfers = tmp.path().join("transfers.jsonl");
    write_sample_transfers(&transfers);
    let output = run_repowr(
        tmp.path(),
        [
            "ingest",
            "--transfers",
            transfers.to_str().expect("utf-8 path"),
            "--limit",
            "2",
            "--json",
        ],
    );
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["stats"]["total"], 2);
    assert!(tmp.path().join(".repowr").join("store.jsonl").exists());
}

#[test]
fn reputation_resolves_any_address_form() {
    let tmp = TempDirGuard::new("reputation");
    let store = ingest_sample(tmp.path());
    let store_arg = store.to_str().expect("utf-8 path");

    for query in [raw(HASH_BOB), friendly(HASH_BOB), raw(HASH_BOB).to_uppercase()] {
        let output = run_repowr(
            tmp.path(),
            ["reputation", query.as_str(), "--store", store_arg, "--json"],
        );
        assert_success(&output);
        let payload = parse_json_stdout(&output);
        assert_eq!(payload["address"], raw(HASH_BOB), "{query}");
        assert_eq!(payload["authoritative"], true, "{query}");
        assert_eq!(payload["reputation"]["final_score"], 4.0);
        assert_eq!(payload["reputation"]["total_ratings"], 3);
        assert_eq!(payload["reputation"]["ratings_given"], 1);
        assert_eq!(payload["reputation"]["by_category"]["deal"], json!([4]));
        assert_eq!(payload["profile"]["identity"]["nickname"], "bob");
    }

    let text = stdout_text(&run_repowr(
        tmp.path(),
        ["reputation", raw(HASH_BOB).as_str(), "--store", store_arg],
    ));
    assert!(text.contains("Nickname: bob"), "{text}");
    assert!(text.contains("Score: 4.00"), "{text}");
}

#[test]
fn reputation_for_unknown_address_fails() {
    let tmp = TempDirGuard::new("reputation-missing");
    let store = ingest_sample(tmp.path());
    let output = run_repowr(
        tmp.path(),
        [
            "reputation",
            "not-an-address",
            "--store",
            store.to_str().expect("utf-8 path"),
        ],
    );
    assert_failure(&output);
}

#[test]
fn reviews_lists_newest_first_in_both_directions() {
    let tmp = TempDirGuard::new("reviews");
    let store = ingest_sample(tmp.path());
    let output = run_repowr(
        tmp.path(),
        [
            "reviews",
            raw(HASH_BOB).as_str(),
            "--store",
            store.to_str().expect("utf-8 path"),
            "--limit",
            "2",
            "--json",
        ],
    );
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    let received = payload["received"].as_array().expect("received list");
    assert_eq!(received.len(), 2);
    assert_eq!(received[0]["tx_id"], "t3");
    assert_eq!(received[1]["tx_id"], "t2");
    assert_eq!(received[1]["category"], "deal");
    assert_eq!(received[0]["counterparty"], raw(HASH_ALICE));
    let given = payload["given"].as_array().expect("given list");
    assert_eq!(given.len(), 1);
    assert_eq!(given[0]["counterparty"], raw(HASH_ALICE));
}

#[test]
fn top_ranks_by_score() {
    let tmp = TempDirGuard::new("top");
    let store = ingest_sample(tmp.path());
    let output = run_repowr(
        tmp.path(),
        [
            "top",
            "--store",
            store.to_str().expect("utf-8 path"),
            "--json",
        ],
    );
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["count"], 2);
    let entries = payload["entries"].as_array().expect("entries");
    assert_eq!(entries[0]["reputation"]["address"], raw(HASH_ALICE));
    assert_eq!(entries[0]["reputation"]["final_score"], 5.0);
    assert_eq!(entries[1]["reputation"]["address"], raw(HASH_BOB));
    assert_eq!(entries[1]["nickname"], "bob");

    let text = stdout_text(&run_repowr(
        tmp.path(),
        ["top", "--store", store.to_str().expect("utf-8 path")],
    ));
    assert!(text.contains("2. bob  4.00 (3 rating(s))"), "{text}");
}

#[test]
fn config_file_sets_store_path_and_protocol_limits() {
    let tmp = TempDirGuard::new("config");
    fs::write(
        tmp.path().join("repowr.toml"),
        "store_path = \"custom/store.jsonl\"\n\n[protocol]\nmax_comment_chars = 3\n",
    )
    .expect("config should be written");

    let rejected = parse_json_stdout(&run_repowr(
        tmp.path(),
        ["validate", "repOWR:5:four:", "--json"],
    ));
    assert_eq!(rejected["outcome"], "rejected");
    assert_eq!(rejected["kind"], "field_out_of_range");

    let transfers = tmp.path().join("transfers.jsonl");
    write_sample_transfers(&transfers);
    let output = run_repowr(
        tmp.path(),
        ["ingest", "--transfers", transfers.to_str().expect("utf-8 path")],
    );
    assert_success(&output);
    assert!(tmp.path().join("custom").join("store.jsonl").exists());
}

#[test]
fn missing_explicit_config_fails() {
    let tmp = TempDirGuard::new("config-missing");
    let output = run_repowr(
        tmp.path(),
        ["--config", "nope.toml", "validate", "repOWR:5::"],
    );
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read nope.toml"), "{stderr}");
}

#[test]
fn verbose_logs_go_to_stderr_only() {
    let tmp = TempDirGuard::new("verbose");
    let transfers = tmp.path().join("transfers.jsonl");
    write_sample_transfers(&transfers);
    let output = run_repowr(
        tmp.path(),
        [
            "--verbose",
            "ingest",
            "--transfers",
            transfers.to_str().expect("utf-8 path"),
            "--json",
        ],
    );
    assert_success(&output);
    parse_json_stdout(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ingestion finished"), "{stderr}");
    assert!(stderr.contains("no config file, using defaults"), "{stderr}");
    assert!(stderr.contains("store loaded"), "{stderr}");
    assert!(stderr.contains("store saved"), "{stderr}");
}
