//! Records kept by the ledger store.

use repowr_protocol::{IdentityMessage, RatingMessage};
use serde::{Deserialize, Serialize};

/// Every transfer that carried a memo, valid or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub tx_id: String,
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    pub timestamp: i64,
    pub memo: String,
    pub is_valid: bool,
}

/// An accepted rating. Addresses are canonical keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub tx_id: String,
    pub sender: String,
    pub receiver: String,
    pub timestamp: i64,
    pub message: RatingMessage,
}

impl RatingRecord {
    pub fn rating(&self) -> u8 {
        self.message.rating
    }
}

/// The latest accepted identity for one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub address: String,
    pub tx_id: String,
    pub timestamp: i64,
    pub identity: IdentityMessage,
}

/// One line of the store file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum StoreRecord {
    Transaction(StoredTransaction),
    Rating(RatingRecord),
    Profile(ProfileRecord),
}

#[cfg(test)]
mod tests {
    use super::*;
    use repowr_protocol::SourceFormat;
    use serde_json::json;

    #[test]
    fn store_lines_are_tagged_by_record_kind() {
        let record = StoreRecord::Rating(RatingRecord {
            tx_id: "t1".into(),
            sender: "0:a".into(),
            receiver: "0:b".into(),
            timestamp: 7,
            message: RatingMessage {
                protocol: "repOWR".into(),
                rating: 4,
                category: None,
                comment: None,
                link: None,
                reference: Some("r".into()),
                source_format: SourceFormat::Compact,
            },
        });
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["record"], "rating");
        assert_eq!(value["message"]["ref"], "r");
        assert_eq!(value["message"]["source_format"], "compact");
        assert!(value["message"].get("category").is_none());

        let back: StoreRecord = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, record);
    }

    #[test]
    fn transaction_line_parses() {
        let line = json!({
            "record": "transaction", "tx_id": "t", "sender": "s", "receiver": "r",
            "amount": 1.5, "timestamp": 3, "memo": "m", "is_valid": false
        });
        let StoreRecord::Transaction(tx) = serde_json::from_value(line).expect("tx") else {
            panic!("expected transaction");
        };
        assert!(!tx.is_valid);
        assert_eq!(tx.amount, 1.5);
    }
}
