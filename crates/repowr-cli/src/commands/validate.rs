use crate::support::print_json;
use repowr_protocol::{MemoValidator, ProtocolConfig, ProtocolMessage, ValidationOutcome};

/// Rejection is a normal result here, so both outcomes exit 0.
pub fn run(memo: String, config: ProtocolConfig, json_output: bool) {
    let validator = MemoValidator::new(config);
    let grammar = validator.classify(&memo);
    let outcome = validator.validate(&memo);

    if json_output {
        print_json(&outcome.to_json());
        return;
    }

    println!("repowr validate");
    println!("  Grammar: {grammar:?}");
    match outcome {
        ValidationOutcome::Accepted(ProtocolMessage::Rating(rating)) => {
            println!("  Outcome: accepted (rating)");
            println!("  Rating: {}", rating.rating);
            println!("  Category: {}", rating.effective_category());
            if let Some(comment) = &rating.comment {
                println!("  Comment: {comment}");
            }
            if let Some(link) = &rating.link {
                println!("  Link: {link}");
            }
            if let Some(reference) = &rating.reference {
                println!("  Ref: {reference}");
            }
            println!("  Format: {}", rating.source_format.as_str());
        }
        ValidationOutcome::Accepted(ProtocolMessage::Identity(identity)) => {
            println!("  Outcome: accepted (identity)");
            println!("  Nickname: {}", identity.nickname);
            println!("  Bio: {}", identity.bio);
            if let Some(skills) = &identity.skills {
                println!("  Skills: {}", skills.join(", "));
            }
            if let Some(languages) = &identity.languages {
                println!("  Languages: {}", languages.join(", "));
            }
            if let Some(year) = identity.birth_year {
                println!("  Birth year: {year}");
            }
        }
        ValidationOutcome::Rejected(reason) => {
            println!("  Outcome: rejected ({})", reason.kind());
            println!("  Reason: {reason}");
        }
    }
}
