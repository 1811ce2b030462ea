use ideascope::keywords::{extract_keywords, extract_meaningful_keywords};

#[test]
fn vocabulary_terms_and_raw_tokens_are_combined() {
    let kws = extract_keywords("AI agents for pet owners");
    for expected in ["ai", "agent", "pet", "agents", "for", "owners"] {
        assert!(kws.contains(expected), "missing {}", expected);
    }
}

#[test]
fn vocabulary_matches_are_plain_substrings() {
    // "ai" is a substring of "chair"
    let kws = extract_keywords("Ergonomic chair rental");
    assert!(kws.contains("ai"));
}

#[test]
fn short_tokens_are_dropped_and_output_is_lowercase() {
    let kws = extract_keywords("An UI kit");
    assert!(kws.contains("kit"));
    assert!(!kws.contains("an"));
    assert!(!kws.contains("ui"));
    assert!(kws.iter().all(|k| k.chars().all(|c| !c.is_uppercase())));
}

#[test]
fn empty_text_has_no_keywords() {
    assert!(extract_keywords("").is_empty());
    assert!(extract_keywords("   ").is_empty());
}

#[test]
fn meaningful_keywords_keep_long_words_and_whitelist() {
    let kws = extract_meaningful_keywords("Freelancers struggle to track unpaid invoices and cost overruns");
    for expected in ["freelancers", "struggle", "track", "unpaid", "invoices", "cost", "overruns"] {
        assert!(kws.contains(expected), "missing {}", expected);
    }
    assert!(!kws.contains("and"));
    assert!(!kws.contains("to"));
}

#[test]
fn meaningful_keywords_drop_stop_words() {
    let kws = extract_meaningful_keywords("People really waste hours because nothing works");
    assert!(!kws.contains("people"));
    assert!(!kws.contains("really"));
    assert!(!kws.contains("because"));
    assert!(!kws.contains("nothing"));
    assert!(kws.contains("waste"));
    assert!(kws.contains("hours"));
    assert!(kws.contains("works"));
}
