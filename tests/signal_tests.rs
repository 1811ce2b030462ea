use ideascope::parser::{Idea, LineFormat};
use ideascope::signal::{self, RuleHits, SignalScoreStats, ValidationStats};

fn blank(title: &str) -> Idea {
    Idea::new(title, LineFormat::Text, title)
}

fn support_copilot(description: Option<String>) -> Idea {
    let mut idea = blank("Support copilot");
    idea.problem = Some("Tickets pile up fast".to_string());
    idea.description = description;
    idea.category = "ai".to_string();
    idea.keywords = ["ai".to_string()].into_iter().collect();
    idea.status = Some("paying".to_string());
    idea
}

fn strong(title: &str) -> Idea {
    let mut idea = blank(title);
    idea.problem = Some("Small shops cannot take card payments".to_string());
    idea.description = Some("Like Stripe but tuned for market stalls".to_string());
    idea.category = "fintech".to_string();
    idea.keywords = ["fintech".to_string()].into_iter().collect();
    idea.status = Some("launched".to_string());
    idea
}

#[test]
fn score_without_description_or_competitor() {
    let idea = support_copilot(None);
    assert_eq!(idea.problem.as_ref().unwrap().len(), 20);
    // 30 problem + 0 competitor + 0 description + 10 category + 10 keywords + 10 traction
    assert_eq!(signal::signal_score(&idea), 60);
}

#[test]
fn concise_description_adds_twenty() {
    let idea = support_copilot(Some("a".repeat(100)));
    let hits = signal::evaluate_rules(&idea);
    assert!(hits.clear_problem);
    assert!(!hits.named_competitor);
    assert!(hits.concise_description);
    assert!(hits.specific_category && hits.has_keywords && hits.traction);
    // 30 problem + 10 category + 10 keywords + 10 traction, plus 20 for a description under 200 chars
    assert_eq!(signal::signal_score(&idea), 80);
}

#[test]
fn moderate_description_adds_ten() {
    let idea = support_copilot(Some("a".repeat(300)));
    assert_eq!(signal::signal_score(&idea), 70);
    let idea = support_copilot(Some("a".repeat(500)));
    assert_eq!(signal::signal_score(&idea), 60);
}

#[test]
fn long_description_stands_in_for_missing_problem() {
    let mut idea = blank("Meal planner");
    idea.description = Some("b".repeat(60));
    let hits = signal::evaluate_rules(&idea);
    assert!(!hits.clear_problem);
    assert!(hits.described_problem);
    // 15 described + 20 concise
    assert_eq!(hits.score(), 35);
}

#[test]
fn general_category_earns_nothing() {
    let idea = blank("Meal planner");
    assert_eq!(idea.category, "general");
    assert!(!signal::evaluate_rules(&idea).specific_category);
    assert_eq!(signal::signal_score(&idea), 0);
}

#[test]
fn score_is_capped_at_hundred() {
    let all = RuleHits {
        clear_problem: true,
        described_problem: true,
        named_competitor: true,
        concise_description: true,
        moderate_description: true,
        specific_category: true,
        has_keywords: true,
        traction: true,
    };
    assert_eq!(all.score(), 100);
    assert_eq!(signal::signal_score(&strong("Stall pay")), 100);
}

#[test]
fn top_decile_is_score_at_rank() {
    let mut ideas = vec![strong("one"), strong("two")];
    ideas.extend((0..8).map(|n| blank(&format!("plain {}", n))));
    let refs: Vec<&Idea> = ideas.iter().collect();
    let stats = signal::signal_score_stats(&refs);
    assert_eq!(stats.top_decile, 100);
    assert_eq!(stats.average, 20);
    assert_eq!(stats.rules.clear_problem, 20);
    assert_eq!(stats.rules.named_competitor, 20);
    assert_eq!(stats.rules.concise_description, 20);

    let mut ideas = vec![strong("one")];
    ideas.extend((0..9).map(|n| blank(&format!("plain {}", n))));
    let refs: Vec<&Idea> = ideas.iter().collect();
    assert_eq!(signal::signal_score_stats(&refs).top_decile, 0);
}

#[test]
fn small_sets_use_the_best_score() {
    let ideas = vec![blank("plain"), strong("one")];
    let refs: Vec<&Idea> = ideas.iter().collect();
    let stats = signal::signal_score_stats(&refs);
    assert_eq!(stats.top_decile, 100);
    assert_eq!(stats.average, 50);
}

#[test]
fn empty_inputs_give_zeroed_stats() {
    assert_eq!(signal::signal_score_stats(&[]), SignalScoreStats::default());
    assert_eq!(
        signal::validation_stats(&[]),
        ValidationStats { mvp: 0.0, paying: 0.0, mrr: 0.0, launched: 0.0 }
    );
}

#[test]
fn validation_fractions_are_independent() {
    let mut prototype = blank("Prototype of a meal planner");
    prototype.description = Some("Weekly menus".to_string());
    let mut paying = blank("Invoice chaser");
    paying.status = Some("Paying".to_string());
    let shipped = blank("Already launched in Berlin");
    let nothing = blank("Dog park finder");
    let ideas = vec![prototype, paying, shipped, nothing];
    let refs: Vec<&Idea> = ideas.iter().collect();
    let v = signal::validation_stats(&refs);
    assert_eq!(v, ValidationStats { mvp: 0.25, paying: 0.25, mrr: 0.25, launched: 0.25 });

    let mut everything = blank("MVP launched with paying customers");
    everything.problem = Some("Shops lose revenue".to_string());
    let v = signal::validation_stats(&[&everything]);
    assert_eq!(v, ValidationStats { mvp: 1.0, paying: 1.0, mrr: 1.0, launched: 1.0 });
}
