use chrono::{TimeZone, Utc};
use ideascope::parser::{self, LineFormat};

#[test]
fn parse_json_line_maps_known_keys() {
    let line = r#"{"title":"Pet sitter marketplace","category":"Pets","description":"Book vetted sitters","problem":"Finding trusted sitters is hard","date":"2024-03-05","status":"mvp"}"#;
    let idea = parser::parse_idea_line(line).expect("idea");
    assert_eq!(idea.format, LineFormat::Json);
    assert_eq!(idea.title, "Pet sitter marketplace");
    assert_eq!(idea.category, "Pets");
    assert_eq!(idea.description.as_deref(), Some("Book vetted sitters"));
    assert_eq!(idea.problem.as_deref(), Some("Finding trusted sitters is hard"));
    assert_eq!(idea.status.as_deref(), Some("mvp"));
    assert_eq!(idea.date, Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()));
    assert!(idea.keywords.contains("pet"));
    assert!(idea.keywords.contains("marketplace"));
    assert_eq!(idea.raw, line);
}

#[test]
fn parse_json_line_accepts_alternate_keys() {
    let line = r#"{"startup_idea":"Invoice chaser","industry":"Fintech","problem_to_solve":"Freelancers wait months for payment"}"#;
    let idea = parser::parse_idea_line(line).unwrap();
    assert_eq!(idea.format, LineFormat::Json);
    assert_eq!(idea.title, "Invoice chaser");
    assert_eq!(idea.category, "Fintech");
    assert_eq!(idea.problem.as_deref(), Some("Freelancers wait months for payment"));
}

#[test]
fn json_without_category_defaults_to_general() {
    let idea = parser::parse_idea_line(r#"{"idea":"Dog park finder"}"#).unwrap();
    assert_eq!(idea.title, "Dog park finder");
    assert_eq!(idea.category, "general");
    assert!(idea.problem.is_none());
}

#[test]
fn parse_named_pipe_fields() {
    let line = "startup_idea: AI bookkeeping | problem_to_solve: Small firms waste hours on receipts | target_customers: accountants | Email: a@b.co";
    let idea = parser::parse_idea_line(line).unwrap();
    assert_eq!(idea.format, LineFormat::PipeNamed);
    assert_eq!(idea.title, "AI bookkeeping");
    assert_eq!(idea.problem.as_deref(), Some("Small firms waste hours on receipts"));
    assert_eq!(idea.customer.as_deref(), Some("accountants"));
    assert_eq!(idea.email.as_deref(), Some("a@b.co"));
    assert_eq!(idea.category, "general");
}

#[test]
fn parse_simple_pipe_positional() {
    let idea = parser::parse_idea_line("Pet sitter marketplace|Pets|Book vetted sitters nearby").unwrap();
    assert_eq!(idea.format, LineFormat::Pipe);
    assert_eq!(idea.title, "Pet sitter marketplace");
    assert_eq!(idea.category, "Pets");
    assert_eq!(idea.description.as_deref(), Some("Book vetted sitters nearby"));
}

#[test]
fn parse_tab_positional() {
    let idea = parser::parse_idea_line("Meal planner\tFood\tWeekly plans for busy parents").unwrap();
    assert_eq!(idea.format, LineFormat::Tab);
    assert_eq!(idea.title, "Meal planner");
    assert_eq!(idea.category, "Food");
    assert_eq!(idea.description.as_deref(), Some("Weekly plans for busy parents"));
}

#[test]
fn line_with_tab_and_pipe_routes_to_pipe() {
    let idea = parser::parse_idea_line("Meal planner|Food\tWeekly plans").unwrap();
    assert_eq!(idea.format, LineFormat::Pipe);
    assert_eq!(idea.title, "Meal planner");
}

#[test]
fn parse_csv_positional() {
    let idea = parser::parse_idea_line("Invoice chaser,Fintech,Automated reminders for unpaid invoices").unwrap();
    assert_eq!(idea.format, LineFormat::Csv);
    assert_eq!(idea.title, "Invoice chaser");
    assert_eq!(idea.category, "Fintech");
    assert_eq!(idea.description.as_deref(), Some("Automated reminders for unpaid invoices"));
}

#[test]
fn quoted_csv_fields_keep_embedded_commas() {
    let idea = parser::parse_idea_line(r#""Tutor match, for kids",Edtech,"Find tutors, fast""#).unwrap();
    assert_eq!(idea.format, LineFormat::Csv);
    assert_eq!(idea.title, "Tutor match, for kids");
    assert_eq!(idea.category, "Edtech");
}

#[test]
fn prose_with_commas_falls_through_to_text() {
    let line = "Helps dog owners find parks, which is hard to do in big cities.";
    let idea = parser::parse_idea_line(line).unwrap();
    assert_eq!(idea.format, LineFormat::Text);
    assert_eq!(idea.title, line);
    assert_eq!(idea.category, "general");
    assert_eq!(
        idea.problem.as_deref(),
        Some("Helps dog owners find parks, which is hard to do in big cities")
    );
}

#[test]
fn plain_text_without_pain_has_no_problem() {
    let idea = parser::parse_idea_line("  AI agent for dentists  ").unwrap();
    assert_eq!(idea.format, LineFormat::Text);
    assert_eq!(idea.title, "AI agent for dentists");
    assert_eq!(idea.category, "general");
    assert!(idea.problem.is_none());
}

#[test]
fn labeled_problem_is_extracted_from_text() {
    let idea = parser::parse_idea_line("Dog walker app. Problem: owners cannot find walkers fast").unwrap();
    assert_eq!(idea.problem.as_deref(), Some("owners cannot find walkers fast"));
}

#[test]
fn blank_lines_yield_none() {
    assert!(parser::parse_idea_line("").is_none());
    assert!(parser::parse_idea_line("   \t  ").is_none());
}

#[test]
fn date_embedded_in_delimited_line_is_detected() {
    let idea = parser::parse_idea_line("Meal planner|Food|added 2024-03-05").unwrap();
    assert_eq!(idea.date, Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()));
}

#[test]
fn title_and_category_survive_each_positional_format() {
    let cases = [
        ("Escrow for freelancers", "Fintech", '|', LineFormat::Pipe),
        ("Escrow for freelancers", "Fintech", '\t', LineFormat::Tab),
        ("Escrow for freelancers", "Fintech", ',', LineFormat::Csv),
    ];
    for (title, category, sep, format) in cases {
        let line = format!("{}{}{}{}Holds funds until delivery", title, sep, category, sep);
        let idea = parser::parse_idea_line(&line).unwrap();
        assert_eq!(idea.format, format, "format for {:?}", sep);
        let rebuilt = format!("{}{}{}", idea.title, sep, idea.category);
        assert_eq!(rebuilt, format!("{}{}{}", title, sep, category));
    }

    let json = serde_json::json!({"title": "Escrow for freelancers", "category": "Fintech"}).to_string();
    let idea = parser::parse_idea_line(&json).unwrap();
    assert_eq!((idea.title.as_str(), idea.category.as_str()), ("Escrow for freelancers", "Fintech"));
}

#[test]
fn parse_idea_lines_keeps_order_and_skips_blanks() {
    let text = "First idea|ai\n\nSecond idea|saas\n   \nThird idea";
    let ideas = parser::parse_idea_lines(text);
    let titles: Vec<&str> = ideas.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["First idea", "Second idea", "Third idea"]);
}
