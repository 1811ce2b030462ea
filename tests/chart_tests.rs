use chrono::{TimeZone, Utc};
use ideascope::chart::{parse_chart_line, parse_chart_lines};

#[test]
fn parses_five_field_line() {
    let e = parse_chart_line("2024-03-05|a@x.io|Idea A|72.6|Fintech/AI").expect("entry");
    assert_eq!(e.date, "2024-03-05");
    assert_eq!(e.date_obj, Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()));
    assert_eq!(e.email, "a@x.io");
    assert_eq!(e.name, "Idea A");
    assert_eq!(e.score, 73);
    assert_eq!(e.categories().collect::<Vec<_>>(), vec!["Fintech", "AI"]);
}

#[test]
fn extra_pipes_stay_in_category() {
    let e = parse_chart_line("2024-03-05|a@x.io|Idea|50|Food|Delivery").unwrap();
    assert_eq!(e.category, "Food|Delivery");
}

#[test]
fn unparseable_date_keeps_entry_without_date_obj() {
    let e = parse_chart_line("last week|a@x.io|Idea|50|Food").unwrap();
    assert_eq!(e.date, "last week");
    assert!(e.date_obj.is_none());
}

#[test]
fn malformed_lines_are_skipped() {
    assert!(parse_chart_line("2024-03-05|a@x.io|Idea|50").is_none());
    assert!(parse_chart_line("2024-03-05|a@x.io|Idea|high|Food").is_none());
    assert!(parse_chart_line("   ").is_none());

    let entries = parse_chart_lines(
        "2024-03-05|a@x.io|A|50|Food\nbroken line\n2024-03-06|b@x.io|B|NaN|Food\n2024-03-06|c@x.io|C|90|Travel\n",
    );
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);
}

#[test]
fn serializes_date_obj_and_hides_email() {
    let e = parse_chart_line("2024-03-05|a@x.io|Idea A|70|Food").unwrap();
    let v = serde_json::to_value(&e).unwrap();
    assert!(v.get("dateObj").is_some());
    assert!(v.get("email").is_none());
    assert_eq!(v["score"], 70);
}
