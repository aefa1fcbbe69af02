use serde_json::Value;
use tracing::warn;

use crate::domain::ticket::TicketDraft;
use crate::error::GenerationError;

/// Soft expectation for the number of generated tickets. Counts outside the
/// range are logged, never rejected.
pub const EXPECTED_MIN_TICKETS: usize = 3;
pub const EXPECTED_MAX_TICKETS: usize = 5;

/// Turn raw model output into validated ticket drafts. Fails only with
/// `MalformedResponse`; items without a usable title or description are
/// dropped rather than failing the whole response.
pub fn parse(raw: &str) -> Result<Vec<TicketDraft>, GenerationError> {
    let body = strip_code_fences(raw.trim());

    let value: Value = serde_json::from_str(body)
        .map_err(|err| GenerationError::MalformedResponse(format!("invalid JSON: {err}")))?;

    let tickets = value
        .get("tickets")
        .and_then(Value::as_array)
        .ok_or_else(|| GenerationError::MalformedResponse("missing tickets array".to_string()))?;

    if !(EXPECTED_MIN_TICKETS..=EXPECTED_MAX_TICKETS).contains(&tickets.len()) {
        warn!(
            count = tickets.len(),
            "provider returned an unexpected number of tickets"
        );
    }

    let mut drafts = Vec::with_capacity(tickets.len());
    for (index, ticket) in tickets.iter().enumerate() {
        let Some(title) = non_empty_string(ticket.get("title")) else {
            warn!(index, "dropping ticket without a usable title");
            continue;
        };
        let Some(description) = non_empty_string(ticket.get("description")) else {
            warn!(index, "dropping ticket without a usable description");
            continue;
        };

        // A non-array criteria value is coerced to empty rather than
        // rejecting the whole item.
        let acceptance_criteria = ticket
            .get("acceptance_criteria")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        drafts.push(TicketDraft {
            title,
            description,
            acceptance_criteria,
        });
    }

    if drafts.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "all tickets were filtered out".to_string(),
        ));
    }

    Ok(drafts)
}

/// Models commonly wrap JSON output in markdown fencing; strip one leading
/// and one trailing fence marker if present.
fn strip_code_fences(text: &str) -> &str {
    let mut body = text;
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(tickets: Value) -> String {
        json!({ "tickets": tickets }).to_string()
    }

    #[test]
    fn parses_well_formed_response() {
        let raw = payload(json!([
            {"title": "Set up schema", "description": "Create tables", "acceptance_criteria": ["tables exist"]},
            {"title": "Add auth", "description": "Login flow", "acceptance_criteria": []},
            {"title": "Ship CI", "description": "Pipeline", "acceptance_criteria": ["builds pass", "tests run"]},
        ]));

        let drafts = parse(&raw).expect("parse failed");
        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].title, "Set up schema");
        assert_eq!(drafts[2].acceptance_criteria, vec!["builds pass", "tests run"]);
    }

    #[test]
    fn strips_markdown_fencing() {
        let raw = format!(
            "```json\n{}\n```",
            payload(json!([{"title": "A", "description": "B"}]))
        );
        let drafts = parse(&raw).expect("parse failed");
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn strips_plain_fencing() {
        let raw = format!(
            "```\n{}\n```",
            payload(json!([{"title": "A", "description": "B"}]))
        );
        assert_eq!(parse(&raw).expect("parse failed").len(), 1);
    }

    #[test]
    fn rejects_broken_json() {
        let err = parse("not json {broken").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn rejects_missing_tickets_array() {
        let err = parse(r#"{"items": []}"#).unwrap_err();
        let GenerationError::MalformedResponse(reason) = err else {
            panic!("expected MalformedResponse");
        };
        assert!(reason.contains("missing tickets array"));
    }

    #[test]
    fn rejects_tickets_of_wrong_type() {
        let err = parse(r#"{"tickets": "nope"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn tolerates_counts_outside_expected_range() {
        let two = payload(json!([
            {"title": "A", "description": "B"},
            {"title": "C", "description": "D"},
        ]));
        assert_eq!(parse(&two).expect("parse failed").len(), 2);

        let six: Vec<Value> = (0..6)
            .map(|i| json!({"title": format!("T{i}"), "description": "D"}))
            .collect();
        assert_eq!(parse(&payload(json!(six))).expect("parse failed").len(), 6);
    }

    #[test]
    fn filters_items_missing_required_fields() {
        let raw = payload(json!([
            {"title": "A", "description": "B"},
            {"title": "", "description": "C"},
            {"description": "D"},
            {"title": "   ", "description": "E"},
            {"title": "F", "description": "  "},
        ]));

        let drafts = parse(&raw).expect("parse failed");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "A");
    }

    #[test]
    fn coerces_non_array_criteria_to_empty() {
        let raw = payload(json!([
            {"title": "A", "description": "B", "acceptance_criteria": "not-an-array"},
        ]));

        let drafts = parse(&raw).expect("parse failed");
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0].acceptance_criteria.is_empty());
    }

    #[test]
    fn fails_when_every_item_is_filtered() {
        let raw = payload(json!([
            {"title": "", "description": ""},
            {"title": "  "},
        ]));

        let err = parse(&raw).unwrap_err();
        let GenerationError::MalformedResponse(reason) = err else {
            panic!("expected MalformedResponse");
        };
        assert!(reason.contains("filtered out"));
    }

    #[test]
    fn trims_surviving_fields() {
        let raw = payload(json!([
            {"title": "  Padded  ", "description": "\tindented\n"},
        ]));

        let drafts = parse(&raw).expect("parse failed");
        assert_eq!(drafts[0].title, "Padded");
        assert_eq!(drafts[0].description, "indented");
    }

    #[test]
    fn parsing_is_deterministic() {
        let raw = payload(json!([
            {"title": "A", "description": "B", "acceptance_criteria": ["x", "y"]},
            {"title": "C", "description": "D"},
        ]));

        let first = parse(&raw).expect("parse failed");
        let second = parse(&raw).expect("parse failed");
        assert_eq!(first, second);
    }
}
