//! Five-field cron expression checks and descriptions.
//!
//! Fields are minute, hour, day of month, month, and day of week. Each field
//! is a comma-separated list of `*`, `n`, or `a-b`, optionally followed by a
//! `/step`. Names such as `MON` or `JAN` are not accepted.

use std::sync::OnceLock;

use cronlytic_common::validation::RangeValidator;
use cronlytic_domain::constants::CRON_FIELD_COUNT;
use regex::Regex;

/// Exact message for a wrong field count.
pub const FIELD_COUNT_MESSAGE: &str = "Cron expression must have exactly 5 fields";

struct CronField {
    name: &'static str,
    min: u32,
    max: u32,
}

const FIELDS: [CronField; CRON_FIELD_COUNT] = [
    CronField { name: "minute", min: 0, max: 59 },
    CronField { name: "hour", min: 0, max: 23 },
    CronField { name: "day", min: 1, max: 31 },
    CronField { name: "month", min: 1, max: 12 },
    CronField { name: "day-of-week", min: 0, max: 7 },
];

const COMMON_PATTERNS: [(&str, &str); 14] = [
    ("* * * * *", "Every minute"),
    ("*/5 * * * *", "Every 5 minutes"),
    ("*/10 * * * *", "Every 10 minutes"),
    ("*/15 * * * *", "Every 15 minutes"),
    ("*/30 * * * *", "Every 30 minutes"),
    ("0 * * * *", "Every hour"),
    ("0 */2 * * *", "Every 2 hours"),
    ("0 */6 * * *", "Every 6 hours"),
    ("0 */12 * * *", "Every 12 hours"),
    ("0 0 * * *", "Daily at midnight"),
    ("0 9 * * *", "Daily at 9:00 AM"),
    ("0 0 * * 0", "Weekly on Sunday at midnight"),
    ("0 0 1 * *", "Monthly on the 1st at midnight"),
    ("0 0 1 1 *", "Yearly on January 1st at midnight"),
];

fn field_charset() -> &'static Regex {
    static CHARSET: OnceLock<Regex> = OnceLock::new();
    CHARSET.get_or_init(|| Regex::new(r"^[0-9*,/\-]+$").expect("static cron charset pattern"))
}

enum FieldProblem {
    Syntax,
    OutOfRange,
}

/// Check a cron expression and return every problem found.
///
/// An empty result means the expression is valid. A wrong field count is
/// reported alone since per-field checks would be meaningless.
pub fn validate_cron_expression(expression: &str) -> Vec<String> {
    let parts: Vec<&str> = expression.split_whitespace().collect();
    if parts.len() != CRON_FIELD_COUNT {
        return vec![FIELD_COUNT_MESSAGE.to_string()];
    }

    parts
        .iter()
        .zip(FIELDS.iter())
        .filter_map(|(value, field)| match check_field(value, field) {
            Ok(()) => None,
            Err(FieldProblem::Syntax) => Some(format!("Invalid {} field: '{value}'", field.name)),
            Err(FieldProblem::OutOfRange) => Some(format!(
                "Invalid {} field: '{value}' (values must be between {} and {})",
                field.name, field.min, field.max
            )),
        })
        .collect()
}

fn check_field(value: &str, field: &CronField) -> Result<(), FieldProblem> {
    if !field_charset().is_match(value) {
        return Err(FieldProblem::Syntax);
    }
    let bounds = RangeValidator::new(field.min, field.max);
    for item in value.split(',') {
        check_item(item, &bounds)?;
    }
    Ok(())
}

fn check_item(item: &str, bounds: &RangeValidator<u32>) -> Result<(), FieldProblem> {
    let (base, step) = match item.split_once('/') {
        Some((base, step)) => (base, Some(step)),
        None => (item, None),
    };

    if let Some(step) = step {
        if parse_number(step)? == 0 {
            return Err(FieldProblem::Syntax);
        }
    }

    if base == "*" {
        return Ok(());
    }

    let (start, end) = match base.split_once('-') {
        Some((start, end)) => (parse_number(start)?, parse_number(end)?),
        None => {
            let single = parse_number(base)?;
            (single, single)
        }
    };

    if !bounds.contains(&start) || !bounds.contains(&end) {
        return Err(FieldProblem::OutOfRange);
    }
    if start > end {
        return Err(FieldProblem::Syntax);
    }
    Ok(())
}

fn parse_number(text: &str) -> Result<u32, FieldProblem> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldProblem::Syntax);
    }
    text.parse().map_err(|_| FieldProblem::OutOfRange)
}

/// Human-readable schedule for common expressions.
pub fn describe_cron(expression: &str) -> String {
    let normalized = expression.split_whitespace().collect::<Vec<_>>().join(" ");
    COMMON_PATTERNS
        .iter()
        .find(|(pattern, _)| *pattern == normalized)
        .map_or_else(|| format!("Custom schedule ({normalized})"), |(_, text)| (*text).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_shapes() {
        for expression in [
            "* * * * *",
            "*/5 * * * *",
            "0 9 * * 1-5",
            "15,45 0-23/2 1 1,6,12 0",
            "59 23 31 12 7",
            "  0   0 * * *  ",
        ] {
            assert!(validate_cron_expression(expression).is_empty(), "{expression}");
        }
    }

    #[test]
    fn wrong_field_count_reports_exact_message() {
        for expression in ["", "* * * *", "* * * * * *", "0 0 * * * 2026"] {
            assert_eq!(validate_cron_expression(expression), vec![FIELD_COUNT_MESSAGE]);
        }
    }

    #[test]
    fn reports_each_bad_field() {
        let problems = validate_cron_expression("60 24 0 13 8");
        assert_eq!(problems.len(), 5);
        assert!(problems[0].starts_with("Invalid minute field: '60'"));
        assert!(problems[4].starts_with("Invalid day-of-week field: '8'"));
    }

    #[test]
    fn rejects_bad_syntax() {
        assert_eq!(validate_cron_expression("a * * * *"), vec!["Invalid minute field: 'a'"]);
        assert_eq!(validate_cron_expression("*/0 * * * *"), vec!["Invalid minute field: '*/0'"]);
        assert_eq!(validate_cron_expression("* 5-1 * * *"), vec!["Invalid hour field: '5-1'"]);
        assert_eq!(validate_cron_expression("* * * JAN *"), vec!["Invalid month field: 'JAN'"]);
        assert_eq!(validate_cron_expression("1, * * * *"), vec!["Invalid minute field: '1,'"]);
    }

    #[test]
    fn describes_known_patterns() {
        assert_eq!(describe_cron("* * * * *"), "Every minute");
        assert_eq!(describe_cron("0  0 * * *"), "Daily at midnight");
        assert_eq!(describe_cron("7 3 * * 2"), "Custom schedule (7 3 * * 2)");
    }
}
