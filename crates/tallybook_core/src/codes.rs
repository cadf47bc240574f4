//! Business-code generator.
//!
//! # Responsibility
//! - Produce human-readable sequential codes of the form `PREFIX-SCOPE-NNNN`.
//!
//! # Invariants
//! - Deterministic: the next code depends only on the existing code set, so
//!   regenerating after an import yields the same result.
//! - `NNNN` is the smallest positive integer unused within the scope,
//!   zero-padded to at least four digits.
//! - Codes that do not parse are ignored when computing the next number.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// The entity families that carry business codes or invoice numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    Client,
    Project,
    Timesheet,
    Invoice,
    Expense,
}

impl CodeKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Client => "CLT",
            Self::Project => "PRJ",
            Self::Timesheet => "TSH",
            Self::Invoice => "INV",
            Self::Expense => "EXP",
        }
    }
}

static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+)-(.+)-(\d+)$").expect("code pattern is valid"));

/// Returns the next free code for `kind` within `scope`.
///
/// `scope` is the calendar year (`2026`) for clients, projects, invoices and
/// expenses, or the year-month (`2026-08`) for timesheets. `existing` is the
/// full set of codes already issued for the entity family; codes from other
/// scopes or with foreign shapes are skipped.
pub fn next_code<'a>(
    kind: CodeKind,
    existing: impl IntoIterator<Item = &'a str>,
    scope: &str,
) -> String {
    let prefix = kind.prefix();
    let used: BTreeSet<u64> = existing
        .into_iter()
        .filter_map(|code| parse_sequence(code, prefix, scope))
        .collect();

    let mut next = 1u64;
    while used.contains(&next) {
        next += 1;
    }

    format!("{prefix}-{scope}-{next:04}")
}

/// Extracts the sequence number from a code matching `prefix` and `scope`.
fn parse_sequence(code: &str, prefix: &str, scope: &str) -> Option<u64> {
    let captures = CODE_PATTERN.captures(code.trim())?;
    if &captures[1] != prefix || &captures[2] != scope {
        return None;
    }
    captures[3].parse().ok()
}

/// Formats the year scope for a calendar date.
pub fn year_scope(date: chrono::NaiveDate) -> String {
    date.format("%Y").to_string()
}

/// The year scope for the current wall-clock date.
pub fn current_year_scope() -> String {
    year_scope(chrono::Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::{next_code, CodeKind};

    #[test]
    fn first_code_in_empty_scope_is_0001() {
        assert_eq!(next_code(CodeKind::Client, [], "2026"), "CLT-2026-0001");
        assert_eq!(
            next_code(CodeKind::Timesheet, [], "2026-08"),
            "TSH-2026-08-0001"
        );
    }

    #[test]
    fn fills_the_smallest_gap() {
        let existing = ["INV-2026-0001", "INV-2026-0002", "INV-2026-0004"];
        assert_eq!(next_code(CodeKind::Invoice, existing, "2026"), "INV-2026-0003");
    }

    #[test]
    fn scopes_are_independent() {
        let existing = ["EXP-2025-0001", "EXP-2025-0002"];
        assert_eq!(next_code(CodeKind::Expense, existing, "2026"), "EXP-2026-0001");
    }

    #[test]
    fn timesheet_scope_includes_the_month() {
        let existing = ["TSH-2026-08-0001", "TSH-2026-07-0002"];
        assert_eq!(
            next_code(CodeKind::Timesheet, existing, "2026-08"),
            "TSH-2026-08-0002"
        );
    }

    #[test]
    fn unparseable_codes_are_ignored() {
        let existing = ["garbage", "CLT-2026-x1", "CLT--0002", "CLT-2026-0001"];
        assert_eq!(next_code(CodeKind::Client, existing, "2026"), "CLT-2026-0002");
    }

    #[test]
    fn sequence_grows_past_the_pad_width() {
        let existing: Vec<String> = (1..=9999)
            .map(|n| format!("PRJ-2026-{n:04}"))
            .collect();
        let refs = existing.iter().map(String::as_str);
        assert_eq!(next_code(CodeKind::Project, refs, "2026"), "PRJ-2026-10000");
    }

    #[test]
    fn generation_is_deterministic() {
        let existing = ["CLT-2026-0002"];
        let first = next_code(CodeKind::Client, existing, "2026");
        let second = next_code(CodeKind::Client, existing, "2026");
        assert_eq!(first, second);
        assert_eq!(first, "CLT-2026-0001");
    }
}
