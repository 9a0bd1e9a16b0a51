//! Turns the "Category: $Amount" lines rendered on the dashboard into an
//! [`ExpenseBreakdown`].
//!
//! Lines without a separator and the aggregate total row are skipped. An
//! amount that does not parse as a finite decimal drops the whole line; the
//! rejected line is kept in the [`ExtractionReport`] so callers can log it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::breakdown::{CategoryEntry, ExpenseBreakdown};

/// Separator between the category label and its amount
pub const LABEL_SEPARATOR: char = ':';

/// How category lines are recognised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Substring marking the grand-total row in a label
    pub total_marker: String,
    /// Currency symbol allowed in front of the amount
    pub currency_symbol: String,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            total_marker: "Total".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl ExtractionRules {
    fn is_total_row(&self, label: &str) -> bool {
        !self.total_marker.is_empty() && label.contains(&self.total_marker)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a decimal number")]
    NotANumber(String),
    #[error("amount '{0}' is not finite")]
    NotFinite(String),
}

/// Why a line did not produce a category entry
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoSeparator,
    TotalRow,
    MalformedAmount(AmountParseError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoSeparator => write!(f, "no '{}' separator", LABEL_SEPARATOR),
            SkipReason::TotalRow => write!(f, "total row"),
            SkipReason::MalformedAmount(err) => write!(f, "malformed amount: {}", err),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// Position of the line in the source order
    pub position: usize,
    pub text: String,
    pub reason: SkipReason,
}

impl SkippedLine {
    /// Malformed lines point at bad server output; the others are expected.
    pub fn is_malformed(&self) -> bool {
        matches!(self.reason, SkipReason::MalformedAmount(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    pub breakdown: ExpenseBreakdown,
    pub skipped: Vec<SkippedLine>,
}

impl ExtractionReport {
    pub fn malformed(&self) -> impl Iterator<Item = &SkippedLine> {
        self.skipped.iter().filter(|line| line.is_malformed())
    }
}

/// Parse an amount such as `$120.50`, `-$5` or ` 45 `.
pub fn parse_amount(value: &str, currency_symbol: &str) -> Result<f64, AmountParseError> {
    let trimmed = value.trim();

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed).trim_start()),
    };

    let digits = if currency_symbol.is_empty() {
        unsigned
    } else {
        unsigned.strip_prefix(currency_symbol).unwrap_or(unsigned)
    }
    .trim();

    if digits.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let number: f64 = digits
        .parse()
        .map_err(|_| AmountParseError::NotANumber(trimmed.to_string()))?;

    if !number.is_finite() {
        return Err(AmountParseError::NotFinite(trimmed.to_string()));
    }

    Ok(if negative { -number } else { number })
}

/// Parse a single "Label: $Amount" line.
pub fn parse_category_line(text: &str, rules: &ExtractionRules) -> Result<CategoryEntry, SkipReason> {
    let (label, value) = text
        .split_once(LABEL_SEPARATOR)
        .ok_or(SkipReason::NoSeparator)?;

    let label = label.trim();
    if rules.is_total_row(label) {
        return Err(SkipReason::TotalRow);
    }

    let amount = parse_amount(value, &rules.currency_symbol).map_err(SkipReason::MalformedAmount)?;
    Ok(CategoryEntry::new(label, amount))
}

/// Extract category entries from line texts in document order.
pub fn extract_category_amounts<I, S>(lines: I, rules: &ExtractionRules) -> ExtractionReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ExtractionReport::default();

    for (position, line) in lines.into_iter().enumerate() {
        let text = line.as_ref();
        match parse_category_line(text, rules) {
            Ok(entry) => report.breakdown.push(entry),
            Err(reason) => report.skipped.push(SkippedLine {
                position,
                text: text.to_string(),
                reason,
            }),
        }
    }

    report
}

/// Apply the same row rules to records handed over as structured data.
pub fn filter_records(records: ExpenseBreakdown, rules: &ExtractionRules) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for (position, record) in records.into_iter().enumerate() {
        let label = record.label.trim();
        let reason = if rules.is_total_row(label) {
            Some(SkipReason::TotalRow)
        } else if !record.amount.is_finite() {
            Some(SkipReason::MalformedAmount(AmountParseError::NotFinite(
                record.amount.to_string(),
            )))
        } else {
            None
        };

        match reason {
            Some(reason) => report.skipped.push(SkippedLine {
                position,
                text: format!("{}{} {}", record.label, LABEL_SEPARATOR, record.amount),
                reason,
            }),
            None => report.breakdown.push(CategoryEntry::new(label, record.amount)),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExtractionRules {
        ExtractionRules::default()
    }

    #[test]
    fn test_extracts_categories_and_skips_total() {
        let lines = ["Food: $120.50", "Transport: $45.00", "Total: $165.50"];
        let report = extract_category_amounts(lines, &rules());

        assert_eq!(report.breakdown.labels(), vec!["Food", "Transport"]);
        assert_eq!(report.breakdown.amounts(), vec![120.50, 45.00]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::TotalRow);
        assert_eq!(report.skipped[0].position, 2);
    }

    #[test]
    fn test_empty_input_yields_empty_breakdown() {
        let report = extract_category_amounts(Vec::<String>::new(), &rules());
        assert!(report.breakdown.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_total_marker_matches_anywhere_in_label() {
        let lines = ["Grand Total: $10", "Monthly Total Spend: $10", "Food: $3"];
        let report = extract_category_amounts(lines, &rules());

        assert_eq!(report.breakdown.labels(), vec!["Food"]);
        assert!(report.skipped.iter().all(|s| s.reason == SkipReason::TotalRow));
    }

    #[test]
    fn test_total_marker_is_case_sensitive() {
        let report = extract_category_amounts(["total: $3"], &rules());
        assert_eq!(report.breakdown.labels(), vec!["total"]);
    }

    #[test]
    fn test_lines_without_separator_are_skipped() {
        let lines = ["Expenses by category", "Food: $1.00", ""];
        let report = extract_category_amounts(lines, &rules());

        assert_eq!(report.breakdown.len(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped.iter().all(|s| s.reason == SkipReason::NoSeparator));
        assert_eq!(report.malformed().count(), 0);
    }

    #[test]
    fn test_splits_on_first_separator_only() {
        let entry = parse_category_line("Travel:  $ 12.00 ", &rules()).unwrap();
        assert_eq!(entry, CategoryEntry::new("Travel", 12.0));

        let err = parse_category_line("Fees: $1:30", &rules()).unwrap_err();
        assert!(matches!(err, SkipReason::MalformedAmount(AmountParseError::NotANumber(_))));
    }

    #[test]
    fn test_label_is_trimmed() {
        let entry = parse_category_line("   Health & Fitness  :$30", &rules()).unwrap();
        assert_eq!(entry.label, "Health & Fitness");
        assert_eq!(entry.amount, 30.0);
    }

    #[test]
    fn test_malformed_amount_drops_whole_line() {
        let lines = ["Food: $abc", "Rent: $900", "Misc: $", "Gifts: NaN"];
        let report = extract_category_amounts(lines, &rules());

        assert_eq!(report.breakdown.labels(), vec!["Rent"]);
        assert_eq!(report.breakdown.amounts(), vec![900.0]);
        assert_eq!(report.malformed().count(), 3);
        assert_eq!(report.breakdown.labels().len(), report.breakdown.amounts().len());
    }

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount("$120.50", "$"), Ok(120.5));
        assert_eq!(parse_amount("  $ 7 ", "$"), Ok(7.0));
        assert_eq!(parse_amount("45", "$"), Ok(45.0));
        assert_eq!(parse_amount("-$5.25", "$"), Ok(-5.25));
        assert_eq!(parse_amount("$-5.25", "$"), Ok(-5.25));
        assert_eq!(parse_amount("€3.10", "€"), Ok(3.1));
        assert_eq!(parse_amount("", "$"), Err(AmountParseError::Empty));
        assert_eq!(parse_amount(" $ ", "$"), Err(AmountParseError::Empty));
        assert!(matches!(parse_amount("inf", "$"), Err(AmountParseError::NotFinite(_))));
        assert!(matches!(parse_amount("1,200.00", "$"), Err(AmountParseError::NotANumber(_))));
    }

    #[test]
    fn test_custom_rules() {
        let rules = ExtractionRules {
            total_marker: "Sum".to_string(),
            currency_symbol: "£".to_string(),
        };
        let report = extract_category_amounts(["Food: £4.50", "Sum: £4.50", "Total: £1"], &rules);

        assert_eq!(report.breakdown.labels(), vec!["Food", "Total"]);
        assert_eq!(report.breakdown.amounts(), vec![4.5, 1.0]);
    }

    #[test]
    fn test_filter_records_applies_row_rules() {
        let records: ExpenseBreakdown = vec![
            CategoryEntry::new(" Food ", 10.0),
            CategoryEntry::new("Total", 10.0),
            CategoryEntry::new("Broken", f64::NAN),
        ]
        .into_iter()
        .collect();

        let report = filter_records(records, &rules());

        assert_eq!(report.breakdown.labels(), vec!["Food"]);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.malformed().count(), 1);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::NoSeparator.to_string(), "no ':' separator");
        assert_eq!(
            SkipReason::MalformedAmount(AmountParseError::Empty).to_string(),
            "malformed amount: amount is empty"
        );
    }
}
