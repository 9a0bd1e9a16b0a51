use serde::{Deserialize, Serialize};

/// One expense category and its total for the displayed period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub label: String,
    pub amount: f64,
}

impl CategoryEntry {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Ordered per-category totals, in the order the page lists them.
///
/// Entries are stored as whole records, so the label and amount views
/// always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseBreakdown {
    entries: Vec<CategoryEntry>,
}

impl ExpenseBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: CategoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category labels, parallel to [`ExpenseBreakdown::amounts`]
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }

    /// Category amounts, parallel to [`ExpenseBreakdown::labels`]
    pub fn amounts(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.amount).collect()
    }

    /// Sum of all category amounts
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

impl FromIterator<CategoryEntry> for ExpenseBreakdown {
    fn from_iter<I: IntoIterator<Item = CategoryEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ExpenseBreakdown {
    type Item = CategoryEntry;
    type IntoIter = std::vec::IntoIter<CategoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
