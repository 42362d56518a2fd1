use std::collections::BTreeMap;

use crate::config::ColumnNames;

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

/// Interpret a text cell as a number.
///
/// Total: anything that is not a finite number (including the empty string)
/// becomes `None` instead of an error.
pub fn coerce_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Interpret a text cell as a calendar year. `"2012"` and `"2012.0"` both
/// give `Some(2012)`; fractional or out-of-range values give `None`.
pub fn coerce_year(text: &str) -> Option<i32> {
    coerce_number(text).and_then(year_from_f64)
}

/// Integral, `i32`-sized floats only.
pub fn year_from_f64(value: f64) -> Option<i32> {
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single movie. Never mutated after the loader builds it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub title: String,
    /// Box-office gross in currency units.
    pub gross: Option<f64>,
    /// Review score.
    pub score: Option<f64>,
    pub year: Option<i32>,
    /// Empty means "unknown director".
    pub director: String,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All records plus per-column counts of cells that coerced to null.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// column_name → number of rows whose value was missing or not numeric.
    pub missing: BTreeMap<String, usize>,
}

impl Dataset {
    /// Build the dataset and tally null numeric fields.
    pub fn from_records(records: Vec<Record>, columns: &ColumnNames) -> Self {
        let mut missing = BTreeMap::new();
        let counts = [
            (&columns.gross, records.iter().filter(|r| r.gross.is_none()).count()),
            (&columns.score, records.iter().filter(|r| r.score.is_none()).count()),
            (&columns.year, records.iter().filter(|r| r.year.is_none()).count()),
        ];
        for (col, n) in counts {
            if n > 0 {
                missing.insert(col.clone(), n);
            }
        }
        Dataset { records, missing }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_number_accepts_plain_numbers() {
        assert_eq!(coerce_number("100"), Some(100.0));
        assert_eq!(coerce_number(" 7.5 "), Some(7.5));
        assert_eq!(coerce_number("-3"), Some(-3.0));
        assert_eq!(coerce_number("1e9"), Some(1e9));
    }

    #[test]
    fn coerce_number_maps_junk_to_none() {
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("   "), None);
        assert_eq!(coerce_number("N/A"), None);
        assert_eq!(coerce_number("$100"), None);
        assert_eq!(coerce_number("NaN"), None);
        assert_eq!(coerce_number("inf"), None);
    }

    #[test]
    fn coerce_year_requires_integral_values() {
        assert_eq!(coerce_year("2012"), Some(2012));
        assert_eq!(coerce_year("2012.0"), Some(2012));
        assert_eq!(coerce_year("2012.5"), None);
        assert_eq!(coerce_year("1e12"), None);
        assert_eq!(coerce_year(""), None);
    }

    #[test]
    fn dataset_counts_missing_fields() {
        let records = vec![
            Record {
                gross: Some(1.0),
                score: None,
                year: Some(2011),
                ..Record::default()
            },
            Record::default(),
        ];
        let ds = Dataset::from_records(records, &ColumnNames::default());
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.missing.get("gross"), Some(&1));
        assert_eq!(ds.missing.get("score"), Some(&2));
        assert_eq!(ds.missing.get("year"), Some(&1));
    }
}
