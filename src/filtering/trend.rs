use crate::core::record::{Dataset, Record};
use crate::core::types::SmallDatasetPolicy;

/// Threshold used by the cross-dataset comparison
pub const DEFAULT_ENRICHMENT_THRESHOLD: f64 = 10.0;

/// True if the enrichment level strictly increases over every adjacent pair
/// of `samples`, in the given order.
///
/// A tie, a decrease, or a value that is not a number fails the check. With
/// fewer than two samples there is no pair to fail, so the record passes.
pub fn is_rising<S: AsRef<str>>(record: &Record, samples: &[S]) -> bool {
    samples.windows(2).all(|pair| {
        match (record.level(pair[0].as_ref()), record.level(pair[1].as_ref())) {
            (Some(current), Some(next)) => current < next,
            _ => false,
        }
    })
}

/// Threshold check over exactly the given samples.
///
/// With `require_all` every sample must be `>= threshold`; otherwise a single
/// sample is enough. Values that are not numbers fail their sample. An empty
/// sample list never passes.
pub fn passes_threshold<S: AsRef<str>>(
    record: &Record,
    samples: &[S],
    threshold: f64,
    require_all: bool,
) -> bool {
    if samples.is_empty() {
        return false;
    }
    let clears = |s: &S| record.level(s.as_ref()).is_some_and(|v| v >= threshold);
    if require_all {
        samples.iter().all(clears)
    } else {
        samples.iter().any(clears)
    }
}

/// The "consistently rising and enriched" filter.
///
/// A record is kept when it passes the threshold check (skipped entirely when
/// `threshold` is `None`) and its levels strictly rise across all samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendFilter {
    pub threshold: Option<f64>,
    pub policy: SmallDatasetPolicy,
}

impl Default for TrendFilter {
    fn default() -> Self {
        Self {
            threshold: Some(DEFAULT_ENRICHMENT_THRESHOLD),
            policy: SmallDatasetPolicy::Legacy,
        }
    }
}

impl TrendFilter {
    pub fn new(threshold: Option<f64>) -> Self {
        Self {
            threshold,
            policy: SmallDatasetPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SmallDatasetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether every scanned sample has to clear the threshold
    #[must_use]
    pub fn require_all(&self, sample_count: usize) -> bool {
        match self.policy {
            SmallDatasetPolicy::Legacy => sample_count <= 2,
            SmallDatasetPolicy::Uniform => false,
        }
    }

    /// The samples the threshold check scans.
    ///
    /// Under the legacy policy a dataset with more than two samples is
    /// scanned up to, but not including, its final sample.
    pub fn threshold_samples<'a, S>(&self, samples: &'a [S]) -> &'a [S] {
        match self.policy {
            SmallDatasetPolicy::Legacy if samples.len() > 2 => &samples[..samples.len() - 1],
            _ => samples,
        }
    }

    pub fn passes<S: AsRef<str>>(&self, record: &Record, samples: &[S]) -> bool {
        if let Some(threshold) = self.threshold {
            let scanned = self.threshold_samples(samples);
            if !passes_threshold(record, scanned, threshold, self.require_all(samples.len())) {
                return false;
            }
        }
        is_rising(record, samples)
    }

    /// Records that pass, in input order
    pub fn apply<S: AsRef<str>>(&self, records: &[Record], samples: &[S]) -> Vec<Record> {
        records
            .iter()
            .filter(|r| self.passes(r, samples))
            .cloned()
            .collect()
    }

    /// Filter a dataset using its own sample fields, keeping its schema
    pub fn filter_dataset(&self, dataset: &Dataset, sequence_field: &str) -> Dataset {
        let samples = dataset.sample_fields(sequence_field);
        dataset.with_records(self.apply(&dataset.records, &samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Value;

    fn record(levels: &[&str]) -> (Record, Vec<String>) {
        let samples: Vec<String> = (1..=levels.len()).map(|i| format!("S{i}")).collect();
        let record = samples
            .iter()
            .zip(levels)
            .map(|(s, v)| (s.clone(), Value::from_cell(v)))
            .chain(std::iter::once(("Aptamer".to_string(), Value::from("ACGT"))))
            .collect();
        (record, samples)
    }

    #[test]
    fn test_rising_strict() {
        let (r, s) = record(&["1", "5", "10"]);
        assert!(is_rising(&r, &s));

        let (r, s) = record(&["1", "10", "5"]);
        assert!(!is_rising(&r, &s));

        let (r, s) = record(&["5", "5", "10"]);
        assert!(!is_rising(&r, &s));
    }

    #[test]
    fn test_rising_non_numeric_fails() {
        let (r, s) = record(&["1", "", "10"]);
        assert!(!is_rising(&r, &s));

        let (r, s) = record(&["1", "abc"]);
        assert!(!is_rising(&r, &s));
    }

    #[test]
    fn test_rising_single_sample_passes() {
        let (r, s) = record(&["3"]);
        assert!(is_rising(&r, &s));
    }

    #[test]
    fn test_threshold_require_all_two_samples() {
        let (r, s) = record(&["5", "15"]);
        assert!(!passes_threshold(&r, &s, 10.0, true));
        assert!(passes_threshold(&r, &s, 10.0, false));
    }

    #[test]
    fn test_threshold_nan_fails_sample() {
        let (r, s) = record(&["x", "15"]);
        assert!(!passes_threshold(&r, &s, 10.0, true));
        assert!(passes_threshold(&r, &s, 10.0, false));

        let (r, s) = record(&["", ""]);
        assert!(!passes_threshold(&r, &s, 0.0, false));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let (r, s) = record(&["10"]);
        assert!(passes_threshold(&r, &s, 10.0, true));
    }

    #[test]
    fn test_legacy_two_sample_dataset_requires_all() {
        // [5, 15] rises, but 5 < 10 and two-sample datasets need every sample
        let filter = TrendFilter::new(Some(10.0));
        let (r, s) = record(&["5", "15"]);
        assert!(filter.require_all(s.len()));
        assert!(!filter.passes(&r, &s));

        let (r, s) = record(&["11", "15"]);
        assert!(filter.passes(&r, &s));
    }

    #[test]
    fn test_legacy_scan_skips_final_sample_for_larger_datasets() {
        let filter = TrendFilter::new(Some(10.0));
        // Only the final sample clears the threshold, and it is not scanned
        let (r, s) = record(&["1", "2", "50"]);
        assert_eq!(filter.threshold_samples(&s).len(), 2);
        assert!(!filter.passes(&r, &s));

        // Any scanned sample clearing the threshold is enough
        let (r, s) = record(&["1", "12", "50"]);
        assert!(filter.passes(&r, &s));
    }

    #[test]
    fn test_uniform_policy_scans_every_sample_with_any_hit() {
        let filter = TrendFilter::new(Some(10.0)).with_policy(SmallDatasetPolicy::Uniform);

        let (r, s) = record(&["5", "15"]);
        assert!(!filter.require_all(s.len()));
        assert!(filter.passes(&r, &s));

        let (r, s) = record(&["1", "2", "50"]);
        assert_eq!(filter.threshold_samples(&s).len(), 3);
        assert!(filter.passes(&r, &s));
    }

    #[test]
    fn test_no_threshold_only_checks_trend() {
        let filter = TrendFilter::new(None);
        let (r, s) = record(&["1", "2"]);
        assert!(filter.passes(&r, &s));

        let (r, s) = record(&["2", "1"]);
        assert!(!filter.passes(&r, &s));
    }

    #[test]
    fn test_filter_dataset_uses_sample_fields() {
        let dataset = Dataset::new(
            vec!["Aptamer".into(), "S1".into(), "S2".into(), "S3".into()],
            vec![
                Record::new()
                    .with("Aptamer", "A")
                    .with("S1", "11")
                    .with("S2", "20")
                    .with("S3", "30"),
                Record::new()
                    .with("Aptamer", "B")
                    .with("S1", "11")
                    .with("S2", "5")
                    .with("S3", "30"),
            ],
        );
        let kept = TrendFilter::default().filter_dataset(&dataset, "Aptamer");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.records[0].text("Aptamer"), Some("A"));
    }
}
