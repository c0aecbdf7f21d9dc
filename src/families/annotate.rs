use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::family::{EnrichedFamilies, FamilyMap, SampleValues};
use crate::core::record::{Dataset, Record, Value, DEFAULT_SEQUENCE_FIELD};
use crate::families::grouping::flatten_families;
use crate::output::Headers;
use crate::utils::records::create_records;

/// Title of the family column in family sheets
pub const FAMILY_COLUMN: &str = "family";

/// Title of the group column in grouped string exports
pub const GROUP_COLUMN: &str = "Group";

/// Index dataset rows by sequence. When a sequence occurs on several rows the
/// last one wins.
fn index_by_sequence<'a>(dataset: &'a Dataset, sequence_field: &str) -> HashMap<&'a str, &'a Record> {
    dataset
        .records
        .iter()
        .filter_map(|r| r.text(sequence_field).map(|s| (s, r)))
        .collect()
}

/// Attach every sample value of `dataset` to the family members.
///
/// Members with no row in the dataset keep an empty sample map. Absent cells
/// on a matched row are written as missing.
pub fn annotate_families(
    families: &FamilyMap,
    dataset: &Dataset,
    sequence_field: &str,
) -> EnrichedFamilies {
    let samples = dataset.sample_fields(sequence_field);
    let rows = index_by_sequence(dataset, sequence_field);

    families
        .iter()
        .map(|(name, members)| {
            let family = members
                .iter()
                .map(|member| {
                    let values = rows.get(member.as_str()).map_or_else(IndexMap::new, |row| {
                        samples
                            .iter()
                            .map(|s| (s.clone(), row.get(s).cloned().unwrap_or_default()))
                            .collect()
                    });
                    (member.clone(), SampleValues { samples: values })
                })
                .collect();
            (name.clone(), family)
        })
        .collect()
}

/// Numeric values of one sample across a family's members
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleProfile {
    pub values: Vec<f64>,
    /// `None` when no member had a numeric value
    pub mean: Option<f64>,
}

impl SampleProfile {
    fn from_values(values: Vec<f64>) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let mean = (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64);
        Self { values, mean }
    }
}

/// Per-sample profile of every family: family name to sample name to profile
pub type FamilyProfiles = IndexMap<String, IndexMap<String, SampleProfile>>;

/// Collect, per family and sample, the numeric values of all member rows.
///
/// Every dataset row whose sequence is a member contributes, so a sequence
/// listed twice in the dataset counts twice. Values that are not numbers are
/// skipped.
pub fn sample_profiles(
    families: &FamilyMap,
    dataset: &Dataset,
    sequence_field: &str,
) -> FamilyProfiles {
    let samples = dataset.sample_fields(sequence_field);

    families
        .iter()
        .map(|(name, members)| {
            let profile = samples
                .iter()
                .map(|sample| {
                    let values = dataset
                        .records
                        .iter()
                        .filter(|r| r.text(sequence_field).is_some_and(|s| members.iter().any(|m| m == s)))
                        .filter_map(|r| r.level(sample))
                        .collect();
                    (sample.clone(), SampleProfile::from_values(values))
                })
                .collect();
            (name.clone(), profile)
        })
        .collect()
}

/// Rows of a grouped export: `sequence, Group, <other fields>` per family member.
///
/// The other fields come from the member's source row (last row wins) in
/// source order; members without a source row get missing values.
pub fn family_member_rows(
    families: &FamilyMap,
    dataset: &Dataset,
    sequence_field: &str,
) -> (Headers, Vec<Record>) {
    let others = dataset.sample_fields(sequence_field);
    let names: Vec<String> = [sequence_field.to_string(), GROUP_COLUMN.to_string()]
        .into_iter()
        .chain(others.iter().cloned())
        .collect();
    let rows = index_by_sequence(dataset, sequence_field);

    let tuples = flatten_families(families)
        .into_iter()
        .map(|(member, key)| {
            let source = rows.get(member.as_str());
            let mut tuple = vec![Value::from(member), Value::from(key)];
            tuple.extend(
                others
                    .iter()
                    .map(|f| source.and_then(|r| r.get(f)).cloned().unwrap_or_default()),
            );
            tuple
        })
        .collect();

    (Headers::identity(&names), create_records(&names, tuples))
}

/// Rows of a family sheet: `family, Aptamer, <sample_names>` per member, then
/// a blank separator row after each family.
///
/// Samples a member has no value for are written as `0`.
pub fn family_sheet_rows<S: AsRef<str>>(
    enriched: &EnrichedFamilies,
    sample_names: &[S],
) -> (Headers, Vec<Record>) {
    let template = |family: &str, sequence: &str| -> Record {
        sample_names.iter().fold(
            Record::new()
                .with(FAMILY_COLUMN, family)
                .with(DEFAULT_SEQUENCE_FIELD, sequence),
            |row, s| row.with(s.as_ref(), 0.0),
        )
    };

    let mut rows = Vec::new();
    for (family, members) in enriched {
        for (sequence, values) in members {
            let mut row = template(family.as_str(), sequence.as_str());
            for (sample, value) in &values.samples {
                row.insert(sample.clone(), value.clone());
            }
            rows.push(row);
        }
        rows.push(template("", ""));
    }

    let headers = Headers::identity(
        [FAMILY_COLUMN, DEFAULT_SEQUENCE_FIELD]
            .into_iter()
            .chain(sample_names.iter().map(|s| s.as_ref())),
    );
    (headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let row = |seq: &str, s1: &str, s2: &str| {
            Record::new()
                .with("Aptamer", seq)
                .with("S1", Value::from_cell(s1))
                .with("S2", Value::from_cell(s2))
        };
        Dataset::new(
            vec!["Aptamer".into(), "S1".into(), "S2".into()],
            vec![
                row("ACGTCAAT", "1", "2"),
                row("TTCAATGG", "3", ""),
                row("ACGTCAAT", "5", "6"),
            ],
        )
    }

    fn families() -> FamilyMap {
        let mut families = FamilyMap::new();
        families.insert(
            "CAAT".into(),
            vec!["ACGTCAAT".into(), "TTCAATGG".into(), "GGGGCAAT".into()],
        );
        families
    }

    #[test]
    fn test_annotate_last_row_wins_and_unknown_members_are_empty() {
        let enriched = annotate_families(&families(), &dataset(), "Aptamer");
        let family = &enriched["CAAT"];

        assert_eq!(family["ACGTCAAT"].samples["S1"], Value::from("5"));
        assert_eq!(family["ACGTCAAT"].samples["S2"], Value::from("6"));
        assert_eq!(family["TTCAATGG"].samples["S2"], Value::Missing);
        assert!(family["GGGGCAAT"].samples.is_empty());

        let members: Vec<&String> = family.keys().collect();
        assert_eq!(members, vec!["ACGTCAAT", "TTCAATGG", "GGGGCAAT"]);
    }

    #[test]
    fn test_sample_profiles() {
        let profiles = sample_profiles(&families(), &dataset(), "Aptamer");
        let caat = &profiles["CAAT"];

        assert_eq!(caat["S1"].values, vec![1.0, 3.0, 5.0]);
        assert_eq!(caat["S1"].mean, Some(3.0));
        assert_eq!(caat["S2"].values, vec![2.0, 6.0]);
        assert_eq!(caat["S2"].mean, Some(4.0));
    }

    #[test]
    fn test_sample_profile_without_values_has_no_mean() {
        let mut families = FamilyMap::new();
        families.insert("NONE".into(), vec!["ZZZZ".into()]);
        let profiles = sample_profiles(&families, &dataset(), "Aptamer");
        assert_eq!(profiles["NONE"]["S1"], SampleProfile::default());
    }

    #[test]
    fn test_family_member_rows_reattach_samples() {
        let (headers, rows) = family_member_rows(&families(), &dataset(), "Aptamer");

        let titles: Vec<&str> = headers.titles().collect();
        assert_eq!(titles, vec!["Aptamer", "Group", "S1", "S2"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].text("Group"), Some("CAAT"));
        assert_eq!(rows[0].text("S1"), Some("5"));
        assert_eq!(rows[2].text("Aptamer"), Some("GGGGCAAT"));
        assert!(rows[2].get("S1").is_some_and(Value::is_missing));
    }

    #[test]
    fn test_family_sheet_rows_default_zero_and_separator() {
        let enriched = annotate_families(&families(), &dataset(), "Aptamer");
        let (headers, rows) = family_sheet_rows(&enriched, &["S1", "S2", "S3"]);

        let titles: Vec<&str> = headers.titles().collect();
        assert_eq!(titles, vec!["family", "Aptamer", "S1", "S2", "S3"]);

        // Three members plus one separator row
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].text("family"), Some("CAAT"));
        assert_eq!(rows[0].text("S1"), Some("5"));
        assert_eq!(rows[0].level("S3"), Some(0.0));
        assert_eq!(rows[2].level("S1"), Some(0.0));

        let separator = &rows[3];
        assert_eq!(separator.text("family"), Some(""));
        assert_eq!(separator.text("Aptamer"), Some(""));
        assert_eq!(separator.level("S2"), Some(0.0));
    }
}
