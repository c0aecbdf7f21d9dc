use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::record::Value;

/// Substring key to the member sequences containing it, in first-seen order
pub type FamilyMap = IndexMap<String, Vec<String>>;

/// On-disk family document: `{ "families": { "<key>": ["<sequence>", ...] } }`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FamilyDocument {
    pub families: FamilyMap,
}

impl FamilyDocument {
    pub fn new(families: FamilyMap) -> Self {
        Self { families }
    }

    /// Number of families
    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Total member count across all families (a sequence in two families counts twice)
    pub fn member_count(&self) -> usize {
        self.families.values().map(Vec::len).sum()
    }
}

/// Per-sequence sample values inside an enriched family document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleValues {
    pub samples: IndexMap<String, Value>,
}

/// Members of one family keyed by sequence
pub type EnrichedFamily = IndexMap<String, SampleValues>;

/// On-disk enriched document:
/// `{ "<family>": { "<sequence>": { "samples": { "<sample>": <value> } } } }`
pub type EnrichedFamilies = IndexMap<String, EnrichedFamily>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_document_json_shape() {
        let mut families = FamilyMap::new();
        families.insert(
            "YZZZ".to_string(),
            vec!["AAA2XYZZZZ".to_string(), "EEE1XYZZZZ".to_string()],
        );
        let doc = FamilyDocument::new(families);

        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"families":{"YZZZ":["AAA2XYZZZZ","EEE1XYZZZZ"]}}"#);
        assert_eq!(doc.member_count(), 2);
    }

    #[test]
    fn test_enriched_json_shape() {
        let json = r#"{"CAAT":{"ACGTCAAT":{"samples":{"S1":"5","S2":null}}}}"#;
        let enriched: EnrichedFamilies = serde_json::from_str(json).unwrap();

        let member = &enriched["CAAT"]["ACGTCAAT"];
        assert_eq!(member.samples["S1"], Value::from("5"));
        assert_eq!(member.samples["S2"], Value::Missing);
        assert_eq!(serde_json::to_string(&enriched).unwrap(), json);
    }
}
