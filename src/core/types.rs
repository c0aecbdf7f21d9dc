use serde::{Deserialize, Serialize};

/// Output resource format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportType {
    /// Delimited text, written as `<name>.csv`
    Csv,
    /// Spreadsheet workbook with a single sheet, written as `<name>.xlsx`
    Excel,
}

impl ExportType {
    /// File extension written for this export type
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }

    /// Parse a user-supplied export type name (`csv` or `excel`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "excel" => Some(Self::Excel),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Excel => write!(f, "excel"),
        }
    }
}

/// How enrichment checks treat datasets with at most two sample fields
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SmallDatasetPolicy {
    /// With <= 2 samples every sample must clear the threshold, and the
    /// threshold scan includes the final sample. With more samples the scan
    /// stops before the final sample and any single hit passes.
    #[default]
    Legacy,
    /// Every sample is scanned and any single hit passes, regardless of
    /// how many samples the dataset has
    Uniform,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_type_parse() {
        assert_eq!(ExportType::parse("csv"), Some(ExportType::Csv));
        assert_eq!(ExportType::parse("Excel"), Some(ExportType::Excel));
        assert_eq!(ExportType::parse("pdf"), None);
        assert_eq!(ExportType::Excel.extension(), "xlsx");
    }

    #[test]
    fn test_policy_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: SmallDatasetPolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"uniform\"").unwrap();
        assert_eq!(w.policy, SmallDatasetPolicy::Uniform);
    }
}
