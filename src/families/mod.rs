//! Substring families of aptamer sequences.
//!
//! A family is keyed by a substring of fixed length and holds every sequence
//! that contains it. Grouping is deliberately loose: without a target string
//! every substring seen becomes a key, so a family only means its members
//! share that exact stretch of `k` characters.
//!
//! ```text
//! AAA2XYZZZZ ─┐          YZZZ → [AAA2XYZZZZ, EEE1XYZZZZ]
//! EEE1XYZZZZ ─┼─ k = 4 → ZZZZ → [AAA2XYZZZZ, EEE1XYZZZZ]
//! CCCCCCCCCC ─┘          CCCC → [CCCCCCCCCC]
//!                        ...
//! ```
//!
//! - [`grouping`]: the grouper, the size and key filters, flattening
//! - [`annotate`]: attaching dataset sample values to family members, and
//!   the tabular views built from them
//! - [`builder`]: the dataset-to-family-document pipeline

pub mod annotate;
pub mod builder;
pub mod grouping;

pub use annotate::{
    annotate_families, family_member_rows, family_sheet_rows, sample_profiles, FamilyProfiles,
    SampleProfile,
};
pub use builder::{build_families, FamilyBuildOptions, FamilyError};
pub use grouping::{
    filter_by_size, find_matching_substrings, flatten_families, retain_keys_containing,
    DEFAULT_PROGRESS_INTERVAL,
};
