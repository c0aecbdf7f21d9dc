use std::collections::HashSet;

use tracing::info;

use crate::core::family::FamilyMap;

/// Default number of processed strings between progress lines
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Every length-`key_length` substring of `s`, in order of start offset.
///
/// Windows are taken on character boundaries. A string shorter than
/// `key_length` (or a zero length) yields nothing.
pub fn substrings(s: &str, key_length: usize) -> impl Iterator<Item = &str> {
    let mut bounds: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
    bounds.push(s.len());
    let windows = if key_length == 0 || bounds.len() <= key_length {
        0
    } else {
        bounds.len() - key_length
    };

    (0..windows).map(move |start| &s[bounds[start]..bounds[start + key_length]])
}

/// Group `strings` into families keyed by shared substrings of `key_length`.
///
/// Every substring of every input string becomes (or extends) a family; when
/// `target` is given only substrings that also occur in the target are kept.
/// Members appear once per family, in first-seen order. An input string that
/// repeats an earlier one contributes nothing new.
///
/// Logs `"<done>/<total>"` every `progress_interval` strings (never when 0).
///
/// # Examples
///
/// ```
/// use aptamer_families::families::find_matching_substrings;
///
/// let strings = ["AAA2XYZZZZ", "EEE1XYZZZZ", "CCCCCCCCCC"];
/// let families = find_matching_substrings(&strings, 4, None, 0);
/// assert_eq!(families["YZZZ"], vec!["AAA2XYZZZZ", "EEE1XYZZZZ"]);
/// assert_eq!(families["CCCC"], vec!["CCCCCCCCCC"]);
/// ```
pub fn find_matching_substrings<S: AsRef<str>>(
    strings: &[S],
    key_length: usize,
    target: Option<&str>,
    progress_interval: usize,
) -> FamilyMap {
    let anchors: Option<HashSet<&str>> = target.map(|t| substrings(t, key_length).collect());

    let mut families = FamilyMap::new();
    let mut processed: HashSet<&str> = HashSet::new();
    let total = strings.len();

    for (i, s) in strings.iter().enumerate() {
        let s = s.as_ref();
        if processed.insert(s) {
            let mut keys: HashSet<&str> = HashSet::new();
            for key in substrings(s, key_length) {
                if anchors.as_ref().is_some_and(|a| !a.contains(key)) || !keys.insert(key) {
                    continue;
                }
                families
                    .entry(key.to_string())
                    .or_default()
                    .push(s.to_string());
            }
        }

        if progress_interval > 0 && (i + 1) % progress_interval == 0 {
            info!("{}/{}", i + 1, total);
        }
    }

    families
}

/// Keep only families with at least `min_members` members.
///
/// Smaller families are dropped whole. Applying this twice with the same
/// threshold gives the same result as applying it once.
#[must_use]
pub fn filter_by_size(mut families: FamilyMap, min_members: usize) -> FamilyMap {
    families.retain(|_, members| members.len() >= min_members);
    families
}

/// Keep only families whose key contains `substring`
#[must_use]
pub fn retain_keys_containing(mut families: FamilyMap, substring: &str) -> FamilyMap {
    families.retain(|key, _| key.contains(substring));
    families
}

/// Flatten families into `(member, key)` pairs, family by family.
///
/// A sequence belonging to several families appears once per family.
pub fn flatten_families(families: &FamilyMap) -> Vec<(String, String)> {
    families
        .iter()
        .flat_map(|(key, members)| members.iter().map(move |m| (m.clone(), key.clone())))
        .collect()
}
