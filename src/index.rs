use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::record::RadarRecord;

/// Forward/prefix token index over each record's tag string.
///
/// Keys are the indexed corpus tokens; postings are record positions in
/// the store (a stable integer handle), kept sorted and deduplicated.
/// Built once per catalog load and read-only afterwards, though
/// [`insert`](Self::insert) supports incremental addition.
#[derive(Debug, Default)]
pub struct SearchIndex {
    postings: HashMap<String, Vec<u32>>,
}

/// Split a tag corpus into indexable tokens: space / comma / semicolon
/// delimited, lowercased.
fn corpus_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every record's tags under its store position.
    pub fn build(records: &[RadarRecord]) -> Self {
        let mut index = Self::new();
        for (i, record) in records.iter().enumerate() {
            index.insert(i as u32, &record.tags);
        }
        debug!(
            records = records.len(),
            terms = index.term_count(),
            "search index built"
        );
        index
    }

    /// Add one document's corpus under position `pos`.
    ///
    /// Positions must be inserted in non-decreasing order for postings to
    /// stay sorted; the store build satisfies this by construction.
    pub fn insert(&mut self, pos: u32, text: &str) {
        for token in corpus_tokens(text) {
            let slot = self.postings.entry(token).or_default();
            if slot.last() != Some(&pos) {
                slot.push(pos);
            }
        }
    }

    /// Positions whose corpus contains `token` as a prefix of any indexed
    /// term (forward-tokenization semantics: recall over precision for
    /// short partial queries).
    ///
    /// A linear scan of the term dictionary is deliberate; the catalog is
    /// small enough that it beats carrying a prefix tree.
    pub fn lookup(&self, token: &str) -> HashSet<u32> {
        let mut out = HashSet::new();
        if token.is_empty() {
            return out;
        }
        for (term, posts) in &self.postings {
            if term.starts_with(token) {
                out.extend(posts.iter().copied());
            }
        }
        out
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(corpora: &[&str]) -> SearchIndex {
        let mut index = SearchIndex::new();
        for (i, text) in corpora.iter().enumerate() {
            index.insert(i as u32, text);
        }
        index
    }

    #[test]
    fn lookup_matches_whole_tokens() {
        let index = index_of(&["japan c band", "japan s band"]);
        assert_eq!(index.lookup("japan"), HashSet::from([0, 1]));
        assert_eq!(index.lookup("c"), HashSet::from([0]));
        assert_eq!(index.lookup("s"), HashSet::from([1]));
    }

    #[test]
    fn lookup_matches_prefixes() {
        let index = index_of(&["tokyo yokohama", "toulouse"]);
        assert_eq!(index.lookup("to"), HashSet::from([0, 1]));
        assert_eq!(index.lookup("tok"), HashSet::from([0]));
        // Suffix / infix never matches.
        assert_eq!(index.lookup("kyo"), HashSet::new());
    }

    #[test]
    fn empty_token_matches_nothing() {
        let index = index_of(&["tokyo"]);
        assert_eq!(index.lookup(""), HashSet::new());
    }

    #[test]
    fn corpus_splits_on_commas_and_semicolons() {
        let index = index_of(&["Japan,Tokyo;JMA  c-band"]);
        assert_eq!(index.lookup("tokyo"), HashSet::from([0]));
        assert_eq!(index.lookup("jma"), HashSet::from([0]));
        assert_eq!(index.lookup("c-band"), HashSet::from([0]));
    }

    #[test]
    fn repeated_tokens_do_not_duplicate_postings() {
        let mut index = index_of(&["japan japan tokyo"]);
        index.insert(1, "japan");
        assert_eq!(index.lookup("japan"), HashSet::from([0, 1]));
    }

    #[test]
    fn build_keys_by_store_position() {
        use serde_json::json;
        let records: Vec<_> = [
            json!({"id": "a", "tags": "japan c"}),
            json!({"id": "b"}),
            json!({"id": "c", "tags": "france x"}),
        ]
        .iter()
        .filter_map(crate::record::RadarRecord::from_value)
        .collect();

        let index = SearchIndex::build(&records);
        assert_eq!(index.lookup("france"), HashSet::from([2]));
        assert_eq!(index.lookup("japan"), HashSet::from([0]));
    }
}
