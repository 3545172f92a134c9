use std::collections::HashSet;

use crate::index::SearchIndex;
use crate::normalize::tokenize;
use crate::record::RadarRecord;

/// Store positions matching `query`: per-token prefix lookups intersected
/// across all tokens (a record must match every token).
///
/// An empty or whitespace-only query is a pass-through and returns every
/// position. Results are sorted ascending so output always follows store
/// order, which keeps the pipeline deterministic.
pub fn search_positions(query: &str, index: &SearchIndex, record_count: usize) -> Vec<u32> {
    search_tokens(&tokenize(query), index, record_count)
}

/// Like [`search_positions`] but over an already-tokenized query, for
/// callers that memoize the token list.
pub fn search_tokens(tokens: &[String], index: &SearchIndex, record_count: usize) -> Vec<u32> {
    if tokens.is_empty() {
        return (0..record_count as u32).collect();
    }

    let mut hits: Option<HashSet<u32>> = None;
    for token in tokens {
        let matched = index.lookup(token);
        hits = Some(match hits {
            None => matched,
            Some(prev) => prev.intersection(&matched).copied().collect(),
        });
        if hits.as_ref().is_some_and(HashSet::is_empty) {
            break;
        }
    }

    let mut positions: Vec<u32> = hits.unwrap_or_default().into_iter().collect();
    positions.sort_unstable();
    positions
}

/// Matching records, in store order.
pub fn search<'a>(query: &str, records: &'a [RadarRecord], index: &SearchIndex) -> Vec<&'a RadarRecord> {
    search_positions(query, index, records.len())
        .into_iter()
        .map(|i| &records[i as usize])
        .collect()
}

/// A display text split around the first case-insensitive occurrence of
/// the highlight token. Slices borrow from the original text.
#[derive(Debug, PartialEq, Eq)]
pub struct Highlight<'a> {
    pub before: &'a str,
    pub matched: &'a str,
    pub after: &'a str,
}

/// Locate the first occurrence of `token` in `text`, case-insensitively.
///
/// Display-only: callers mark `matched` and leave the rest untouched. An
/// empty text or token, or no occurrence, yields `None`.
pub fn highlight<'a>(text: &'a str, token: &str) -> Option<Highlight<'a>> {
    if text.is_empty() || token.is_empty() {
        return None;
    }
    let needle = token.to_lowercase();
    for (start, _) in text.char_indices() {
        if let Some(len) = ci_match_len(&text[start..], &needle) {
            return Some(Highlight {
                before: &text[..start],
                matched: &text[start..start + len],
                after: &text[start + len..],
            });
        }
    }
    None
}

/// Byte length of a case-insensitive match of `needle_lower` at the start
/// of `haystack`, or `None`. Char-wise so multi-byte text never splits.
fn ci_match_len(haystack: &str, needle_lower: &str) -> Option<usize> {
    let mut want = needle_lower.chars();
    let mut next = want.next();
    let mut len = 0;

    for c in haystack.chars() {
        if next.is_none() {
            break;
        }
        for lc in c.to_lowercase() {
            match next {
                Some(w) if w == lc => next = want.next(),
                Some(_) => return None,
                // Needle ended inside a multi-char lowercase expansion;
                // the whole source char stays in the match.
                None => {}
            }
        }
        len += c.len_utf8();
    }

    if next.is_none() {
        Some(len)
    } else {
        None
    }
}
