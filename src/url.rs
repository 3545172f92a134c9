//! URL state sync: a pure adapter pair between the committed search
//! string and the `q` query parameter. Callers own the actual location;
//! these functions only translate, so they stay platform-independent.

use url::form_urlencoded;

use crate::constants::QUERY_PARAM;

/// Initial committed query from a location's query string, if any.
///
/// Accepts the string with or without its leading `?`. An absent or
/// empty `q` seeds nothing.
pub fn initial_query(query_string: &str) -> Option<String> {
    let qs = query_string.strip_prefix('?').unwrap_or(query_string);
    form_urlencoded::parse(qs.as_bytes())
        .find(|(k, _)| k == QUERY_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Rewrite a query string so `q` reflects the committed query.
///
/// Replace semantics: unrelated parameters and the parameter's original
/// position are preserved; an empty committed query removes `q` entirely
/// instead of writing an empty value. The caller applies the result
/// without creating a history entry.
pub fn sync_query(query_string: &str, committed: &str) -> String {
    let qs = query_string.strip_prefix('?').unwrap_or(query_string);
    let mut out = form_urlencoded::Serializer::new(String::new());
    let mut wrote = false;

    for (k, v) in form_urlencoded::parse(qs.as_bytes()) {
        if k == QUERY_PARAM {
            if !committed.is_empty() && !wrote {
                out.append_pair(QUERY_PARAM, committed);
                wrote = true;
            }
        } else {
            out.append_pair(&k, &v);
        }
    }
    if !committed.is_empty() && !wrote {
        out.append_pair(QUERY_PARAM, committed);
    }
    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_query_reads_and_decodes_q() {
        assert_eq!(initial_query("?q=tokyo"), Some("tokyo".into()));
        assert_eq!(initial_query("q=tokyo"), Some("tokyo".into()));
        assert_eq!(initial_query("?q=japan%20c"), Some("japan c".into()));
        assert_eq!(initial_query("?q=japan+c"), Some("japan c".into()));
        assert_eq!(initial_query("?zoom=5&q=osaka"), Some("osaka".into()));
    }

    #[test]
    fn initial_query_ignores_absent_or_empty_q() {
        assert_eq!(initial_query(""), None);
        assert_eq!(initial_query("?zoom=5"), None);
        assert_eq!(initial_query("?q="), None);
    }

    #[test]
    fn sync_query_sets_and_replaces_q() {
        assert_eq!(sync_query("", "tokyo"), "q=tokyo");
        assert_eq!(sync_query("?q=osaka", "tokyo"), "q=tokyo");
        assert_eq!(sync_query("?q=osaka&zoom=5", "tokyo"), "q=tokyo&zoom=5");
        assert_eq!(sync_query("?zoom=5", "japan c"), "zoom=5&q=japan+c");
    }

    #[test]
    fn sync_query_removes_q_when_committed_is_empty() {
        assert_eq!(sync_query("?q=tokyo", ""), "");
        assert_eq!(sync_query("?q=tokyo&zoom=5", ""), "zoom=5");
        assert_eq!(sync_query("?zoom=5", ""), "zoom=5");
    }

    #[test]
    fn round_trip_preserves_the_committed_query() {
        let qs = sync_query("", "japan c band");
        assert_eq!(initial_query(&qs), Some("japan c band".into()));
    }
}
