//! Escaping and list-joining primitives for statement assembly.
//!
//! Three quoting levels, mirroring where a fragment lands in the generated
//! statement:
//!
//! - [`plain`] - free text substituted into a raw template position (table
//!   references, filter predicates, metric expressions). Not quotable, so the
//!   only defense is scrubbing the statement separator.
//! - [`single_quote`] - string literal position.
//! - [`double_quote`] - identifier position.
//!
//! All functions are total over well-formed strings.

/// Phrase substituted for `;` by [`plain`].
pub const SEMICOLON_WARNING: &str = " SEMICOLON_REMOVED ";

/// Scrub a fragment destined for a raw template position.
///
/// The host executes exactly one read-only statement; replacing every `;`
/// keeps an embedded fragment from terminating it and starting another. The
/// substitution is observable in the generated text rather than an error.
pub fn plain(s: &str) -> String {
    s.replace(';', SEMICOLON_WARNING)
}

/// Quote a string literal, doubling embedded single quotes.
pub fn single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote an identifier, doubling embedded double quotes.
pub fn double_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// [`plain`] applied element-wise, order preserving.
pub fn plain_list(items: &[String]) -> Vec<String> {
    items.iter().map(|s| plain(s)).collect()
}

/// [`single_quote`] applied element-wise, order preserving.
pub fn single_quote_list(items: &[String]) -> Vec<String> {
    items.iter().map(|s| single_quote(s)).collect()
}

/// [`double_quote`] applied element-wise, order preserving.
pub fn double_quote_list(items: &[String]) -> Vec<String> {
    items.iter().map(|s| double_quote(s)).collect()
}

/// Join elements with a separator, or `None` when there is nothing to join.
///
/// Returning `None` instead of an empty string lets callers drop an entire
/// clause (no `WHERE`, no `USING`) rather than emit a malformed fragment.
pub fn join(items: &[String], separator: &str) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.join(separator))
    }
}
