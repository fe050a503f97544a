//! Textual Candid helpers for the canister call boundary.
//!
//! Outbound: encodes the query topic as a `(record { topic = "…" })`
//! argument with full text escaping, so caller input is never spliced raw
//! into a call payload. Inbound: unwraps the self-describing value syntax
//! the canister tooling prints around a text reply.

/// Escape a string for use inside a Candid text literal.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Build the textual record argument for a topic query.
pub fn encode_topic_record(topic: &str) -> String {
    format!("(record {{ topic = \"{}\" }})", escape_text(topic))
}

/// Strip the value wrapping from a raw canister reply: one enclosing pair
/// of parentheses, then one enclosing pair of double quotes, each only if
/// present on both ends of the trimmed text. Total — unwrapped or empty
/// input comes back unchanged apart from trimming.
pub fn unwrap_text_value(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        s = inner.trim();
    }
    if let Some(inner) = s.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        s = inner;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_parens_and_quotes() {
        assert_eq!(unwrap_text_value("(\"hello world\")"), "hello world");
    }

    #[test]
    fn test_unwrap_already_plain_is_unchanged() {
        assert_eq!(unwrap_text_value("hello"), "hello");
    }

    #[test]
    fn test_unwrap_trims_whitespace() {
        assert_eq!(unwrap_text_value("  (\"hi\")\n"), "hi");
        assert_eq!(unwrap_text_value("  plain  "), "plain");
    }

    #[test]
    fn test_unwrap_is_idempotent() {
        let once = unwrap_text_value("(\"hello\")");
        assert_eq!(unwrap_text_value(once), once);
    }

    #[test]
    fn test_unwrap_empty_and_degenerate_input() {
        assert_eq!(unwrap_text_value(""), "");
        assert_eq!(unwrap_text_value("\""), "\"");
        assert_eq!(unwrap_text_value("()"), "");
    }

    #[test]
    fn test_unwrap_requires_both_ends() {
        // A lone opening paren is not an enclosing pair.
        assert_eq!(unwrap_text_value("(partial"), "(partial");
        assert_eq!(unwrap_text_value("partial)"), "partial)");
    }

    #[test]
    fn test_unwrap_strips_only_one_layer() {
        assert_eq!(unwrap_text_value("((\"x\"))"), "(\"x\")");
    }

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape_text("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_text("a\\b"), "a\\\\b");
        assert_eq!(escape_text("line1\nline2"), "line1\\nline2");
    }

    #[test]
    fn test_encode_topic_record_plain() {
        assert_eq!(
            encode_topic_record("quantum computing"),
            "(record { topic = \"quantum computing\" })"
        );
    }

    #[test]
    fn test_encode_topic_record_neutralizes_injection() {
        let encoded = encode_topic_record("x\" }); rm -rf (record { y = \"");
        // The closing quote of the payload must be escaped, so the record
        // still contains exactly one unescaped string literal.
        assert_eq!(
            encoded,
            "(record { topic = \"x\\\" }); rm -rf (record { y = \\\"\" })"
        );
    }
}
