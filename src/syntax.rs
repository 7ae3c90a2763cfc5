//! Delimiter syntax handling for directive tokens.
//! A directive key may be wrapped by any configured (open, close) pair;
//! every strategy renders its tokens once per configured pair.

/// Prefix of a conditional block start token.
pub const IF_PREFIX: &str = "if";
/// Prefix of an inverse conditional block start token.
pub const IF_NOT_PREFIX: &str = "if!";
/// Prefix of a conditional block terminator token.
pub const END_PREFIX: &str = "end";
/// Prefix of an inverse conditional block terminator token.
pub const END_NOT_PREFIX: &str = "end!";
/// Prefix of an inline flag token.
pub const FLAG_PREFIX: &str = "flag";
/// Prefix of an inverse inline flag token.
pub const FLAG_NOT_PREFIX: &str = "flag!";
/// Prefix of a variable token.
pub const VAR_PREFIX: &str = "var";

/// An (open, close) delimiter pair; `("~", "~")` renders key `a` as `~a~`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxPair {
    pub open: String,
    pub close: String,
}

impl SyntaxPair {
    pub fn new<S: Into<String>>(open: S, close: S) -> Self {
        Self { open: open.into(), close: close.into() }
    }
}

/// Renders `prefix<open>key<close>` for a single delimiter pair.
pub fn render_token(prefix: &str, key: &str, pair: &SyntaxPair) -> String {
    format!("{}{}{}{}", prefix, pair.open, key, pair.close)
}

/// Renders the token once per configured pair, in configuration order.
pub fn render_tokens(prefix: &str, key: &str, pairs: &[SyntaxPair]) -> Vec<String> {
    pairs.iter().map(|pair| render_token(prefix, key, pair)).collect()
}

/// Counts non-overlapping occurrences of `needle` in `haystack`.
pub fn count_matches(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_token() {
        let pair = SyntaxPair::new("~", "~");
        assert_eq!(render_token(FLAG_PREFIX, "a", &pair), "flag~a~");
        assert_eq!(render_token(IF_NOT_PREFIX, "a.b", &pair), "if!~a.b~");

        let pair = SyntaxPair::new("{{", "}}");
        assert_eq!(render_token(VAR_PREFIX, "name", &pair), "var{{name}}");
    }

    #[test]
    fn test_render_tokens_one_per_pair() {
        let pairs =
            vec![SyntaxPair::new("~", "~"), SyntaxPair::new("{{", "}}"), SyntaxPair::new("<", ">")];
        let tokens = render_tokens(IF_PREFIX, "k", &pairs);
        assert_eq!(tokens.len(), pairs.len());
        assert_eq!(tokens, vec!["if~k~", "if{{k}}", "if<k>"]);
    }

    #[test]
    fn test_count_matches() {
        assert_eq!(count_matches("~a~ and ~a~", "~a~"), 2);
        assert_eq!(count_matches("nothing here", "~a~"), 0);
        assert_eq!(count_matches("anything", ""), 0);
    }
}
