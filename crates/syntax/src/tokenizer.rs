// Chunk: docs/chunks/preview_tokenizer - Regex preview tokenizer for minimap text

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// The category of a preview token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Plain,
    Comment,
    String,
    Number,
    Keyword,
}

/// A span of a line with its category. `range` is a byte range into the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range<usize>,
}

/// Alternation order matters: a comment swallows everything after it, and
/// strings win over numbers and keywords inside them.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?P<comment>(?:#|//|--).*$)"#,
        r#"|(?P<string>"(?:[^"\\]|\\.)*"?|'(?:[^'\\]|\\.)*'?|`[^`]*`?)"#,
        r#"|(?P<number>\b(?:0[xX][0-9a-fA-F]+|\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)\b)"#,
        r#"|(?P<keyword>\b(?:and|as|assert|async|await|break|case|class|const|continue|def|del|elif|else|except|export|False|false|finally|fn|for|from|function|if|impl|import|in|is|lambda|let|match|None|nonlocal|not|null|or|pass|raise|return|select|self|struct|True|true|try|var|where|while|with|yield)\b)"#,
    ))
    .expect("token pattern is a valid regex")
});

/// Splits a line into tokens that exactly cover it, in order.
///
/// Gaps between matches become `Plain` tokens. An empty line yields no
/// tokens.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for caps in TOKEN_PATTERN.captures_iter(line) {
        let (kind, m) = if let Some(m) = caps.name("comment") {
            (TokenKind::Comment, m)
        } else if let Some(m) = caps.name("string") {
            (TokenKind::String, m)
        } else if let Some(m) = caps.name("number") {
            (TokenKind::Number, m)
        } else if let Some(m) = caps.name("keyword") {
            (TokenKind::Keyword, m)
        } else {
            continue;
        };

        if m.start() > cursor {
            tokens.push(Token {
                kind: TokenKind::Plain,
                range: cursor..m.start(),
            });
        }
        tokens.push(Token {
            kind,
            range: m.range(),
        });
        cursor = m.end();
    }

    if cursor < line.len() {
        tokens.push(Token {
            kind: TokenKind::Plain,
            range: cursor..line.len(),
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_text(line: &str) -> Vec<(TokenKind, &str)> {
        tokenize(line)
            .into_iter()
            .map(|t| (t.kind, &line[t.range]))
            .collect()
    }

    // ==================== Coverage ====================

    #[test]
    fn test_tokens_cover_line() {
        let line = "def f(x): return x + 1.5  # add";
        let tokens = tokenize(line);
        let mut cursor = 0;
        for token in &tokens {
            assert_eq!(token.range.start, cursor);
            cursor = token.range.end;
        }
        assert_eq!(cursor, line.len());
    }

    #[test]
    fn test_empty_line() {
        assert!(tokenize("").is_empty());
    }

    // ==================== Categories ====================

    #[test]
    fn test_keywords_and_numbers() {
        let tokens = kinds_and_text("for i in range(10):");
        assert!(tokens.contains(&(TokenKind::Keyword, "for")));
        assert!(tokens.contains(&(TokenKind::Keyword, "in")));
        assert!(tokens.contains(&(TokenKind::Number, "10")));
        assert!(tokens.contains(&(TokenKind::Plain, " range(")));
    }

    #[test]
    fn test_comment_runs_to_end() {
        let tokens = kinds_and_text("x = 1 // if 2");
        assert_eq!(tokens.last(), Some(&(TokenKind::Comment, "// if 2")));
    }

    #[test]
    fn test_keyword_inside_string_is_string() {
        let tokens = kinds_and_text(r#"print("return 5")"#);
        assert!(tokens.contains(&(TokenKind::String, r#""return 5""#)));
        assert!(!tokens.iter().any(|(k, _)| *k == TokenKind::Keyword));
    }

    #[test]
    fn test_identifier_containing_keyword_is_plain() {
        let tokens = kinds_and_text("format_input = 1");
        assert!(!tokens.iter().any(|(k, _)| *k == TokenKind::Keyword));
    }

    // ==================== Malformed input ====================

    #[test]
    fn test_unterminated_string() {
        let tokens = kinds_and_text("s = 'abc");
        assert_eq!(tokens.last(), Some(&(TokenKind::String, "'abc")));
    }

    #[test]
    fn test_trailing_backslash_in_string() {
        let line = "s = \"abc\\";
        let tokens = tokenize(line);
        assert_eq!(tokens.last().map(|t| t.range.end), Some(line.len()));
    }

    #[test]
    fn test_multibyte_text() {
        let line = "name = 'café' # ünïcode ✓";
        let tokens = tokenize(line);
        for token in &tokens {
            assert!(line.is_char_boundary(token.range.start));
            assert!(line.is_char_boundary(token.range.end));
        }
    }
}
