//! Ordered-rule line scanner shared by the tokenizers.
//!
//! At each position the rules are tried in order; the first one that matches
//! a non-empty prefix of the remaining text produces a token. Text that no
//! rule matches accumulates into a single token of the fallback kind.

/// Returns the byte length of the match at the start of `rest`, if any.
pub(super) type Matcher = fn(&str) -> Option<usize>;

pub(super) struct Rule<K> {
    pub kind: K,
    pub matcher: Matcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Token<'a, K> {
    pub kind: K,
    pub text: &'a str,
}

/// Splits `line` into tokens using `rules`, left to right.
pub(super) fn scan<'a, K: Copy>(line: &'a str, rules: &[Rule<K>], unmatched: K) -> Vec<Token<'a, K>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut pending = 0;

    while pos < line.len() {
        let rest = &line[pos..];
        let hit = rules.iter().find_map(|rule| {
            (rule.matcher)(rest)
                .filter(|&len| len > 0 && rest.is_char_boundary(len))
                .map(|len| (rule.kind, len))
        });

        match hit {
            Some((kind, len)) => {
                if pending < pos {
                    tokens.push(Token {
                        kind: unmatched,
                        text: &line[pending..pos],
                    });
                }
                tokens.push(Token {
                    kind,
                    text: &rest[..len],
                });
                pos += len;
                pending = pos;
            }
            None => pos += first_char(rest).unwrap_or(1),
        }
    }

    if pending < line.len() {
        tokens.push(Token {
            kind: unmatched,
            text: &line[pending..],
        });
    }
    tokens
}

// ── Matchers ──

pub(super) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// `[A-Za-z0-9_]+`
pub(super) fn word(rest: &str) -> Option<usize> {
    nonzero(rest.bytes().take_while(|&b| is_word_byte(b)).count())
}

/// `[A-Za-z0-9_:]+`
pub(super) fn qualified_name(rest: &str) -> Option<usize> {
    nonzero(
        rest.bytes()
            .take_while(|&b| is_word_byte(b) || b == b':')
            .count(),
    )
}

/// `\d+(\.\d*)?`
pub(super) fn number(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let int = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if int == 0 {
        return None;
    }
    if bytes.get(int) == Some(&b'.') {
        let frac = bytes[int + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        return Some(int + 1 + frac);
    }
    Some(int)
}

/// A quoted run with no escapes: `q[^q]*q`.
pub(super) fn quoted(rest: &str, quote: char) -> Option<usize> {
    let body = rest.strip_prefix(quote)?;
    let close = body.find(quote)?;
    Some(quote.len_utf8() * 2 + close)
}

/// A run of whitespace characters.
pub(super) fn whitespace(rest: &str) -> Option<usize> {
    nonzero(
        rest.chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum(),
    )
}

/// Exactly one character.
pub(super) fn any_char(rest: &str) -> Option<usize> {
    first_char(rest)
}

/// Matches `literal` exactly.
pub(super) fn literal(rest: &str, literal: &str) -> Option<usize> {
    rest.starts_with(literal).then_some(literal.len())
}

fn first_char(rest: &str) -> Option<usize> {
    rest.chars().next().map(char::len_utf8)
}

fn nonzero(len: usize) -> Option<usize> {
    (len > 0).then_some(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Word,
        Other,
    }

    fn texts<'a>(tokens: &[Token<'a, Kind>]) -> Vec<(Kind, &'a str)> {
        tokens.iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn unmatched_text_accumulates() {
        let rules = [Rule {
            kind: Kind::Word,
            matcher: word,
        }];
        let tokens = scan("ab, → cd!", &rules, Kind::Other);

        assert_eq!(
            texts(&tokens),
            [
                (Kind::Word, "ab"),
                (Kind::Other, ", → "),
                (Kind::Word, "cd"),
                (Kind::Other, "!"),
            ]
        );
    }

    #[test]
    fn earlier_rules_win() {
        let rules = [
            Rule {
                kind: Kind::Other,
                matcher: |rest| literal(rest, "ab"),
            },
            Rule {
                kind: Kind::Word,
                matcher: word,
            },
        ];
        let tokens = scan("abc", &rules, Kind::Other);

        assert_eq!(texts(&tokens), [(Kind::Other, "ab"), (Kind::Word, "c")]);
    }

    #[test]
    fn number_shapes() {
        assert_eq!(number("42)"), Some(2));
        assert_eq!(number("3.14x"), Some(4));
        assert_eq!(number("7."), Some(2));
        assert_eq!(number(".5"), None);
    }

    #[test]
    fn quoted_needs_closing_quote() {
        assert_eq!(quoted("\"abc\" d", '"'), Some(5));
        assert_eq!(quoted("'' x", '\''), Some(2));
        assert_eq!(quoted("\"abc", '"'), None);
        assert_eq!(quoted("abc\"", '"'), None);
    }

    #[test]
    fn whitespace_is_char_aware() {
        assert_eq!(whitespace("\u{3000} x"), Some(4));
        assert_eq!(whitespace("x"), None);
    }
}
