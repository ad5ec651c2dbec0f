//! Lua script tokenizer.

use super::scan::{self, Rule, Token};
use super::{Line, SpanClass, push};

const KEYWORDS: &[&str] = &[
    "local", "function", "end", "if", "then", "else", "elseif", "for", "do", "while", "return",
    "nil", "true", "false", "not", "and", "or", "in", "repeat", "until", "break", "goto", "self",
];

const COMMENT: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    String,
    Comment,
    Number,
    Word,
    Other,
}

const RULES: &[Rule<Kind>] = &[
    Rule {
        kind: Kind::String,
        matcher: |rest| scan::quoted(rest, '"'),
    },
    Rule {
        kind: Kind::String,
        matcher: |rest| scan::quoted(rest, '\''),
    },
    Rule {
        kind: Kind::Comment,
        matcher: |rest| rest.starts_with(COMMENT).then_some(rest.len()),
    },
    Rule {
        kind: Kind::Number,
        matcher: scan::number,
    },
    Rule {
        kind: Kind::Word,
        matcher: scan::word,
    },
    Rule {
        kind: Kind::Other,
        matcher: scan::whitespace,
    },
    Rule {
        kind: Kind::Other,
        matcher: scan::any_char,
    },
];

pub(super) fn tokenize_line(line: &str) -> Line {
    let mut spans = Vec::new();

    if line.trim_start().starts_with(COMMENT) {
        push(&mut spans, line, SpanClass::Comment);
        return spans;
    }

    let tokens = scan::scan(line, RULES, Kind::Other);
    for (i, token) in tokens.iter().enumerate() {
        push(&mut spans, token.text, classify(token, tokens.get(i + 1)));
    }
    spans
}

/// Classifies a token, looking one token ahead for call sites.
fn classify(token: &Token<'_, Kind>, next: Option<&Token<'_, Kind>>) -> SpanClass {
    match token.kind {
        Kind::String => SpanClass::String,
        Kind::Comment => SpanClass::Comment,
        Kind::Number => SpanClass::Number,
        Kind::Word if KEYWORDS.contains(&token.text) => SpanClass::Keyword,
        Kind::Word if next.is_some_and(|n| n.text == "(") => SpanClass::Call,
        Kind::Word | Kind::Other => SpanClass::Plain,
    }
}

#[cfg(test)]
mod tests {
    use super::super::Span;
    use super::*;

    fn classes(line: &str) -> Vec<(String, SpanClass)> {
        tokenize_line(line)
            .into_iter()
            .map(|Span { text, class }| (text, class))
            .collect()
    }

    fn class_of(line: &str, text: &str) -> SpanClass {
        tokenize_line(line)
            .into_iter()
            .find(|s| s.text == text)
            .map(|s| s.class)
            .unwrap()
    }

    #[test]
    fn whole_line_comment() {
        let spans = tokenize_line("    -- Track damage \"here\"");
        assert_eq!(
            spans,
            vec![Span::new("    -- Track damage \"here\"", SpanClass::Comment)]
        );
    }

    #[test]
    fn keywords_strings_and_numbers() {
        let line = r#"local frame = CreateFrame("Frame", 'x', 0.8)"#;

        assert_eq!(class_of(line, "local"), SpanClass::Keyword);
        assert_eq!(class_of(line, "frame"), SpanClass::Plain);
        assert_eq!(class_of(line, "CreateFrame"), SpanClass::Call);
        assert_eq!(class_of(line, "\"Frame\""), SpanClass::String);
        assert_eq!(class_of(line, "'x'"), SpanClass::String);
        assert_eq!(class_of(line, "0.8"), SpanClass::Number);
    }

    #[test]
    fn method_calls_are_call_sites() {
        let line = "frame:SetPoint(\"CENTER\")";
        assert_eq!(class_of(line, "frame"), SpanClass::Plain);
        assert_eq!(class_of(line, "SetPoint"), SpanClass::Call);
    }

    #[test]
    fn keyword_wins_over_call() {
        assert_eq!(class_of("function(x) end", "function"), SpanClass::Keyword);
        assert_eq!(class_of("self:Print(x)", "self"), SpanClass::Keyword);
    }

    #[test]
    fn call_needs_paren_immediately_after() {
        assert_eq!(class_of("print (x)", "print"), SpanClass::Plain);
        assert_eq!(class_of("print(x)", "print"), SpanClass::Call);
    }

    #[test]
    fn call_classification_ignores_unrelated_tokens() {
        let a = class_of("x = 1; Update(a, b)", "Update");
        let b = class_of("b, a = 2 Update(a, b) -- done", "Update");
        assert_eq!(a, SpanClass::Call);
        assert_eq!(b, SpanClass::Call);
    }

    #[test]
    fn trailing_comment() {
        let spans = classes("x = 1 -- note (here)");
        assert_eq!(
            spans.last().unwrap(),
            &("-- note (here)".to_string(), SpanClass::Comment)
        );
    }

    #[test]
    fn unterminated_string_falls_back_to_plain() {
        let spans = classes("print(\"oops");
        assert_eq!(spans[0], ("print".to_string(), SpanClass::Call));
        assert!(spans[2..].iter().all(|(_, c)| *c == SpanClass::Plain));
    }

    #[test]
    fn whitespace_is_preserved_as_tokens() {
        let spans = classes("\tif  x");
        assert_eq!(spans[0], ("\t".to_string(), SpanClass::Plain));
        assert_eq!(spans[1], ("if".to_string(), SpanClass::Keyword));
        assert_eq!(spans[2], ("  ".to_string(), SpanClass::Plain));
    }
}
