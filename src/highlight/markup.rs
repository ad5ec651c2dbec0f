//! XML frame description tokenizer.

use super::scan::{self, Rule};
use super::{Line, SpanClass, push};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Comment,
    Tag,
    Attribute,
    Text,
}

const RULES: &[Rule<Kind>] = &[
    Rule {
        kind: Kind::Comment,
        matcher: comment,
    },
    Rule {
        kind: Kind::Tag,
        matcher: open_tag,
    },
    Rule {
        kind: Kind::Tag,
        matcher: |rest| scan::literal(rest, "/>"),
    },
    Rule {
        kind: Kind::Tag,
        matcher: |rest| scan::literal(rest, ">"),
    },
    Rule {
        kind: Kind::Attribute,
        matcher: attribute,
    },
];

pub(super) fn tokenize_line(line: &str) -> Line {
    let mut spans = Vec::new();
    for token in scan::scan(line, RULES, Kind::Text) {
        match token.kind {
            Kind::Comment => push(&mut spans, token.text, SpanClass::Comment),
            Kind::Tag => push(&mut spans, token.text, SpanClass::Tag),
            Kind::Text => push(&mut spans, token.text, SpanClass::Plain),
            Kind::Attribute => {
                // The matcher guarantees a `=` followed by the quoted value.
                let (name, value) = token.text.split_once('=').unwrap_or((token.text, ""));
                push(&mut spans, name, SpanClass::AttributeName);
                push(&mut spans, "=", SpanClass::Plain);
                push(&mut spans, value, SpanClass::AttributeValue);
            }
        }
    }
    spans
}

/// `<!-- ... -->` closed on the same line.
fn comment(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix("<!--")?;
    let close = body.find("-->")?;
    Some("<!--".len() + close + "-->".len())
}

/// `</?name`
fn open_tag(rest: &str) -> Option<usize> {
    let after = rest.strip_prefix('<')?;
    let slash = usize::from(after.starts_with('/'));
    let name = scan::qualified_name(&after[slash..])?;
    Some(1 + slash + name)
}

/// `name="value"`
fn attribute(rest: &str) -> Option<usize> {
    let name = scan::qualified_name(rest)?;
    let after = rest[name..].strip_prefix('=')?;
    let value = scan::quoted(after, '"')?;
    Some(name + 1 + value)
}

#[cfg(test)]
mod tests {
    use super::super::Span;
    use super::*;

    fn pairs(line: &str) -> Vec<(String, SpanClass)> {
        tokenize_line(line)
            .into_iter()
            .map(|Span { text, class }| (text, class))
            .collect()
    }

    fn s(text: &str, class: SpanClass) -> (String, SpanClass) {
        (text.to_string(), class)
    }

    #[test]
    fn tag_with_attributes() {
        assert_eq!(
            pairs(r#"  <Frame name="Bar" virtual="true">"#),
            [
                s("  ", SpanClass::Plain),
                s("<Frame", SpanClass::Tag),
                s(" ", SpanClass::Plain),
                s("name", SpanClass::AttributeName),
                s("=", SpanClass::Plain),
                s("\"Bar\"", SpanClass::AttributeValue),
                s(" ", SpanClass::Plain),
                s("virtual", SpanClass::AttributeName),
                s("=", SpanClass::Plain),
                s("\"true\"", SpanClass::AttributeValue),
                s(">", SpanClass::Tag),
            ]
        );
    }

    #[test]
    fn self_closing_and_closing_tags() {
        assert_eq!(
            pairs(r#"<Size x="200"/></Frame>"#),
            [
                s("<Size", SpanClass::Tag),
                s(" ", SpanClass::Plain),
                s("x", SpanClass::AttributeName),
                s("=", SpanClass::Plain),
                s("\"200\"", SpanClass::AttributeValue),
                s("/>", SpanClass::Tag),
                s("</Frame", SpanClass::Tag),
                s(">", SpanClass::Tag),
            ]
        );
    }

    #[test]
    fn comments_and_namespaced_names() {
        assert_eq!(
            pairs(r#"<!-- bars --><ui:Ui xmlns:ui="u">"#),
            [
                s("<!-- bars -->", SpanClass::Comment),
                s("<ui:Ui", SpanClass::Tag),
                s(" ", SpanClass::Plain),
                s("xmlns:ui", SpanClass::AttributeName),
                s("=", SpanClass::Plain),
                s("\"u\"", SpanClass::AttributeValue),
                s(">", SpanClass::Tag),
            ]
        );
    }

    #[test]
    fn unclosed_comment_is_plain() {
        assert_eq!(
            pairs("<!-- open"),
            [s("<!-- open", SpanClass::Plain)]
        );
    }

    #[test]
    fn text_content_is_plain() {
        assert_eq!(
            pairs("<Text>Hello world</Text>"),
            [
                s("<Text", SpanClass::Tag),
                s(">", SpanClass::Tag),
                s("Hello world", SpanClass::Plain),
                s("</Text", SpanClass::Tag),
                s(">", SpanClass::Tag),
            ]
        );
    }
}
