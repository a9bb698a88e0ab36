//! Integration tests for the HTML tokenizer.

use canopy_html::tokenizer::{Attribute, HTMLTokenizer, Token};

fn tokenize(html: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    tokenizer.into_tokens()
}

fn tokenize_with_issues(html: &str) -> (Vec<Token>, Vec<String>) {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    let issues = tokenizer
        .issues()
        .iter()
        .map(|d| d.message.clone())
        .collect();
    (tokenizer.into_tokens(), issues)
}

#[test]
fn test_start_tag_with_attributes() {
    let tokens = tokenize(r#"<p class="intro" id=first data-x='y'>"#);
    assert_eq!(
        tokens[0],
        Token::start_tag("p", &[("class", "intro"), ("id", "first"), ("data-x", "y")])
    );
}

#[test]
fn test_names_are_lowercased() {
    let tokens = tokenize("<DIV ID=Main></DIV>");
    assert_eq!(tokens[0], Token::start_tag("div", &[("id", "Main")]));
    assert_eq!(tokens[1], Token::end_tag("div"));
}

#[test]
fn test_self_closing_flag() {
    let tokens = tokenize("<br/><img src=a.png />");
    assert_eq!(tokens[0], Token::self_closing_tag("br", &[]));
    assert_eq!(tokens[1], Token::self_closing_tag("img", &[("src", "a.png")]));
}

#[test]
fn test_attribute_without_value() {
    let tokens = tokenize("<input disabled>");
    assert_eq!(
        tokens[0],
        Token::StartTag {
            name: "input".to_string(),
            self_closing: false,
            attributes: vec![Attribute::new("disabled", "")],
        }
    );
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let (tokens, issues) = tokenize_with_issues("<a href=one href=two>");
    assert_eq!(tokens[0], Token::start_tag("a", &[("href", "one")]));
    assert!(issues.iter().any(|m| m == "duplicate-attribute"));
}

#[test]
fn test_adjacent_text_is_coalesced() {
    let tokens = tokenize("a &amp; b&lt;c");
    assert_eq!(tokens, vec![Token::characters("a & b<c"), Token::EndOfFile]);
}

#[test]
fn test_numeric_character_references() {
    let tokens = tokenize("&#65;&#x42;&#X63;");
    assert_eq!(tokens[0], Token::characters("ABc"));
}

#[test]
fn test_unknown_named_reference_is_left_alone() {
    let tokens = tokenize("&zzzz; x");
    assert_eq!(tokens[0], Token::characters("&zzzz; x"));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(tokens[0], Token::comment(" hello "));
}

#[test]
fn test_bogus_comment_from_processing_instruction() {
    let tokens = tokenize("<?xml version=\"1.0\"?>");
    assert_eq!(tokens[0], Token::comment("?xml version=\"1.0\"?"));
}

#[test]
fn test_html5_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens[0], Token::html_doctype());
}

#[test]
fn test_legacy_doctype_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    assert_eq!(
        tokens[0],
        Token::Doctype {
            name: Some("html".to_string()),
            public_identifier: Some("-//W3C//DTD HTML 4.01//EN".to_string()),
            system_identifier: Some("http://www.w3.org/TR/html4/strict.dtd".to_string()),
            force_quirks: false,
        }
    );
}

#[test]
fn test_script_content_is_not_markup() {
    let tokens = tokenize("<script>if (a<b && c>d) {}</script>");
    assert_eq!(
        tokens,
        vec![
            Token::start_tag("script", &[]),
            Token::characters("if (a<b && c>d) {}"),
            Token::end_tag("script"),
            Token::EndOfFile,
        ]
    );
}

#[test]
fn test_textarea_decodes_references_but_not_tags() {
    let tokens = tokenize("<textarea><b>&amp;</b></textarea>");
    assert_eq!(tokens[1], Token::characters("<b>&</b>"));
    assert_eq!(tokens[2], Token::end_tag("textarea"));
}

#[test]
fn test_noscript_depends_on_scripting_flag() {
    let mut scripted = HTMLTokenizer::new("<noscript><p>x</p></noscript>".to_string());
    scripted.run();
    assert_eq!(scripted.into_tokens()[1], Token::characters("<p>x</p>"));

    let mut unscripted =
        HTMLTokenizer::new("<noscript><p>x</p></noscript>".to_string()).with_scripting(false);
    unscripted.run();
    assert_eq!(unscripted.into_tokens()[1], Token::start_tag("p", &[]));
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(tokens[0], Token::characters("a\nb\nc"));
}

#[test]
fn test_stream_ends_with_single_eof() {
    for input in ["", "<p", "<!--", "<!DOCTYPE", "text", "<div a='"] {
        let tokens = tokenize(input);
        let eofs = tokens.iter().filter(|t| **t == Token::EndOfFile).count();
        assert_eq!(eofs, 1, "input {input:?}");
        assert_eq!(tokens.last(), Some(&Token::EndOfFile), "input {input:?}");
    }
}

#[test]
fn test_lone_less_than_is_text() {
    let tokens = tokenize("1 < 2");
    assert_eq!(tokens[0], Token::characters("1 < 2"));
}

#[test]
fn test_text_after_end_tag() {
    let tokens = tokenize("a</x>b");
    assert_eq!(
        tokens,
        vec![
            Token::characters("a"),
            Token::end_tag("x"),
            Token::characters("b"),
            Token::EndOfFile,
        ]
    );
}

#[test]
fn test_markup_after_end_tag() {
    let tokens = tokenize("<div>a</div>b<i>c");
    assert_eq!(
        tokens,
        vec![
            Token::start_tag("div", &[]),
            Token::characters("a"),
            Token::end_tag("div"),
            Token::characters("b"),
            Token::start_tag("i", &[]),
            Token::characters("c"),
            Token::EndOfFile,
        ]
    );
}

#[test]
fn test_end_tag_with_attributes_returns_to_data() {
    let (tokens, issues) = tokenize_with_issues("</p class=x>y");
    assert_eq!(
        tokens,
        vec![Token::end_tag("p"), Token::characters("y"), Token::EndOfFile]
    );
    assert!(issues.iter().any(|m| m == "end-tag-with-attributes"));
}

#[test]
fn test_text_after_comment_and_doctype() {
    assert_eq!(
        tokenize("<!--c-->x"),
        vec![Token::comment("c"), Token::characters("x"), Token::EndOfFile]
    );
    assert_eq!(
        tokenize("<!DOCTYPE html>x"),
        vec![Token::html_doctype(), Token::characters("x"), Token::EndOfFile]
    );
}

#[test]
fn test_text_after_raw_text_end_tag() {
    let tokens = tokenize("<style>p{}</style>q<script>s</script>r");
    assert_eq!(
        tokens,
        vec![
            Token::start_tag("style", &[]),
            Token::characters("p{}"),
            Token::end_tag("style"),
            Token::characters("q"),
            Token::start_tag("script", &[]),
            Token::characters("s"),
            Token::end_tag("script"),
            Token::characters("r"),
            Token::EndOfFile,
        ]
    );
}
