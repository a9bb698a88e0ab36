//! Integration tests for tree construction: recovery from malformed markup,
//! insertion modes, quirks mode, incremental feeding and diagnostics.

use std::cell::RefCell;
use std::rc::Rc;

use canopy_common::diagnostics::{Diagnostic, FnSink};
use canopy_dom::serialize::{inner_html, serialize_document};
use canopy_dom::{DomTree, NodeId, NodeType, QuirksMode};
use canopy_html::{
    HTMLParser, HTMLTokenizer, InsertionMode, ParserOptions, Token, TreeBuilder, parse_document,
    parse_document_with_options,
};

fn parse(html: &str) -> DomTree {
    parse_document(html)
}

fn tokens(html: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    tokenizer.into_tokens()
}

fn find_element(tree: &DomTree, tag: &str) -> NodeId {
    tree.get_elements_by_tag_name(tag)
        .first()
        .copied()
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.element_children(id)
        .into_iter()
        .filter_map(|c| tree.tag_name(c).map(str::to_string))
        .collect()
}

fn body(tree: &DomTree) -> NodeId {
    tree.body().expect("document has a body")
}

fn body_html(html: &str) -> String {
    let tree = parse(html);
    inner_html(&tree, body(&tree))
}

// ---------------------------------------------------------------------------
// Structural invariants
// ---------------------------------------------------------------------------

const MESSY_INPUTS: &[&str] = &[
    "<table><div>hello</div><tr><td>world</td></tr></table>",
    "<a id='outerA'>V<div id='innerDiv'>W<a id='innerA'>X</a>Y</div>Z</a>",
    "<b><i>one</b>two</i><p>three",
    "<ul><li>item 1<div>in div</li><li>item2</li></ul>",
    "<table><form><input type=hidden><tr><td><input></td></tr></form></table>",
    "<select><option>a<table><td>b</select>",
    "<template><tr><td>x</td></tr></template><p>after",
    "</p></br><frameset><frame>",
    "text</html><!--tail--><p>more",
];

#[test]
fn test_open_elements_stay_connected_while_parsing() {
    for input in MESSY_INPUTS {
        let mut builder = TreeBuilder::new();
        for token in tokens(input) {
            builder.process_token(token);
            if builder.is_finished() {
                break;
            }
            if builder.tree().document_element().is_some() {
                assert!(
                    !builder.open_elements().entries().is_empty(),
                    "empty stack mid-parse for {input:?}"
                );
            }
            for entry in builder.open_elements().entries() {
                assert!(
                    builder.tree().is_connected(entry.node),
                    "<{}> on the stack is detached for {input:?}",
                    entry.tag
                );
            }
        }
        assert!(builder.is_finished());
        assert!(builder.open_elements().entries().is_empty());
    }
}

#[test]
fn test_single_html_root() {
    for input in MESSY_INPUTS.iter().copied().chain(["", "<!DOCTYPE html>", "<html><html>"]) {
        let tree = parse(input);
        let roots = tree.element_children(tree.root());
        assert_eq!(roots.len(), 1, "input {input:?}");
        assert_eq!(tree.tag_name(roots[0]), Some("html"), "input {input:?}");
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[test]
fn test_div_between_table_and_row_is_foster_parented() {
    let tree = parse("<table><div>hello</div><tr><td>world</td></tr></table>");
    let body = body(&tree);
    assert_eq!(child_tags(&tree, body), ["div", "table"]);

    let div = find_element(&tree, "div");
    assert_eq!(tree.text_content(div), "hello");

    let table = find_element(&tree, "table");
    assert_eq!(tree.get_elements_by_tag_name("tr").len(), 1);
    assert_eq!(
        inner_html(&tree, table),
        "<tbody><tr><td>world</td></tr></tbody>"
    );
}

#[test]
fn test_unknown_tag_in_table() {
    let tree = parse("<table id='it'><doc><tr><td>hello</td></tr></doc></table>");
    let body = body(&tree);
    let first = tree.first_child(body).expect("body has children");
    assert_eq!(tree.tag_name(first), Some("doc"));

    let table = tree.get_element_by_id("it").expect("table");
    let rows: Vec<NodeId> = tree
        .descendants(table)
        .filter(|&n| tree.tag_name(n) == Some("tr"))
        .collect();
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_text_in_table_is_foster_parented() {
    assert_eq!(
        body_html("<table>abc<tr><td>x</td></tr></table>"),
        "abc<table><tbody><tr><td>x</td></tr></tbody></table>"
    );
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    assert_eq!(
        body_html("<table> <tr><td>x</td></tr></table>"),
        "<table> <tbody><tr><td>x</td></tr></tbody></table>"
    );
}

#[test]
fn test_block_in_caption() {
    let tree = parse(
        "<table><caption id='caption'><div>caption</div></caption><tr><td>content</td></tr></table>",
    );
    let caption = tree.get_element_by_id("caption").expect("caption");
    assert_eq!(inner_html(&tree, caption), "<div>caption</div>");
    let parent = tree.parent(caption).and_then(|p| tree.tag_name(p));
    assert_eq!(parent, Some("table"));
}

#[test]
fn test_select_inside_empty_table() {
    let tree = parse("<table><select></select></table>");
    assert_eq!(child_tags(&tree, body(&tree)), ["select", "table"]);
}

#[test]
fn test_table_nested_in_cell() {
    assert_eq!(
        body_html("<table><tr><td>a<table><tr><td>b</td></tr></table></td></tr></table>"),
        "<table><tbody><tr><td>a<table><tbody><tr><td>b</td></tr></tbody></table></td></tr></tbody></table>"
    );
}

#[test]
fn test_cell_implies_row_and_body() {
    assert_eq!(
        body_html("<table><td>1<td>2</table>"),
        "<table><tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
    );
}

#[test]
fn test_col_implies_colgroup() {
    assert_eq!(
        body_html("<table><col><tr><td>x</table>"),
        "<table><colgroup><col></colgroup><tbody><tr><td>x</td></tr></tbody></table>"
    );
}

// ---------------------------------------------------------------------------
// Formatting elements
// ---------------------------------------------------------------------------

#[test]
fn test_nested_anchor_in_division() {
    let tree = parse(
        "<!DOCTYPE html><a id='outerA'>V<div id='innerDiv'>W<a id='innerA'>X</a>Y</div>Z</a>",
    );
    assert_eq!(tree.get_elements_by_tag_name("a").len(), 3);
    assert_eq!(
        inner_html(&tree, body(&tree)),
        "<a id=\"outerA\">V</a><div id=\"innerDiv\"><a id=\"outerA\">W</a><a id=\"innerA\">X</a>Y</div>Z"
    );
}

#[test]
fn test_misnested_bold_italic() {
    assert_eq!(body_html("<b>1<i>2</b>3</i>4"), "<b>1<i>2</i></b><i>3</i>4");
}

#[test]
fn test_formatting_reconstructed_after_block() {
    assert_eq!(body_html("<p><b>x</p>y"), "<p><b>x</b></p><b>y</b>");
}

#[test]
fn test_paragraph_split_by_misnested_bold() {
    assert_eq!(
        body_html("<b>1<p>2</b>3</p>"),
        "<b>1</b><p><b>2</b>3</p>"
    );
}

#[test]
fn test_nobr_inside_nobr() {
    assert_eq!(body_html("<nobr>a<nobr>b"), "<nobr>a</nobr><nobr>b</nobr>");
}

#[test]
fn test_text_after_stray_end_p_stays_in_bold() {
    assert_eq!(body_html("<b>x</p>y"), "<b>x<p></p>y</b>");
}

#[test]
fn test_formatting_chain_reconstructed_after_paragraph() {
    assert_eq!(
        body_html("<p><b><i><u>X</p>Y"),
        "<p><b><i><u>X</u></i></b></p><b><i><u>Y</u></i></b>"
    );
}

#[test]
fn test_text_after_table_inside_div() {
    let tree = parse("<div>a<table>b<tr>c<td>d</table>e</div>");
    let div = find_element(&tree, "div");
    assert_eq!(tree.text_content(div), "abcde");
    assert_eq!(
        inner_html(&tree, div),
        "abc<table><tbody><tr><td>d</td></tr></tbody></table>e"
    );
}

// ---------------------------------------------------------------------------
// Implied end tags and stray tags
// ---------------------------------------------------------------------------

#[test]
fn test_list_item_closed_across_block() {
    let tree = parse("<ul id='it'><li>item 1<div>in div</li><li>item2</li></ul>");
    let ul = tree.get_element_by_id("it").expect("ul");
    assert_eq!(tree.children(ul).len(), 2);
}

#[test]
fn test_paragraphs_close_each_other() {
    assert_eq!(body_html("<p>one<p>two"), "<p>one</p><p>two</p>");
}

#[test]
fn test_definition_list_items() {
    let tree = parse("<dl><dt>a<dd>b<dt>c</dl>");
    let dl = find_element(&tree, "dl");
    assert_eq!(child_tags(&tree, dl), ["dt", "dd", "dt"]);
}

#[test]
fn test_headings_do_not_nest() {
    let tree = parse("<h1>a<h2>b</h2>");
    assert_eq!(child_tags(&tree, body(&tree)), ["h1", "h2"]);
}

#[test]
fn test_unknown_end_tag_is_ignored() {
    let tree = parse("<section id='it'>hello</isslot> world</section>");
    let section = tree.get_element_by_id("it").expect("section");
    assert_eq!(tree.text_content(section), "hello world");

    let tree = parse("<div>a</unknown>b</div>");
    assert_eq!(tree.text_content(find_element(&tree, "div")), "ab");
}

#[test]
fn test_stray_end_p_creates_empty_paragraph() {
    assert_eq!(body_html("a</p>b"), "a<p></p>b");
}

#[test]
fn test_end_br_becomes_br() {
    assert_eq!(body_html("a</br>b"), "a<br>b");
}

#[test]
fn test_leading_newline_in_pre_is_dropped() {
    assert_eq!(body_html("<pre>\nx</pre>"), "<pre>x</pre>");
}

#[test]
fn test_image_becomes_img() {
    assert_eq!(body_html("<image src=a>"), "<img src=\"a\">");
}

#[test]
fn test_second_form_start_tag_is_ignored() {
    let tree = parse("<form id=a><form id=b><input name=x></form>");
    assert_eq!(tree.forms().len(), 1);
    let form = tree.get_element_by_id("a").expect("form");
    assert_eq!(tree.form_elements(form).len(), 1);
}

// ---------------------------------------------------------------------------
// Select
// ---------------------------------------------------------------------------

#[test]
fn test_option_closes_option() {
    let tree = parse("<select><option>a<option>b<optgroup><option>c</select>");
    let select = find_element(&tree, "select");
    assert_eq!(child_tags(&tree, select), ["option", "option", "optgroup"]);
}

#[test]
fn test_nested_select_closes_select() {
    let tree = parse("<select><option>a<select>b");
    assert_eq!(tree.get_elements_by_tag_name("select").len(), 1);
    assert_eq!(
        tree.text_content(body(&tree)),
        "ab",
        "text after the second <select> lands in the body"
    );
}

#[test]
fn test_select_markup_is_dropped() {
    assert_eq!(
        body_html("<select><b>x</b><option>y</select>"),
        "<select>x<option>y</option></select>"
    );
}

// ---------------------------------------------------------------------------
// Head, template and frameset
// ---------------------------------------------------------------------------

#[test]
fn test_head_elements_before_body() {
    let tree = parse("<title>t</title><meta charset=utf-8><p>x");
    let head = tree.head().expect("head");
    assert_eq!(child_tags(&tree, head), ["title", "meta"]);
    assert_eq!(child_tags(&tree, body(&tree)), ["p"]);
}

#[test]
fn test_title_after_inserted_body() {
    let tree = parse(
        "<html><head>\n<noscript><link href='other.css' rel='stylesheet'></noscript>\n\
         <title>Test document</title>\n</head><body>\nfoo</body></html>",
    );
    let title = find_element(&tree, "title");
    assert_eq!(tree.text_content(title), "Test document");
}

#[test]
fn test_noscript_without_scripting_parses_markup() {
    let options = ParserOptions {
        scripting: false,
        ..ParserOptions::default()
    };
    let (tree, _) =
        parse_document_with_options("<head><noscript><link rel=a></noscript></head>", options);
    let noscript = find_element(&tree, "noscript");
    assert_eq!(child_tags(&tree, noscript), ["link"]);
}

#[test]
fn test_template_contents_keep_rows() {
    let tree = parse("<template><tr><td>x</td></tr></template>");
    let head = tree.head().expect("head");
    let template = find_element(&tree, "template");
    assert_eq!(tree.parent(template), Some(head));
    assert_eq!(child_tags(&tree, template), ["tr"]);
    assert!(tree.get_elements_by_tag_name("tbody").is_empty());
}

#[test]
fn test_frameset_replaces_empty_body() {
    for input in [
        "<div><span></span></div><frameset></frameset>",
        "<div> </div><frameset></frameset>",
        "<form></form><frameset></frameset>",
        "  \n<frameset></frameset>",
    ] {
        let tree = parse(input);
        let html = tree.document_element().expect("html");
        assert_eq!(child_tags(&tree, html), ["head", "frameset"], "input {input:?}");
        assert!(tree.forms().is_empty() || tree.is_connected(tree.forms()[0]));
    }
}

#[test]
fn test_frameset_ignored_once_body_has_content() {
    for input in [
        "<p>x</p><frameset></frameset>",
        "<table></table><frameset></frameset>",
        "&nbsp;<frameset></frameset>",
        "<body><frameset></frameset>",
    ] {
        let tree = parse(input);
        let html = tree.document_element().expect("html");
        assert_eq!(child_tags(&tree, html)[1], "body", "input {input:?}");
        assert!(tree.get_elements_by_tag_name("frameset").is_empty());
    }
}

#[test]
fn test_comment_after_body_goes_to_html() {
    let tree = parse("<p>x</p></body><!--c-->");
    let html = tree.document_element().expect("html");
    let last = tree.last_child(html).expect("html has children");
    assert!(matches!(
        tree.get(last).map(|n| &n.node_type),
        Some(NodeType::Comment(data)) if data == "c"
    ));
}

// ---------------------------------------------------------------------------
// Quirks mode
// ---------------------------------------------------------------------------

#[test]
fn test_missing_doctype_is_quirks() {
    let tree = parse("<p><table></table>");
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
    let p = find_element(&tree, "p");
    assert_eq!(child_tags(&tree, p), ["table"]);
}

#[test]
fn test_html5_doctype_is_no_quirks() {
    let tree = parse("<!DOCTYPE html><p><table></table>");
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
    assert_eq!(child_tags(&tree, body(&tree)), ["p", "table"]);
    assert_eq!(tree.doctype().map(|d| d.name.as_str()), Some("html"));
}

#[test]
fn test_transitional_doctype_without_system_id_is_quirks() {
    let tree = parse(r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN"><p>"#);
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
}

#[test]
fn test_transitional_doctype_with_system_id_is_limited_quirks() {
    let tree = parse(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd"><p>"#,
    );
    assert_eq!(tree.quirks_mode(), QuirksMode::LimitedQuirks);
}

// ---------------------------------------------------------------------------
// Incremental feeding and diagnostics
// ---------------------------------------------------------------------------

#[test]
fn test_incremental_token_feeding() {
    let mut builder = TreeBuilder::new();
    assert_eq!(builder.insertion_mode(), InsertionMode::Initial);

    builder.process_token(Token::html_doctype());
    assert_eq!(builder.insertion_mode(), InsertionMode::BeforeHtml);

    builder.process_token(Token::start_tag("html", &[]));
    assert_eq!(builder.insertion_mode(), InsertionMode::BeforeHead);
    assert!(builder.tree().document_element().is_some());

    builder.process_token(Token::start_tag("p", &[]));
    assert_eq!(builder.insertion_mode(), InsertionMode::InBody);
    assert!(builder.tree().body().is_some());

    builder.process_token(Token::characters("hi"));
    let p = builder.tree().get_elements_by_tag_name("p")[0];
    assert_eq!(builder.tree().text_content(p), "hi");
    assert!(!builder.is_finished());

    let tree = builder.finish();
    assert_eq!(inner_html(&tree, body(&tree)), "<p>hi</p>");
}

#[test]
fn test_tokens_after_eof_are_ignored() {
    let mut builder = TreeBuilder::new();
    builder.process_token(Token::characters("a"));
    builder.process_token(Token::EndOfFile);
    assert!(builder.is_finished());
    builder.process_token(Token::start_tag("p", &[]));
    let tree = builder.finish();
    assert!(tree.get_elements_by_tag_name("p").is_empty());
}

#[test]
fn test_diagnostics_reach_sink_in_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let recorder = Rc::clone(&seen);
    let parser = HTMLParser::new(tokens("<div>a</unknown>b</div>")).with_diagnostics(FnSink(
        move |d: &Diagnostic| recorder.borrow_mut().push(d.clone()),
    ));
    let (tree, issues) = parser.run_with_issues();

    assert_eq!(tree.text_content(find_element(&tree, "div")), "ab");
    assert!(!issues.is_empty());
    assert_eq!(*seen.borrow(), issues);
    assert!(issues.iter().any(|d| d.message.contains("</unknown>")));
    assert!(
        issues
            .windows(2)
            .all(|pair| pair[0].token_index <= pair[1].token_index)
    );
}

#[test]
fn test_well_formed_document_has_no_errors() {
    let (_, issues) = parse_document_with_options(
        "<!DOCTYPE html><html><head><title>x</title></head><body><p>a</p></body></html>",
        ParserOptions::default(),
    );
    assert!(issues.iter().all(|d| !d.is_error()), "{issues:?}");
}

#[test]
fn test_tokenizer_issues_are_reported() {
    let (_, issues) =
        parse_document_with_options("<!DOCTYPE html><a href=1 href=2>", ParserOptions::default());
    assert!(issues.iter().any(|d| d.message == "duplicate-attribute"));
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[test]
fn test_reparse_of_serialization_is_stable() {
    for input in MESSY_INPUTS
        .iter()
        .copied()
        .chain(["<!DOCTYPE html><title>x</title><p>a<b>b</b>"])
    {
        let first = serialize_document(&parse(input));
        let second = serialize_document(&parse(&first));
        assert_eq!(first, second, "input {input:?}");
    }
}

#[test]
fn test_reparse_of_serialization_raises_no_errors() {
    for input in [
        "<!DOCTYPE html><table><div>hello</div><tr><td>world</td></tr></table>",
        "<!DOCTYPE html><b>1<i>2</b>3</i>4",
        "<!DOCTYPE html><ul><li>item 1<div>in div</li><li>item2</li></ul>",
    ] {
        let serialized = serialize_document(&parse(input));
        let (_, issues) = parse_document_with_options(&serialized, ParserOptions::default());
        assert!(
            issues.iter().all(|d| !d.is_error()),
            "{serialized}: {issues:?}"
        );
    }
}
