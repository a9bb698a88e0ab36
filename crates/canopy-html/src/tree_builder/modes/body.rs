//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use canopy_dom::QuirksMode;

use super::super::adoption::AdoptionOutcome;
use super::super::open_elements::{ScopeKind, is_formatting, is_special};
use super::super::{InsertionMode, Step, TreeBuilder, is_whitespace_text};
use crate::tokenizer::{Attribute, Token, attributes_to_map};

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Start tags that close an open p element and insert a plain block.
fn is_block_start(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "center"
            | "details"
            | "dialog"
            | "dir"
            | "div"
            | "dl"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "header"
            | "hgroup"
            | "main"
            | "menu"
            | "nav"
            | "ol"
            | "p"
            | "search"
            | "section"
            | "summary"
            | "ul"
    )
}

/// End tags closed by "generate implied end tags, then pop until".
fn is_block_end(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "button"
            | "center"
            | "details"
            | "dialog"
            | "dir"
            | "div"
            | "dl"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "header"
            | "hgroup"
            | "listing"
            | "main"
            | "menu"
            | "nav"
            | "ol"
            | "pre"
            | "search"
            | "section"
            | "summary"
            | "ul"
    )
}

/// Whether an `<input>` has `type=hidden` (ASCII case-insensitive).
pub(super) fn is_hidden_input(attributes: &[Attribute]) -> bool {
    attributes
        .iter()
        .find(|a| a.name == "type")
        .is_some_and(|a| a.value.eq_ignore_ascii_case("hidden"))
}

impl TreeBuilder {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    #[allow(clippy::cognitive_complexity)]
    pub(crate) fn handle_in_body_mode(&mut self, token: &Token) -> Step {
        match token {
            Token::Character { data } => {
                self.in_body_characters(data);
                Step::Done
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
                Step::Done
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error("unexpected DOCTYPE in body");
                Step::Done
            }

            // "A start tag whose tag name is "html""
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                // "Parse error."
                self.parse_error("unexpected <html> in body");
                // "If there is a template element on the stack of open
                // elements, then ignore the token."
                // "Otherwise, for each attribute on the token, check to see if
                // the attribute is already present on the top element of the
                // stack of open elements. If it is not, add the attribute and
                // its corresponding value to that element."
                if !self.open_elements.contains_tag("template")
                    && let Some(html) = self.open_elements.get(0)
                {
                    self.merge_missing_attributes(html, attributes);
                }
                Step::Done
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base"
                        | "basefont"
                        | "bgsound"
                        | "link"
                        | "meta"
                        | "noframes"
                        | "script"
                        | "style"
                        | "template"
                        | "title"
                ) =>
            {
                self.handle_in_head_mode(token)
            }
            Token::EndTag { name } if name == "template" => self.handle_in_head_mode(token),

            // "A start tag whose tag name is "body""
            Token::StartTag {
                name, attributes, ..
            } if name == "body" => {
                // "Parse error."
                self.parse_error("unexpected <body> in body");
                // "If the stack of open elements has only one node on it, or if
                // the second element on the stack of open elements is not a
                // body element, or if there is a template element on the stack
                // of open elements, then ignore the token. (fragment case or
                // there is a template element on the stack)"
                if self.open_elements.contains_tag("template") {
                    return Step::Done;
                }
                let Some(body) = self.body_on_stack() else {
                    return Step::Done;
                };
                // "Otherwise, set the frameset-ok flag to "not ok"; then, for
                // each attribute on the token, check to see if the attribute is
                // already present on the body element (the second element) on
                // the stack of open elements, and if it is not, add the
                // attribute and its corresponding value to that element."
                self.frameset_ok = false;
                self.merge_missing_attributes(body, attributes);
                Step::Done
            }

            // "A start tag whose tag name is "frameset""
            Token::StartTag { name, .. } if name == "frameset" => {
                self.in_body_frameset(token);
                Step::Done
            }

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template"
                // insertion mode."
                if !self.template_insertion_modes.is_empty() {
                    return self.handle_in_template_mode(token);
                }
                // "Otherwise, follow these steps: If there is a node in the
                // stack of open elements that is not either a dd element, a dt
                // element, ... the body element, or the html element, then this
                // is a parse error."
                if self.has_unexpected_open_elements_at_eof() {
                    self.parse_error("end of file with open elements");
                }
                // "Stop parsing."
                self.stop_parsing();
                Step::Done
            }

            // "An end tag whose tag name is "body""
            Token::EndTag { name } if name == "body" => {
                if self.close_body() {
                    self.insertion_mode = InsertionMode::AfterBody;
                }
                Step::Done
            }

            // "An end tag whose tag name is "html""
            // Same as </body>, then "Reprocess the token."
            Token::EndTag { name } if name == "html" => {
                if self.close_body() {
                    self.reprocess_in(InsertionMode::AfterBody)
                } else {
                    Step::Done
                }
            }

            // "A start tag whose tag name is one of: "address", "article", ...
            // "ul""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            Token::StartTag { name, .. } if is_block_start(name) => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_element_for(token);
                self.check_self_closing(token);
                Step::Done
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            Token::StartTag { name, .. } if HEADINGS.contains(&name.as_str()) => {
                self.close_p_if_in_button_scope();
                // "If the current node is an HTML element whose tag name is one
                // of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; pop the current node off the stack of open elements."
                if self.open_elements.current_is_one_of(HEADINGS) {
                    self.parse_error(&format!("<{name}> nested in a heading"));
                    let _ = self.open_elements.pop();
                }
                let _ = self.insert_element_for(token);
                Step::Done
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            Token::StartTag { name, .. } if matches!(name.as_str(), "pre" | "listing") => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_element_for(token);
                // "If the next token is a U+000A LINE FEED (LF) character token,
                // then ignore that token and move on to the next one. (Newlines
                // at the start of pre blocks are ignored as an authoring
                // convenience.)"
                self.ignore_next_line_feed = true;
                self.frameset_ok = false;
                Step::Done
            }

            // "A start tag whose tag name is "form""
            Token::StartTag { name, .. } if name == "form" => {
                let template_open = self.open_elements.contains_tag("template");
                // "If the form element pointer is not null, and there is no
                // template element on the stack of open elements, then this is
                // a parse error; ignore the token."
                if self.form_element_pointer.is_some() && !template_open {
                    self.parse_error("nested <form>");
                    return Step::Done;
                }
                // "Otherwise: If the stack of open elements has a p element in
                // button scope, then close a p element. Insert an HTML element
                // for the token, and, if there is no template element on the
                // stack of open elements, set the form element pointer to point
                // to the element created."
                self.close_p_if_in_button_scope();
                let form = self.insert_element_for(token);
                if !template_open {
                    self.form_element_pointer = Some(form);
                }
                Step::Done
            }

            // "A start tag whose tag name is "li""
            Token::StartTag { name, .. } if name == "li" => {
                self.close_list_item(&["li"]);
                let _ = self.insert_element_for(token);
                Step::Done
            }

            // "A start tag whose tag name is one of: "dd", "dt""
            Token::StartTag { name, .. } if matches!(name.as_str(), "dd" | "dt") => {
                self.close_list_item(&["dd", "dt"]);
                let _ = self.insert_element_for(token);
                Step::Done
            }

            // "A start tag whose tag name is "plaintext""
            Token::StartTag { name, .. } if name == "plaintext" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_element_for(token);
                Step::Done
            }

            // "A start tag whose tag name is "button""
            Token::StartTag { name, .. } if name == "button" => {
                // "If the stack of open elements has a button element in scope,
                // then run these substeps: Parse error. Generate implied end
                // tags. Pop elements from the stack of open elements until a
                // button element has been popped from the stack."
                if self
                    .open_elements
                    .has_element_in_scope("button", ScopeKind::Default)
                {
                    self.parse_error("nested <button>");
                    self.generate_implied_end_tags(None);
                    self.open_elements.pop_until_tag("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element_for(token);
                self.frameset_ok = false;
                Step::Done
            }

            // "An end tag whose tag name is one of: "address", "article", ...
            // "ul""
            Token::EndTag { name } if is_block_end(name) => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element with the same tag name as that
                // of the token, then this is a parse error; ignore the token."
                if !self
                    .open_elements
                    .has_element_in_scope(name, ScopeKind::Default)
                {
                    self.parse_error(&format!("</{name}> without an open element"));
                    return Step::Done;
                }
                self.generate_implied_end_tags(None);
                if self.open_elements.current_tag() != Some(name.as_str()) {
                    self.parse_error(&format!("</{name}> with open descendants"));
                }
                self.open_elements.pop_until_tag(name);
                Step::Done
            }

            // "An end tag whose tag name is "form""
            Token::EndTag { name } if name == "form" => {
                self.in_body_form_end_tag();
                Step::Done
            }

            // "An end tag whose tag name is "p""
            Token::EndTag { name } if name == "p" => {
                // "If the stack of open elements does not have a p element in
                // button scope, then this is a parse error; insert an HTML
                // element for a "p" start tag token with no attributes."
                if !self.open_elements.has_element_in_scope("p", ScopeKind::Button) {
                    self.parse_error("</p> without an open p element");
                    let _ = self.insert_implied_element("p");
                }
                // "Close a p element."
                self.close_p_element();
                Step::Done
            }

            // "An end tag whose tag name is "li""
            Token::EndTag { name } if name == "li" => {
                self.close_named_element(name, ScopeKind::ListItem);
                Step::Done
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            Token::EndTag { name } if matches!(name.as_str(), "dd" | "dt") => {
                self.close_named_element(name, ScopeKind::Default);
                Step::Done
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            // "h5", "h6""
            Token::EndTag { name } if HEADINGS.contains(&name.as_str()) => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element and whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; ignore the token."
                if !self.open_elements.has_one_in_scope(HEADINGS, ScopeKind::Default) {
                    self.parse_error(&format!("</{name}> without an open heading"));
                    return Step::Done;
                }
                self.generate_implied_end_tags(None);
                if self.open_elements.current_tag() != Some(name.as_str()) {
                    self.parse_error(&format!("mis-nested </{name}>"));
                }
                self.open_elements.pop_until_one_of(HEADINGS);
                Step::Done
            }

            // "A start tag whose tag name is "a""
            Token::StartTag { name, .. } if name == "a" => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker on
                // the list (or the start of the list if there is no marker on
                // the list), then this is a parse error; run the adoption agency
                // algorithm for the token, then remove that element from the
                // list of active formatting elements and the stack of open
                // elements if the adoption agency algorithm didn't already
                // remove it (it might not have if the element is not in table
                // scope)."
                if let Some((_, existing)) = self.active_formatting.find_after_last_marker("a") {
                    self.parse_error("<a> inside an open <a>");
                    let _ = self.run_adoption_agency("a");
                    self.active_formatting.remove(existing);
                    self.open_elements.remove(existing);
                }
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(token);
                Step::Done
            }

            // "A start tag whose tag name is "nobr""
            Token::StartTag { name, .. } if name == "nobr" => {
                self.reconstruct_active_formatting_elements();
                // "If the stack of open elements has a nobr element in scope,
                // then this is a parse error; run the adoption agency algorithm
                // for the token, then once again reconstruct the active
                // formatting elements, if any."
                if self
                    .open_elements
                    .has_element_in_scope("nobr", ScopeKind::Default)
                {
                    self.parse_error("nested <nobr>");
                    let _ = self.run_adoption_agency("nobr");
                    self.reconstruct_active_formatting_elements();
                }
                self.insert_formatting_element(token);
                Step::Done
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            Token::StartTag { name, .. } if is_formatting(name) => {
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(token);
                Step::Done
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            // "tt", "u""
            // "Run the adoption agency algorithm for the token."
            Token::EndTag { name } if is_formatting(name) => {
                if self.run_adoption_agency(name) == AdoptionOutcome::AnyOtherEndTag {
                    self.in_body_any_other_end_tag(name);
                }
                Step::Done
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "applet" | "marquee" | "object") =>
            {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element_for(token);
                self.active_formatting.insert_marker();
                self.frameset_ok = false;
                Step::Done
            }

            // "An end tag token whose tag name is one of: "applet", "marquee",
            // "object""
            Token::EndTag { name } if matches!(name.as_str(), "applet" | "marquee" | "object") => {
                if !self
                    .open_elements
                    .has_element_in_scope(name, ScopeKind::Default)
                {
                    self.parse_error(&format!("</{name}> without an open element"));
                    return Step::Done;
                }
                self.generate_implied_end_tags(None);
                if self.open_elements.current_tag() != Some(name.as_str()) {
                    self.parse_error(&format!("</{name}> with open descendants"));
                }
                self.open_elements.pop_until_tag(name);
                self.active_formatting.clear_to_last_marker();
                Step::Done
            }

            // "A start tag whose tag name is "table""
            Token::StartTag { name, .. } if name == "table" => {
                // "If the Document is not set to quirks mode, and the stack of
                // open elements has a p element in button scope, then close a p
                // element."
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_if_in_button_scope();
                }
                let _ = self.insert_element_for(token);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTable;
                Step::Done
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br" start
            // tag token with no attributes, rather than the end tag token that
            // it actually is."
            Token::EndTag { name } if name == "br" => {
                self.parse_error("</br> treated as <br>");
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_implied_element("br");
                let _ = self.open_elements.pop();
                self.frameset_ok = false;
                Step::Done
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr""
            // "Reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token. Immediately pop the current node off
            // the stack of open elements. Acknowledge the token's self-closing
            // flag, if it is set. Set the frameset-ok flag to "not ok"."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "area" | "br" | "embed" | "img" | "keygen" | "wbr") =>
            {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element_for(token);
                let _ = self.open_elements.pop();
                self.frameset_ok = false;
                Step::Done
            }

            // "A start tag whose tag name is "input""
            Token::StartTag {
                name, attributes, ..
            } if name == "input" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element_for(token);
                let _ = self.open_elements.pop();
                // "If the token does not have an attribute with the name "type",
                // or if it does, but that attribute's value is not an ASCII
                // case-insensitive match for the string "hidden", then: set the
                // frameset-ok flag to "not ok"."
                if !is_hidden_input(attributes) {
                    self.frameset_ok = false;
                }
                Step::Done
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            Token::StartTag { name, .. } if matches!(name.as_str(), "param" | "source" | "track") => {
                let _ = self.insert_element_for(token);
                let _ = self.open_elements.pop();
                Step::Done
            }

            // "A start tag whose tag name is "hr""
            Token::StartTag { name, .. } if name == "hr" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_element_for(token);
                let _ = self.open_elements.pop();
                self.frameset_ok = false;
                Step::Done
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            // it. (Don't ask.)"
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } if name == "image" => {
                self.parse_error("<image> treated as <img>");
                self.handle_in_body_mode(&Token::StartTag {
                    name: "img".to_string(),
                    self_closing: *self_closing,
                    attributes: attributes.clone(),
                })
            }

            // "A start tag whose tag name is "textarea""
            Token::StartTag { name, .. } if name == "textarea" => {
                let _ = self.insert_element_for(token);
                self.ignore_next_line_feed = true;
                self.original_insertion_mode = Some(self.insertion_mode);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::Text;
                Step::Done
            }

            // "A start tag whose tag name is "xmp""
            Token::StartTag { name, .. } if name == "xmp" => {
                self.close_p_if_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_text_element(token);
                Step::Done
            }

            // "A start tag whose tag name is "iframe""
            Token::StartTag { name, .. } if name == "iframe" => {
                self.frameset_ok = false;
                self.parse_text_element(token);
                Step::Done
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag is enabled"
            // "Follow the generic raw text element parsing algorithm."
            Token::StartTag { name, .. }
                if name == "noembed" || (name == "noscript" && self.options.scripting) =>
            {
                self.parse_text_element(token);
                Step::Done
            }

            // "A start tag whose tag name is "select""
            Token::StartTag { name, .. } if name == "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element_for(token);
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in
                // table body", "in row", or "in cell", then switch the insertion
                // mode to "in select in table". Otherwise, switch the insertion
                // mode to "in select"."
                self.insertion_mode = match self.insertion_mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
                Step::Done
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            Token::StartTag { name, .. } if matches!(name.as_str(), "optgroup" | "option") => {
                if self.open_elements.current_tag() == Some("option") {
                    let _ = self.open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element_for(token);
                Step::Done
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            Token::StartTag { name, .. } if matches!(name.as_str(), "rb" | "rtc") => {
                if self
                    .open_elements
                    .has_element_in_scope("ruby", ScopeKind::Default)
                {
                    self.generate_implied_end_tags(None);
                    if self.open_elements.current_tag() != Some("ruby") {
                        self.parse_error(&format!("<{name}> outside ruby"));
                    }
                }
                let _ = self.insert_element_for(token);
                Step::Done
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            Token::StartTag { name, .. } if matches!(name.as_str(), "rp" | "rt") => {
                if self
                    .open_elements
                    .has_element_in_scope("ruby", ScopeKind::Default)
                {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.open_elements.current_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error(&format!("<{name}> outside ruby"));
                    }
                }
                let _ = self.insert_element_for(token);
                Step::Done
            }

            // "A start tag whose tag name is "math"" / "svg""
            // Foreign content is built as ordinary elements.
            Token::StartTag {
                name, self_closing, ..
            } if matches!(name.as_str(), "math" | "svg") => {
                self.parse_warning(&format!("<{name}> content is parsed as HTML elements"));
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element_for(token);
                if *self_closing {
                    let _ = self.open_elements.pop();
                }
                Step::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr""
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption"
                        | "col"
                        | "colgroup"
                        | "frame"
                        | "head"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                ) =>
            {
                self.parse_error(&format!("<{name}> outside its context"));
                Step::Done
            }

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token."
            Token::StartTag { .. } => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_element_for(token);
                self.check_self_closing(token);
                Step::Done
            }

            // "Any other end tag"
            Token::EndTag { name } => {
                self.in_body_any_other_end_tag(name);
                Step::Done
            }
        }
    }

    fn in_body_characters(&mut self, data: &str) {
        // "A character token that is U+0000 NULL"
        // "Parse error. Ignore the token."
        let text = if data.contains('\0') {
            self.parse_error("unexpected NULL character");
            data.replace('\0', "")
        } else {
            data.to_string()
        };
        if text.is_empty() {
            return;
        }

        // "Reconstruct the active formatting elements, if any. Insert the
        // token's character."
        self.reconstruct_active_formatting_elements();
        self.insert_characters(&text);

        // "Any other character token": "Set the frameset-ok flag to "not ok"."
        if !is_whitespace_text(&text) {
            self.frameset_ok = false;
        }
    }

    /// The checks shared by `</body>` and `</html>`. Returns whether the body
    /// may be closed.
    fn close_body(&mut self) -> bool {
        // "If the stack of open elements does not have a body element in
        // scope, this is a parse error; ignore the token."
        if !self
            .open_elements
            .has_element_in_scope("body", ScopeKind::Default)
        {
            self.parse_error("</body> without an open body");
            return false;
        }
        // "Otherwise, if there is a node in the stack of open elements that is
        // not either a dd element, ... the body element, or the html element,
        // then this is a parse error."
        if self.has_unexpected_open_elements_at_eof() {
            self.parse_error("</body> with open elements");
        }
        true
    }

    /// "A start tag whose tag name is "frameset""
    fn in_body_frameset(&mut self, token: &Token) {
        // "Parse error."
        self.parse_error("unexpected <frameset> in body");

        // "If the stack of open elements has only one node on it, or if the
        // second element on the stack of open elements is not a body element,
        // then ignore the token. (fragment case or there is a template element
        // on the stack)"
        let Some(body) = self.body_on_stack() else {
            return;
        };
        // "If the frameset-ok flag is set to "not ok", ignore the token."
        if !self.frameset_ok {
            return;
        }

        // "Otherwise, run the following steps:
        //  1. Remove the second element on the stack of open elements from its
        //     parent node, if it has one.
        //  2. Pop all the nodes from the bottom of the stack of open elements,
        //     from the current node up to, but not including, the root html
        //     element.
        //  3. Insert an HTML element for the token.
        //  4. Switch the insertion mode to "in frameset"."
        self.tree.detach(body);
        self.open_elements.truncate(1);
        let _ = self.insert_element_for(token);
        self.insertion_mode = InsertionMode::InFrameset;
        self.drop_disconnected_form_pointer();
    }

    /// "An end tag whose tag name is "form""
    fn in_body_form_end_tag(&mut self) {
        // "If there is no template element on the stack of open elements, then
        // run these substeps:"
        if !self.open_elements.contains_tag("template") {
            // "1. Let node be the element that the form element pointer is set to,
            //  or null if it is not set to an element.
            //  2. Set the form element pointer to null.
            //  3. If node is null or if the stack of open elements does not have
            //  node in scope, then this is a parse error; return and ignore the
            //  token."
            let node = self.form_element_pointer.take();
            let Some(node) = node.filter(|&n| {
                self.open_elements
                    .has_node_in_scope(n, ScopeKind::Default)
            }) else {
                self.parse_error("</form> without an open form");
                return;
            };
            // "4. Generate implied end tags.
            //  5. If the current node is not node, then this is a parse error.
            //  6. Remove node from the stack of open elements."
            self.generate_implied_end_tags(None);
            if self.open_elements.current() != Some(node) {
                self.parse_error("</form> with open descendants");
            }
            self.open_elements.remove(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then
        // run these substeps instead:"
        if !self
            .open_elements
            .has_element_in_scope("form", ScopeKind::Default)
        {
            self.parse_error("</form> without an open form");
            return;
        }
        self.generate_implied_end_tags(None);
        if self.open_elements.current_tag() != Some("form") {
            self.parse_error("</form> with open descendants");
        }
        self.open_elements.pop_until_tag("form");
    }

    /// The shared steps of `<li>`, `<dd>` and `<dt>`: close an open list item
    /// of one of `tags` unless a special element other than address, div or p
    /// intervenes, then close an open p.
    fn close_list_item(&mut self, tags: &[&str]) {
        // "1. Set the frameset-ok flag to "not ok"."
        self.frameset_ok = false;

        // "2. Initialize node to be the current node (the bottommost node of
        // the stack).
        //  3. Loop: If node is an li element, then run these substeps ..."
        let entries = self.open_elements.entries();
        let mut found = None;
        for entry in entries.iter().rev() {
            if tags.contains(&entry.tag.as_str()) {
                found = Some(entry.tag.clone());
                break;
            }
            // "If node is in the special category, but is not an address, div,
            // or p element, then jump to the step labeled done below."
            if is_special(&entry.tag) && !matches!(entry.tag.as_str(), "address" | "div" | "p") {
                break;
            }
        }

        if let Some(tag) = found {
            // "Generate implied end tags, except for li elements. If the
            // current node is not an li element, then this is a parse error.
            // Pop elements from the stack of open elements until an li element
            // has been popped from the stack."
            self.generate_implied_end_tags(Some(&tag));
            if self.open_elements.current_tag() != Some(tag.as_str()) {
                self.parse_error(&format!("<{tag}> closed with open descendants"));
            }
            self.open_elements.pop_until_tag(&tag);
        }

        // "Done: If the stack of open elements has a p element in button scope,
        // then close a p element."
        self.close_p_if_in_button_scope();
    }

    /// End tags for `li`, `dd` and `dt`.
    fn close_named_element(&mut self, name: &str, scope: ScopeKind) {
        if !self.open_elements.has_element_in_scope(name, scope) {
            self.parse_error(&format!("</{name}> without an open element"));
            return;
        }
        self.generate_implied_end_tags(Some(name));
        if self.open_elements.current_tag() != Some(name) {
            self.parse_error(&format!("</{name}> with open descendants"));
        }
        self.open_elements.pop_until_tag(name);
    }

    /// Insert an element for a formatting start tag and "push onto the list
    /// of active formatting elements that element".
    fn insert_formatting_element(&mut self, token: &Token) {
        let Token::StartTag {
            name, attributes, ..
        } = token
        else {
            return;
        };
        let element = self.insert_element_for(token);
        self.active_formatting
            .push(element, name, attributes_to_map(attributes));
    }

    /// "Any other end tag"
    pub(crate) fn in_body_any_other_end_tag(&mut self, name: &str) {
        // "1. Initialize node to be the current node (the bottommost node of
        // the stack).
        //  2. Loop: If node is an HTML element with the same tag name as the
        //  token, then: ...
        //  3. Otherwise, if node is in the special category, then this is a
        //  parse error; ignore the token, and return."
        let target = self
            .open_elements
            .entries()
            .iter()
            .rev()
            .find(|e| e.tag == name || is_special(&e.tag))
            .map(|e| (e.node, e.tag == name));

        let Some((node, true)) = target else {
            self.parse_error(&format!("stray </{name}>"));
            return;
        };
        // "1. Generate implied end tags, except for HTML elements with the
        // same tag name as the token.
        //  2. If node is not the current node, then this is a parse error.
        //  3. Pop all the nodes from the current node up to node, including
        //  node, then stop these steps."
        self.generate_implied_end_tags(Some(name));
        if self.open_elements.current() != Some(node) {
            self.parse_error(&format!("</{name}> with open descendants"));
        }
        self.open_elements.pop_until_node(node);
    }
}
