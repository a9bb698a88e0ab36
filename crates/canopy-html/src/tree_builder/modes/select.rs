//! "in select" and "in select in table" insertion modes.

use super::super::open_elements::ScopeKind;
use super::super::{InsertionMode, Step, TreeBuilder};
use crate::tokenizer::Token;

const TABLE_TAGS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl TreeBuilder {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(crate) fn handle_in_select_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data } => {
                if data.contains('\0') {
                    self.parse_error("unexpected NULL character in select");
                }
                self.insert_characters(&data.replace('\0', ""));
                Step::Done
            }

            // "A comment token"
            Token::Comment { data } => {
                self.insert_comment(data);
                Step::Done
            }

            // "A DOCTYPE token"
            Token::Doctype { .. } => {
                self.parse_error("unexpected DOCTYPE in select");
                Step::Done
            }

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "option""
            // "If the current node is an option element, pop that node from the
            // stack of open elements. Insert an HTML element for the token."
            Token::StartTag { name, .. } if name == "option" => {
                if self.open_elements.current_tag() == Some("option") {
                    let _ = self.open_elements.pop();
                }
                let _ = self.insert_element_for(token);
                Step::Done
            }

            // "A start tag whose tag name is "optgroup""
            // "A start tag whose tag name is "hr""
            Token::StartTag { name, .. } if matches!(name.as_str(), "optgroup" | "hr") => {
                // "If the current node is an option element, pop that node from
                // the stack of open elements. If the current node is an optgroup
                // element, pop that node from the stack of open elements."
                if self.open_elements.current_tag() == Some("option") {
                    let _ = self.open_elements.pop();
                }
                if self.open_elements.current_tag() == Some("optgroup") {
                    let _ = self.open_elements.pop();
                }
                let _ = self.insert_element_for(token);
                // hr is void: "Immediately pop the current node off the stack of
                // open elements."
                if name == "hr" {
                    let _ = self.open_elements.pop();
                }
                Step::Done
            }

            // "An end tag whose tag name is "optgroup""
            Token::EndTag { name } if name == "optgroup" => {
                // "First, if the current node is an option element, and the node
                // immediately before it in the stack of open elements is an
                // optgroup element, then pop the current node from the stack of
                // open elements."
                let len = self.open_elements.len();
                if self.open_elements.current_tag() == Some("option")
                    && len >= 2
                    && self.open_elements.tag_at(len - 2) == Some("optgroup")
                {
                    let _ = self.open_elements.pop();
                }
                // "If the current node is an optgroup element, then pop that
                // node from the stack of open elements. Otherwise, this is a
                // parse error; ignore the token."
                if self.open_elements.current_tag() == Some("optgroup") {
                    let _ = self.open_elements.pop();
                } else {
                    self.parse_error("</optgroup> without an open optgroup");
                }
                Step::Done
            }

            // "An end tag whose tag name is "option""
            Token::EndTag { name } if name == "option" => {
                if self.open_elements.current_tag() == Some("option") {
                    let _ = self.open_elements.pop();
                } else {
                    self.parse_error("</option> without an open option");
                }
                Step::Done
            }

            // "An end tag whose tag name is "select""
            Token::EndTag { name } if name == "select" => {
                let _ = self.close_select();
                Step::Done
            }

            // "A start tag whose tag name is "select""
            // "Parse error. If the stack of open elements does not have a
            // select element in select scope, ignore the token. (fragment
            // case) Otherwise: Pop elements from the stack of open elements
            // until a select element has been popped from the stack. Reset the
            // insertion mode appropriately."
            Token::StartTag { name, .. } if name == "select" => {
                self.parse_error("nested <select>");
                let _ = self.close_select();
                Step::Done
            }

            // "A start tag whose tag name is one of: "input", "keygen", "textarea""
            // Same as above, then "Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "input" | "keygen" | "textarea") =>
            {
                self.parse_error(&format!("<{name}> inside a select"));
                if self.close_select() {
                    Step::Reprocess
                } else {
                    Step::Done
                }
            }

            // "A start tag whose tag name is one of: "script", "template""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. } if matches!(name.as_str(), "script" | "template") => {
                self.handle_in_head_mode(token)
            }
            Token::EndTag { name } if name == "template" => self.handle_in_head_mode(token),

            // "An end-of-file token"
            Token::EndOfFile => self.handle_in_body_mode(token),

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => {
                self.parse_error(&format!("{token} is not allowed in a select"));
                Step::Done
            }
        }
    }

    /// Pop up to and including the open select element, then reset the
    /// insertion mode. Returns false, after a parse error, when no select is
    /// in select scope.
    fn close_select(&mut self) -> bool {
        if !self
            .open_elements
            .has_element_in_scope("select", ScopeKind::Select)
        {
            self.parse_error("no open select");
            return false;
        }
        self.open_elements.pop_until_tag("select");
        self.reset_insertion_mode_appropriately();
        true
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(crate) fn handle_in_select_in_table_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error. Pop elements from the stack of open elements until
            // a select element has been popped from the stack. Reset the
            // insertion mode appropriately. Reprocess the token."
            Token::StartTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error(&format!("<{name}> closes the select"));
                self.open_elements.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                Step::Reprocess
            }

            // "An end tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            Token::EndTag { name } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error(&format!("</{name}> inside a select"));
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // that of the token, then ignore the token."
                if !self.open_elements.has_element_in_scope(name, ScopeKind::Table) {
                    return Step::Done;
                }
                self.open_elements.pop_until_tag("select");
                self.reset_insertion_mode_appropriately();
                Step::Reprocess
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion mode."
            _ => self.process_in_mode(InsertionMode::InSelect, token),
        }
    }
}
