//! Table insertion modes: "in table", "in table text", "in caption",
//! "in column group", "in table body", "in row" and "in cell".
//!
//! Content that is not allowed where it appears in a table is handled with
//! the "in body" rules while foster parenting is enabled, which moves it in
//! front of the table.

use super::body::is_hidden_input;
use super::super::open_elements::ScopeKind;
use super::super::{InsertionMode, Step, TreeBuilder, is_whitespace_text};
use crate::tokenizer::Token;

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl TreeBuilder {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(crate) fn handle_in_table_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element"
            // "Let the pending table character tokens be an empty list of
            // tokens. Let the original insertion mode be the current insertion
            // mode. Switch the insertion mode to "in table text" and reprocess
            // the token."
            Token::Character { .. }
                if self
                    .open_elements
                    .current_is_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"]) =>
            {
                self.pending_table_text.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.reprocess_in(InsertionMode::InTableText)
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
                self.parse_error("unexpected DOCTYPE in table");
                Step::Done
            }

            // "A start tag whose tag name is "caption""
            // "Clear the stack back to a table context. Insert a marker at the
            // end of the list of active formatting elements. Insert an HTML
            // element for the token, then switch the insertion mode to "in
            // caption"."
            Token::StartTag { name, .. } if name == "caption" => {
                self.open_elements.clear_to_table_context();
                self.active_formatting.insert_marker();
                let _ = self.insert_element_for(token);
                self.insertion_mode = InsertionMode::InCaption;
                Step::Done
            }

            // "A start tag whose tag name is "colgroup""
            Token::StartTag { name, .. } if name == "colgroup" => {
                self.open_elements.clear_to_table_context();
                let _ = self.insert_element_for(token);
                self.insertion_mode = InsertionMode::InColumnGroup;
                Step::Done
            }

            // "A start tag whose tag name is "col""
            // "Clear the stack back to a table context. Insert an HTML element
            // for a "colgroup" start tag token with no attributes, then switch
            // the insertion mode to "in column group". Reprocess the current
            // token."
            Token::StartTag { name, .. } if name == "col" => {
                self.open_elements.clear_to_table_context();
                let _ = self.insert_implied_element("colgroup");
                self.reprocess_in(InsertionMode::InColumnGroup)
            }

            // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::StartTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                self.open_elements.clear_to_table_context();
                let _ = self.insert_element_for(token);
                self.insertion_mode = InsertionMode::InTableBody;
                Step::Done
            }

            // "A start tag whose tag name is one of: "td", "th", "tr""
            // "Clear the stack back to a table context. Insert an HTML element
            // for a "tbody" start tag token with no attributes, then switch the
            // insertion mode to "in table body". Reprocess the current token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "td" | "th" | "tr") => {
                self.open_elements.clear_to_table_context();
                let _ = self.insert_implied_element("tbody");
                self.reprocess_in(InsertionMode::InTableBody)
            }

            // "A start tag whose tag name is "table""
            Token::StartTag { name, .. } if name == "table" => {
                // "Parse error."
                self.parse_error("<table> inside a table");
                // "If the stack of open elements does not have a table element
                // in table scope, ignore the token."
                if !self.open_elements.has_element_in_scope("table", ScopeKind::Table) {
                    return Step::Done;
                }
                // "Otherwise: Pop elements from this stack until a table element
                // has been popped from the stack. Reset the insertion mode
                // appropriately. Reprocess the token."
                self.open_elements.pop_until_tag("table");
                self.reset_insertion_mode_appropriately();
                Step::Reprocess
            }

            // "An end tag whose tag name is "table""
            Token::EndTag { name } if name == "table" => {
                if !self.open_elements.has_element_in_scope("table", ScopeKind::Table) {
                    self.parse_error("</table> without an open table");
                    return Step::Done;
                }
                self.open_elements.pop_until_tag("table");
                self.reset_insertion_mode_appropriately();
                Step::Done
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "body"
                        | "caption"
                        | "col"
                        | "colgroup"
                        | "html"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                ) =>
            {
                self.parse_error(&format!("unexpected </{name}> in table"));
                Step::Done
            }

            // "A start tag whose tag name is one of: "style", "script", "template""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "style" | "script" | "template") =>
            {
                self.handle_in_head_mode(token)
            }
            Token::EndTag { name } if name == "template" => self.handle_in_head_mode(token),

            // "A start tag whose tag name is "input""
            // "If the token does not have an attribute with the name "type", or
            // if it does, but that attribute's value is not an ASCII
            // case-insensitive match for the string "hidden", then: act as
            // described in the "anything else" entry below."
            // "Otherwise: Parse error. Insert an HTML element for the token.
            // Pop that input element off the stack of open elements.
            // Acknowledge the token's self-closing flag, if it is set."
            Token::StartTag {
                name, attributes, ..
            } if name == "input" && is_hidden_input(attributes) => {
                self.parse_error("hidden <input> directly inside a table");
                let _ = self.insert_element_for(token);
                let _ = self.open_elements.pop();
                Step::Done
            }

            // "A start tag whose tag name is "form""
            Token::StartTag { name, .. } if name == "form" => {
                // "Parse error."
                self.parse_error("<form> directly inside a table");
                // "If there is a template element on the stack of open
                // elements, or if the form element pointer is not null, ignore
                // the token."
                if self.open_elements.contains_tag("template") || self.form_element_pointer.is_some()
                {
                    return Step::Done;
                }
                // "Otherwise: Insert an HTML element for the token, and set the
                // form element pointer to point to the element created. Pop that
                // form element off the stack of open elements."
                let form = self.insert_element_for(token);
                self.form_element_pointer = Some(form);
                let _ = self.open_elements.pop();
                Step::Done
            }

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.handle_in_body_mode(token),

            // "Anything else"
            _ => self.in_table_anything_else(token),
        }
    }

    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn in_table_anything_else(&mut self, token: &Token) -> Step {
        self.parse_error(&format!("{token} is not allowed directly inside a table"));
        self.foster_parenting = true;
        let step = self.handle_in_body_mode(token);
        self.foster_parenting = false;
        step
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(crate) fn handle_in_table_text_mode(&mut self, token: &Token) -> Step {
        if let Token::Character { data } = token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            if data.contains('\0') {
                self.parse_error("unexpected NULL character in table");
            }
            // "Any other character token"
            // "Append the character token to the pending table character
            // tokens list."
            let text = data.replace('\0', "");
            if !text.is_empty() {
                self.pending_table_text.push(text);
            }
            return Step::Done;
        }

        // "Anything else"
        // "If any of the tokens in the pending table character tokens list are
        // character tokens that are not ASCII whitespace, then this is a parse
        // error: reprocess the character tokens in the pending table character
        // tokens list using the rules given in the "anything else" entry in the
        // "in table" insertion mode."
        // "Otherwise, insert the characters given by the pending table
        // character tokens list."
        let pending = std::mem::take(&mut self.pending_table_text);
        if pending.iter().any(|text| !is_whitespace_text(text)) {
            for text in pending {
                let _ = self.in_table_anything_else(&Token::Character { data: text });
            }
        } else {
            for text in pending {
                self.insert_characters(&text);
            }
        }

        // "Switch the insertion mode to the original insertion mode and
        // reprocess the token."
        let original = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InTable);
        self.reprocess_in(original)
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(crate) fn handle_in_caption_mode(&mut self, token: &Token) -> Step {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name } if name == "caption" => {
                let _ = self.close_caption();
                Step::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            // Close the caption as for </caption>, then "Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.close_caption_and_reprocess()
            }
            Token::EndTag { name } if name == "table" => self.close_caption_and_reprocess(),

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.parse_error(&format!("unexpected </{name}> in caption"));
                Step::Done
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.handle_in_body_mode(token),
        }
    }

    fn close_caption_and_reprocess(&mut self) -> Step {
        if self.close_caption() {
            Step::Reprocess
        } else {
            Step::Done
        }
    }

    /// Steps of `</caption>`. Returns whether a caption was closed.
    fn close_caption(&mut self) -> bool {
        // "If the stack of open elements does not have a caption element in
        // table scope, this is a parse error; ignore the token. (fragment case)"
        if !self
            .open_elements
            .has_element_in_scope("caption", ScopeKind::Table)
        {
            self.parse_error("</caption> without an open caption");
            return false;
        }
        // "1. Generate implied end tags.
        //  2. Now, if the current node is not a caption element, then this is a
        //  parse error.
        //  3. Pop elements from this stack until a caption element has been
        //  popped from the stack.
        //  4. Clear the list of active formatting elements up to the last marker.
        //  5. Switch the insertion mode to "in table"."
        self.generate_implied_end_tags(None);
        if self.open_elements.current_tag() != Some("caption") {
            self.parse_error("caption closed with open descendants");
        }
        self.open_elements.pop_until_tag("caption");
        self.active_formatting.clear_to_last_marker();
        self.insertion_mode = InsertionMode::InTable;
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(crate) fn handle_in_column_group_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Character { data } if is_whitespace_text(data) => {
                self.insert_characters(data);
                Step::Done
            }

            // "A comment token"
            Token::Comment { data } => {
                self.insert_comment(data);
                Step::Done
            }

            // "A DOCTYPE token"
            Token::Doctype { .. } => {
                self.parse_error("unexpected DOCTYPE in column group");
                Step::Done
            }

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_element_for(token);
                let _ = self.open_elements.pop();
                Step::Done
            }

            // "An end tag whose tag name is "colgroup""
            Token::EndTag { name } if name == "colgroup" => {
                // "If the current node is not a colgroup element, then this is
                // a parse error; ignore the token."
                if self.open_elements.current_tag() != Some("colgroup") {
                    self.parse_error("</colgroup> without an open colgroup");
                    return Step::Done;
                }
                let _ = self.open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
                Step::Done
            }

            // "An end tag whose tag name is "col""
            // "Parse error. Ignore the token."
            Token::EndTag { name } if name == "col" => {
                self.parse_error("stray </col>");
                Step::Done
            }

            // "A start tag whose tag name is "template""
            // "An end tag whose tag name is "template""
            Token::StartTag { name, .. } | Token::EndTag { name } if name == "template" => {
                self.handle_in_head_mode(token)
            }

            // "An end-of-file token"
            Token::EndOfFile => self.handle_in_body_mode(token),

            // "Anything else"
            _ => {
                // "If the current node is not a colgroup element, then this is
                // a parse error; ignore the token."
                if self.open_elements.current_tag() != Some("colgroup") {
                    self.parse_error(&format!("{token} is not allowed in a column group"));
                    return Step::Done;
                }
                // "Otherwise, pop the current node from the stack of open
                // elements. Switch the insertion mode to "in table". Reprocess
                // the token."
                let _ = self.open_elements.pop();
                self.reprocess_in(InsertionMode::InTable)
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(crate) fn handle_in_table_body_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A start tag whose tag name is "tr""
            // "Clear the stack back to a table body context. Insert an HTML
            // element for the token, then switch the insertion mode to "in row"."
            Token::StartTag { name, .. } if name == "tr" => {
                self.open_elements.clear_to_table_body_context();
                let _ = self.insert_element_for(token);
                self.insertion_mode = InsertionMode::InRow;
                Step::Done
            }

            // "A start tag whose tag name is one of: "th", "td""
            // "Parse error. Clear the stack back to a table body context.
            // Insert an HTML element for a "tr" start tag token with no
            // attributes, then switch the insertion mode to "in row". Reprocess
            // the current token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.parse_error(&format!("<{name}> outside a row"));
                self.open_elements.clear_to_table_body_context();
                let _ = self.insert_implied_element("tr");
                self.reprocess_in(InsertionMode::InRow)
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.open_elements.has_element_in_scope(name, ScopeKind::Table) {
                    self.parse_error(&format!("</{name}> without an open element"));
                    return Step::Done;
                }
                self.open_elements.clear_to_table_body_context();
                let _ = self.open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
                Step::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.close_table_section_and_reprocess()
            }
            Token::EndTag { name } if name == "table" => self.close_table_section_and_reprocess(),

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_error(&format!("unexpected </{name}> in table body"));
                Step::Done
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.handle_in_table_mode(token),
        }
    }

    fn close_table_section_and_reprocess(&mut self) -> Step {
        // "If the stack of open elements does not have a tbody, thead, or tfoot
        // element in table scope, this is a parse error; ignore the token."
        if !self
            .open_elements
            .has_one_in_scope(TABLE_SECTIONS, ScopeKind::Table)
        {
            self.parse_error("no open table section");
            return Step::Done;
        }
        // "Otherwise: Clear the stack back to a table body context. Pop the
        // current node from the stack of open elements. Switch the insertion
        // mode to "in table". Reprocess the token."
        self.open_elements.clear_to_table_body_context();
        let _ = self.open_elements.pop();
        self.reprocess_in(InsertionMode::InTable)
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(crate) fn handle_in_row_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A start tag whose tag name is one of: "th", "td""
            // "Clear the stack back to a table row context. Insert an HTML
            // element for the token, then switch the insertion mode to "in
            // cell". Insert a marker at the end of the list of active
            // formatting elements."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.open_elements.clear_to_table_row_context();
                let _ = self.insert_element_for(token);
                self.insertion_mode = InsertionMode::InCell;
                self.active_formatting.insert_marker();
                Step::Done
            }

            // "An end tag whose tag name is "tr""
            Token::EndTag { name } if name == "tr" => {
                let _ = self.close_row();
                Step::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead", "tr""
            // "An end tag whose tag name is "table""
            // Close the row as for </tr>, then "Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                self.close_row_and_reprocess()
            }
            Token::EndTag { name } if name == "table" => self.close_row_and_reprocess(),

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name } if TABLE_SECTIONS.contains(&name.as_str()) => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // the token, this is a parse error; ignore the token."
                if !self.open_elements.has_element_in_scope(name, ScopeKind::Table) {
                    self.parse_error(&format!("</{name}> without an open element"));
                    return Step::Done;
                }
                // "If the stack of open elements does not have a tr element in
                // table scope, ignore the token."
                self.close_row_and_reprocess()
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th""
            // "Parse error. Ignore the token."
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.parse_error(&format!("unexpected </{name}> in row"));
                Step::Done
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.handle_in_table_mode(token),
        }
    }

    fn close_row_and_reprocess(&mut self) -> Step {
        if self.close_row() {
            Step::Reprocess
        } else {
            Step::Done
        }
    }

    /// Steps of `</tr>`. Returns whether a row was closed.
    fn close_row(&mut self) -> bool {
        // "If the stack of open elements does not have a tr element in table
        // scope, this is a parse error; ignore the token."
        if !self.open_elements.has_element_in_scope("tr", ScopeKind::Table) {
            self.parse_error("</tr> without an open row");
            return false;
        }
        // "Otherwise: Clear the stack back to a table row context. Pop the
        // current node (which will be a tr element) from the stack of open
        // elements. Switch the insertion mode to "in table body"."
        self.open_elements.clear_to_table_row_context();
        let _ = self.open_elements.pop();
        self.insertion_mode = InsertionMode::InTableBody;
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(crate) fn handle_in_cell_mode(&mut self, token: &Token) -> Step {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name } if matches!(name.as_str(), "td" | "th") => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // that of the token, then this is a parse error; ignore the
                // token."
                if !self.open_elements.has_element_in_scope(name, ScopeKind::Table) {
                    self.parse_error(&format!("</{name}> without an open cell"));
                    return Step::Done;
                }
                // "1. Generate implied end tags.
                //  2. Now, if the current node is not an HTML element with the
                //  same tag name as the token, then this is a parse error.
                //  3. Pop elements from the stack of open elements stack until
                //  an HTML element with the same tag name as the token has been
                //  popped from the stack.
                //  4. Clear the list of active formatting elements up to the
                //  last marker.
                //  5. Switch the insertion mode to "in row"."
                self.generate_implied_end_tags(None);
                if self.open_elements.current_tag() != Some(name.as_str()) {
                    self.parse_error(&format!("</{name}> with open descendants"));
                }
                self.open_elements.pop_until_tag(name);
                self.active_formatting.clear_to_last_marker();
                self.insertion_mode = InsertionMode::InRow;
                Step::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                // "If the stack of open elements does not have a td or th
                // element in table scope, then this is a parse error; ignore the
                // token. (fragment case)"
                if !self
                    .open_elements
                    .has_one_in_scope(&["td", "th"], ScopeKind::Table)
                {
                    self.parse_error(&format!("<{name}> outside a cell"));
                    return Step::Done;
                }
                // "Otherwise, close the cell and reprocess the token."
                self.close_the_cell();
                Step::Reprocess
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            // "Parse error. Ignore the token."
            Token::EndTag { name }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                self.parse_error(&format!("unexpected </{name}> in cell"));
                Step::Done
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr""
            Token::EndTag { name }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // that of the token, then this is a parse error; ignore the
                // token."
                if !self.open_elements.has_element_in_scope(name, ScopeKind::Table) {
                    self.parse_error(&format!("</{name}> without an open element"));
                    return Step::Done;
                }
                // "Otherwise, close the cell and reprocess the token."
                self.close_the_cell();
                Step::Reprocess
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.handle_in_body_mode(token),
        }
    }
}
