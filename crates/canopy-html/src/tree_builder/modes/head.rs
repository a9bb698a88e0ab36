//! Insertion modes from the start of the document up to the body, plus the
//! "text" mode used by RCDATA and raw text elements.

use canopy_dom::{DocumentType, NodeId, QuirksMode};

use super::super::{InsertionMode, Step, TreeBuilder, is_whitespace_text};
use crate::tokenizer::Token;

/// [§ 13.2.6.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
///
/// Public identifiers that start with one of these put the document in quirks
/// mode (compared ASCII case-insensitively).
const QUIRKS_PUBLIC_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// Document mode selected by a DOCTYPE token.
fn quirks_mode_for_doctype(
    name: Option<&str>,
    public_identifier: Option<&str>,
    system_identifier: Option<&str>,
    force_quirks: bool,
) -> QuirksMode {
    let public = public_identifier.map(str::to_ascii_lowercase);
    let system = system_identifier.map(str::to_ascii_lowercase);
    let public = public.as_deref();
    let system = system.as_deref();
    let public_starts_with = |prefix: &str| public.is_some_and(|p| p.starts_with(prefix));

    if force_quirks
        || name != Some("html")
        || matches!(
            public,
            Some("-//w3o//dtd w3 html strict 3.0//en//" | "-/w3c/dtd html 4.0 transitional/en" | "html")
        )
        || system == Some("http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd")
        || QUIRKS_PUBLIC_PREFIXES.iter().any(|p| public_starts_with(p))
        || (system.is_none()
            && (public_starts_with("-//w3c//dtd html 4.01 frameset//")
                || public_starts_with("-//w3c//dtd html 4.01 transitional//")))
    {
        return QuirksMode::Quirks;
    }

    if public_starts_with("-//w3c//dtd xhtml 1.0 frameset//")
        || public_starts_with("-//w3c//dtd xhtml 1.0 transitional//")
        || (system.is_some()
            && (public_starts_with("-//w3c//dtd html 4.01 frameset//")
                || public_starts_with("-//w3c//dtd html 4.01 transitional//")))
    {
        return QuirksMode::LimitedQuirks;
    }
    QuirksMode::NoQuirks
}

impl TreeBuilder {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(crate) fn handle_initial_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if is_whitespace_text(data) => Step::Done,

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.append_comment(data, NodeId::ROOT);
                Step::Done
            }

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                // "If the DOCTYPE token's name is not "html", or the token's
                // public identifier is not missing, or the token's system
                // identifier is neither missing nor "about:legacy-compat", then
                // there is a parse error."
                if name.as_deref() != Some("html")
                    || public_identifier.is_some()
                    || system_identifier
                        .as_deref()
                        .is_some_and(|s| s != "about:legacy-compat")
                {
                    self.parse_error("unexpected DOCTYPE");
                }

                // "Append a DocumentType node to the Document node"
                self.tree.set_doctype(DocumentType {
                    name: name.clone().unwrap_or_default(),
                    public_id: public_identifier.clone().unwrap_or_default(),
                    system_id: system_identifier.clone().unwrap_or_default(),
                });

                let mode = quirks_mode_for_doctype(
                    name.as_deref(),
                    public_identifier.as_deref(),
                    system_identifier.as_deref(),
                    *force_quirks,
                );
                self.tree.set_quirks_mode(mode);

                // "Then, switch the insertion mode to "before html"."
                self.insertion_mode = InsertionMode::BeforeHtml;
                Step::Done
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is a
            // parse error; if the parser cannot change the mode flag is false,
            // set the Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then
            // reprocess the token."
            _ => {
                self.parse_error("missing DOCTYPE");
                self.tree.set_quirks_mode(QuirksMode::Quirks);
                self.reprocess_in(InsertionMode::BeforeHtml)
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(crate) fn handle_before_html_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error("unexpected DOCTYPE");
                Step::Done
            }

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.append_comment(data, NodeId::ROOT);
                Step::Done
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            Token::Character { data } if is_whitespace_text(data) => Step::Done,

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document object.
            // Put this element in the stack of open elements."
            // "Switch the insertion mode to "before head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let html = self.create_element_for_token(name, attributes, NodeId::ROOT);
                self.tree.append_child(NodeId::ROOT, html);
                self.open_elements.push(html, "html");
                self.insertion_mode = InsertionMode::BeforeHead;
                Step::Done
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_html_anything_else()
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { name } => {
                self.parse_error(&format!("unexpected </{name}> before <html>"));
                Step::Done
            }

            // "Anything else"
            _ => self.before_html_anything_else(),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess the
    /// token."
    fn before_html_anything_else(&mut self) -> Step {
        let html = self.create_element_for_token("html", &[], NodeId::ROOT);
        self.tree.append_child(NodeId::ROOT, html);
        self.open_elements.push(html, "html");
        self.reprocess_in(InsertionMode::BeforeHead)
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(crate) fn handle_before_head_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            Token::Character { data } if is_whitespace_text(data) => Step::Done,

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
                Step::Done
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error("unexpected DOCTYPE");
                Step::Done
            }

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            Token::StartTag { name, .. } if name == "head" => {
                let head = self.insert_element_for(token);
                self.head_element_pointer = Some(head);
                self.insertion_mode = InsertionMode::InHead;
                Step::Done
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_head_anything_else()
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { name } => {
                self.parse_error(&format!("unexpected </{name}> before <head>"));
                Step::Done
            }

            // "Anything else"
            _ => self.before_head_anything_else(),
        }
    }

    /// "Insert an HTML element for a "head" start tag token with no attributes.
    /// Set the head element pointer to the newly created head element. Switch
    /// the insertion mode to "in head". Reprocess the current token."
    fn before_head_anything_else(&mut self) -> Step {
        let head = self.insert_implied_element("head");
        self.head_element_pointer = Some(head);
        self.reprocess_in(InsertionMode::InHead)
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(crate) fn handle_in_head_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Character { data } if is_whitespace_text(data) => {
                self.insert_characters(data);
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
                self.parse_error("unexpected DOCTYPE");
                Step::Done
            }

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            //
            // "A start tag whose tag name is "meta"" is handled the same way;
            // there is no encoding to change.
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "base" | "basefont" | "bgsound" | "link" | "meta") =>
            {
                let _ = self.insert_element_for(token);
                let _ = self.open_elements.pop();
                Step::Done
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            Token::StartTag { name, .. } if name == "title" => {
                self.parse_text_element(token);
                Step::Done
            }

            // "A start tag whose tag name is "noscript", if the scripting flag is enabled"
            // "A start tag whose tag name is one of: "noframes", "style""
            // "Follow the generic raw text element parsing algorithm."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "noframes" | "style")
                    || (name == "noscript" && self.options.scripting) =>
            {
                self.parse_text_element(token);
                Step::Done
            }

            // "A start tag whose tag name is "noscript", if the scripting flag is disabled"
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in head noscript"."
            Token::StartTag { name, .. } if name == "noscript" => {
                let _ = self.insert_element_for(token);
                self.insertion_mode = InsertionMode::InHeadNoscript;
                Step::Done
            }

            // "A start tag whose tag name is "script""
            // Insert at the adjusted insertion location, push, remember the
            // original insertion mode, switch to "text". Scripts are not run.
            Token::StartTag { name, .. } if name == "script" => {
                self.parse_text_element(token);
                Step::Done
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the
            // stack of open elements."
            // "Switch the insertion mode to "after head"."
            Token::EndTag { name } if name == "head" => {
                let _ = self.open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
                Step::Done
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.in_head_anything_else()
            }

            // "A start tag whose tag name is "template""
            Token::StartTag { name, .. } if name == "template" => {
                // "Insert an HTML element for the token."
                let _ = self.insert_element_for(token);
                // "Insert a marker at the end of the list of active formatting elements."
                self.active_formatting.insert_marker();
                // "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // "Switch the insertion mode to "in template"."
                self.insertion_mode = InsertionMode::InTemplate;
                // "Push "in template" onto the stack of template insertion modes
                // so that it is the new current template insertion mode."
                self.template_insertion_modes.push(InsertionMode::InTemplate);
                Step::Done
            }

            // "An end tag whose tag name is "template""
            Token::EndTag { name } if name == "template" => {
                // "If there is no template element on the stack of open
                // elements, then this is a parse error; ignore the token."
                if !self.open_elements.contains_tag("template") {
                    self.parse_error("</template> without an open template");
                    return Step::Done;
                }
                // "1. Generate all implied end tags thoroughly.
                //  2. If the current node is not a template element, then this
                //     is a parse error.
                //  3. Pop elements from the stack of open elements until a
                //     template element has been popped from the stack.
                //  4. Clear the list of active formatting elements up to the
                //     last marker.
                //  5. Pop the current template insertion mode off the stack of
                //     template insertion modes.
                //  6. Reset the insertion mode appropriately."
                self.generate_all_implied_end_tags_thoroughly();
                if self.open_elements.current_tag() != Some("template") {
                    self.parse_error("</template> with open descendants");
                }
                self.open_elements.pop_until_tag("template");
                self.active_formatting.clear_to_last_marker();
                let _ = self.template_insertion_modes.pop();
                self.reset_insertion_mode_appropriately();
                Step::Done
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error("nested <head>");
                Step::Done
            }
            Token::EndTag { name } => {
                self.parse_error(&format!("unexpected </{name}> in head"));
                Step::Done
            }

            // "Anything else"
            _ => self.in_head_anything_else(),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn in_head_anything_else(&mut self) -> Step {
        let _ = self.open_elements.pop();
        self.reprocess_in(InsertionMode::AfterHead)
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(crate) fn handle_in_head_noscript_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error("unexpected DOCTYPE");
                Step::Done
            }

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the
            // stack of open elements; the new current node will be a head element."
            // "Switch the insertion mode to "in head"."
            Token::EndTag { name } if name == "noscript" => {
                let _ = self.open_elements.pop();
                self.insertion_mode = InsertionMode::InHead;
                Step::Done
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound",
            // "link", "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Character { data } if is_whitespace_text(data) => self.handle_in_head_mode(token),
            Token::Comment { .. } => self.handle_in_head_mode(token),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.handle_in_head_mode(token)
            }

            // "An end tag whose tag name is "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if name == "br" => self.in_head_noscript_anything_else(),

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.parse_error(&format!("unexpected <{name}> in noscript"));
                Step::Done
            }
            Token::EndTag { name } => {
                self.parse_error(&format!("unexpected </{name}> in noscript"));
                Step::Done
            }

            // "Anything else"
            _ => self.in_head_noscript_anything_else(),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn in_head_noscript_anything_else(&mut self) -> Step {
        self.parse_error("content not allowed in <noscript> in head");
        let _ = self.open_elements.pop();
        self.reprocess_in(InsertionMode::InHead)
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(crate) fn handle_after_head_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Character { data } if is_whitespace_text(data) => {
                self.insert_characters(data);
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
                self.parse_error("unexpected DOCTYPE");
                Step::Done
            }

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "body""
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in body"."
            Token::StartTag { name, .. } if name == "body" => {
                let _ = self.insert_element_for(token);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InBody;
                Step::Done
            }

            // "A start tag whose tag name is "frameset""
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in frameset"."
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_element_for(token);
                self.insertion_mode = InsertionMode::InFrameset;
                Step::Done
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
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
                // "Parse error."
                self.parse_error(&format!("<{name}> after </head>"));
                // "Push the node pointed to by the head element pointer onto
                // the stack of open elements."
                let Some(head) = self.head_element_pointer else {
                    return self.handle_in_head_mode(token);
                };
                self.open_elements.push(head, "head");
                // "Process the token using the rules for the "in head"
                // insertion mode."
                let step = self.handle_in_head_mode(token);
                // "Remove the node pointed to by the head element pointer from
                // the stack of open elements. (It might not be the current node
                // at this point.)"
                self.open_elements.remove(head);
                step
            }

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::EndTag { name } if name == "template" => self.handle_in_head_mode(token),

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.after_head_anything_else()
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error("<head> after </head>");
                Step::Done
            }
            Token::EndTag { name } => {
                self.parse_error(&format!("unexpected </{name}> after head"));
                Step::Done
            }

            // "Anything else"
            _ => self.after_head_anything_else(),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no
    /// attributes. Switch the insertion mode to "in body". Reprocess the
    /// current token."
    fn after_head_anything_else(&mut self) -> Step {
        let _ = self.insert_implied_element("body");
        self.reprocess_in(InsertionMode::InBody)
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(crate) fn handle_text_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => {
                self.insert_characters(data);
                Step::Done
            }

            // "An end-of-file token"
            // "Parse error."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and
            // reprocess the token."
            Token::EndOfFile => {
                self.parse_error("end of file in text content");
                let _ = self.open_elements.pop();
                let original = self.take_original_insertion_mode();
                self.reprocess_in(original)
            }

            // "An end tag whose tag name is "script""
            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                let _ = self.open_elements.pop();
                self.insertion_mode = self.take_original_insertion_mode();
                Step::Done
            }

            // The tokenizer emits nothing else inside text content.
            _ => Step::Done,
        }
    }

    fn take_original_insertion_mode(&mut self) -> InsertionMode {
        self.original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody)
    }
}

#[cfg(test)]
mod tests {
    use super::quirks_mode_for_doctype;
    use canopy_dom::QuirksMode;

    #[test]
    fn test_html5_doctype_is_no_quirks() {
        assert_eq!(
            quirks_mode_for_doctype(Some("html"), None, None, false),
            QuirksMode::NoQuirks
        );
    }

    #[test]
    fn test_legacy_doctypes() {
        assert_eq!(
            quirks_mode_for_doctype(
                Some("html"),
                Some("-//W3C//DTD HTML 4.01 Transitional//EN"),
                None,
                false
            ),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for_doctype(
                Some("html"),
                Some("-//W3C//DTD HTML 4.01 Transitional//EN"),
                Some("http://www.w3.org/TR/html4/loose.dtd"),
                false
            ),
            QuirksMode::LimitedQuirks
        );
        assert_eq!(
            quirks_mode_for_doctype(Some("html"), None, None, true),
            QuirksMode::Quirks
        );
    }
}
