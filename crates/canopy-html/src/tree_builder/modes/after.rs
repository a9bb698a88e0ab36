//! Insertion modes after the body or frameset has been closed, and the
//! "in frameset" mode.

use canopy_dom::NodeId;

use super::super::{InsertionMode, Step, TreeBuilder, is_whitespace_text};
use crate::tokenizer::Token;

impl TreeBuilder {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(crate) fn handle_after_body_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { data } if is_whitespace_text(data) => self.handle_in_body_mode(token),

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self.open_elements.get(0).unwrap_or(NodeId::ROOT);
                self.append_comment(data, html);
                Step::Done
            }

            // "A DOCTYPE token"
            Token::Doctype { .. } => {
                self.parse_error("unexpected DOCTYPE after body");
                Step::Done
            }

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after body"."
            Token::EndTag { name } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterBody;
                Step::Done
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {
                self.stop_parsing();
                Step::Done
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            // reprocess the token."
            _ => {
                self.parse_error(&format!("{token} after </body>"));
                self.reprocess_in(InsertionMode::InBody)
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(crate) fn handle_in_frameset_mode(&mut self, token: &Token) -> Step {
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
                self.parse_error("unexpected DOCTYPE in frameset");
                Step::Done
            }

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "frameset""
            // "Insert an HTML element for the token."
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_element_for(token);
                Step::Done
            }

            // "An end tag whose tag name is "frameset""
            Token::EndTag { name } if name == "frameset" => {
                // "If the current node is the root html element, then this is a
                // parse error; ignore the token. (fragment case)"
                if self.open_elements.len() <= 1 {
                    self.parse_error("</frameset> without an open frameset");
                    return Step::Done;
                }
                // "Otherwise, pop the current node from the stack of open
                // elements."
                let _ = self.open_elements.pop();
                // "If the parser was not created as part of the HTML fragment
                // parsing algorithm (fragment case), and the current node is no
                // longer a frameset element, then switch the insertion mode to
                // "after frameset"."
                if self.open_elements.current_tag() != Some("frameset") {
                    self.insertion_mode = InsertionMode::AfterFrameset;
                }
                Step::Done
            }

            // "A start tag whose tag name is "frame""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            Token::StartTag { name, .. } if name == "frame" => {
                let _ = self.insert_element_for(token);
                let _ = self.open_elements.pop();
                Step::Done
            }

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a
            // parse error." "Stop parsing."
            Token::EndOfFile => {
                if self.open_elements.len() > 1 {
                    self.parse_error("end of file in frameset");
                }
                self.stop_parsing();
                Step::Done
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => {
                self.parse_error(&format!("{token} is not allowed in a frameset"));
                Step::Done
            }
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(crate) fn handle_after_frameset_mode(&mut self, token: &Token) -> Step {
        match token {
            Token::Character { data } if is_whitespace_text(data) => {
                self.insert_characters(data);
                Step::Done
            }
            Token::Comment { data } => {
                self.insert_comment(data);
                Step::Done
            }
            Token::Doctype { .. } => {
                self.parse_error("unexpected DOCTYPE after frameset");
                Step::Done
            }
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            Token::EndTag { name } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterFrameset;
                Step::Done
            }

            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),
            Token::EndOfFile => {
                self.stop_parsing();
                Step::Done
            }
            _ => {
                self.parse_error(&format!("{token} after </frameset>"));
                Step::Done
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(crate) fn handle_after_after_body_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.append_comment(data, NodeId::ROOT);
                Step::Done
            }

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data } if is_whitespace_text(data) => self.handle_in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            Token::EndOfFile => {
                self.stop_parsing();
                Step::Done
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            // reprocess the token."
            _ => {
                self.parse_error(&format!("{token} after </html>"));
                self.reprocess_in(InsertionMode::InBody)
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(crate) fn handle_after_after_frameset_mode(&mut self, token: &Token) -> Step {
        match token {
            Token::Comment { data } => {
                self.append_comment(data, NodeId::ROOT);
                Step::Done
            }
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data } if is_whitespace_text(data) => self.handle_in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::EndOfFile => {
                self.stop_parsing();
                Step::Done
            }
            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),
            _ => {
                self.parse_error(&format!("{token} after </html>"));
                Step::Done
            }
        }
    }
}
