use canopy_common::diagnostics::Diagnostic;
use strum_macros::Display;

use super::character_reference::consume_character_reference;
use super::token::{Attribute, Token};

/// Which DOCTYPE identifier is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IdentifierKind {
    /// The public identifier.
    Public,
    /// The system identifier.
    System,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. RCDATA, RAWTEXT and script data share their
/// end-tag detection, which happens by lookahead in the content states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RCDATA,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RAWTEXT,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    PLAINTEXT,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    DOCTYPE,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDOCTYPEName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DOCTYPEName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDOCTYPEName,
    /// Before a public or system identifier (§ 13.2.5.58 / § 13.2.5.64).
    BeforeDOCTYPEIdentifier(IdentifierKind),
    /// Inside a quoted identifier (§ 13.2.5.59 / 60 / 65 / 66).
    DOCTYPEIdentifierQuoted(IdentifierKind, char),
    /// After an identifier (§ 13.2.5.61 / § 13.2.5.67).
    AfterDOCTYPEIdentifier(IdentifierKind),
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    BogusDOCTYPE,
}

/// The tag token under construction.
#[derive(Debug, Default)]
struct TagBuilder {
    name: String,
    is_end: bool,
    self_closing: bool,
    attributes: Vec<Attribute>,
    current_attribute: Option<Attribute>,
}

/// The DOCTYPE token under construction.
#[derive(Debug, Default)]
struct DoctypeBuilder {
    name: Option<String>,
    public_identifier: Option<String>,
    system_identifier: Option<String>,
    force_quirks: bool,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// The tokenizer runs ahead of the tree builder, so it switches itself into
/// the RCDATA, RAWTEXT, script data and PLAINTEXT states after emitting the
/// start tags whose tree construction rules would request it.
pub struct HTMLTokenizer {
    state: TokenizerState,
    input: String,
    current_pos: usize,
    current_input_character: Option<char>,
    // "Reconsume in the X state" sets this flag.
    reconsume: bool,
    at_eof: bool,
    current_tag: Option<TagBuilder>,
    current_comment: String,
    current_doctype: DoctypeBuilder,
    pending_text: String,
    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    last_start_tag_name: Option<String>,
    scripting: bool,
    token_stream: Vec<Token>,
    issues: Vec<Diagnostic>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// "The initial state is the data state."
    #[must_use]
    pub fn new(input: String) -> Self {
        // [§ 13.2.3.5 Preprocessing the input stream]
        // "normalize newlines"
        let input = input.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            state: TokenizerState::Data,
            input,
            current_pos: 0,
            current_input_character: None,
            reconsume: false,
            at_eof: false,
            current_tag: None,
            current_comment: String::new(),
            current_doctype: DoctypeBuilder::default(),
            pending_text: String::new(),
            last_start_tag_name: None,
            scripting: true,
            token_stream: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Set the scripting flag, which decides whether `<noscript>` content is
    /// raw text. Must match the tree builder's flag.
    #[must_use]
    pub const fn with_scripting(mut self, scripting: bool) -> Self {
        self.scripting = scripting;
        self
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after [`run`](Self::run) to get the tokens for the parser.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Tokenizer parse errors seen so far.
    #[must_use]
    pub fn issues(&self) -> &[Diagnostic] {
        &self.issues
    }

    /// Current state, for debugging output.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Run the tokenizer to completion.
    ///
    /// The token stream always ends with exactly one [`Token::EndOfFile`].
    pub fn run(&mut self) {
        while !self.at_eof {
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_input_character = self.consume();
            }
            self.step();
        }
    }

    fn step(&mut self) {
        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::RCDATA | TokenizerState::RAWTEXT | TokenizerState::ScriptData => {
                self.handle_text_content_state();
            }
            TokenizerState::PLAINTEXT => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => self.handle_quoted_value_state('"'),
            TokenizerState::AttributeValueSingleQuoted => self.handle_quoted_value_state('\''),
            TokenizerState::AttributeValueUnquoted => self.handle_unquoted_value_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::MarkupDeclarationOpen => self.handle_markup_declaration_open_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::DOCTYPE => self.handle_doctype_state(),
            TokenizerState::BeforeDOCTYPEName => self.handle_before_doctype_name_state(),
            TokenizerState::DOCTYPEName => self.handle_doctype_name_state(),
            TokenizerState::AfterDOCTYPEName => self.handle_after_doctype_name_state(),
            TokenizerState::BeforeDOCTYPEIdentifier(kind) => {
                self.handle_before_doctype_identifier_state(kind);
            }
            TokenizerState::DOCTYPEIdentifierQuoted(kind, quote) => {
                self.handle_doctype_identifier_quoted_state(kind, quote);
            }
            TokenizerState::AfterDOCTYPEIdentifier(kind) => {
                self.handle_after_doctype_identifier_state(kind);
            }
            TokenizerState::BogusDOCTYPE => self.handle_bogus_doctype_state(),
        }
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    /// "Consume the next input character"
    fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Input starting at the current input character.
    fn remaining_from_current(&self) -> &str {
        let start = self
            .current_input_character
            .map_or(self.current_pos, |c| self.current_pos - c.len_utf8());
        &self.input[start..]
    }

    /// "If the next few characters are an ASCII case-insensitive match for..."
    ///
    /// Checks the input after the current character and consumes the match.
    fn consume_if_next_is(&mut self, target: &str, case_insensitive: bool) -> bool {
        let rest = &self.input[self.current_pos..];
        let matched = rest.len() >= target.len()
            && rest.is_char_boundary(target.len())
            && if case_insensitive {
                rest[..target.len()].eq_ignore_ascii_case(target)
            } else {
                rest.starts_with(target)
            };
        if matched {
            self.current_pos += target.len();
        }
        matched
    }

    const fn switch_to(&mut self, state: TokenizerState) {
        self.state = state;
    }

    const fn reconsume_in(&mut self, state: TokenizerState) {
        self.reconsume = true;
        self.state = state;
    }

    fn parse_error(&mut self, message: &str) {
        let index = self.token_stream.len();
        self.issues.push(Diagnostic::error(message, index));
    }

    const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | ' ')
    }

    // =========================================================================
    // Emission
    // =========================================================================

    fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let data = std::mem::take(&mut self.pending_text);
            self.token_stream.push(Token::Character { data });
        }
    }

    fn emit(&mut self, token: Token) {
        self.flush_text();
        self.token_stream.push(token);
    }

    fn emit_eof(&mut self) {
        self.emit(Token::EndOfFile);
        self.at_eof = true;
    }

    fn finish_attribute(&mut self) {
        let Some(tag) = self.current_tag.as_mut() else {
            return;
        };
        let Some(attribute) = tag.current_attribute.take() else {
            return;
        };
        // "When the user agent leaves the attribute name state... if there is
        // already an attribute on the token with the exact same name, then this
        // is a duplicate-attribute parse error and the new attribute must be
        // removed from the token."
        if tag.attributes.iter().any(|a| a.name == attribute.name) {
            self.parse_error("duplicate-attribute");
        } else {
            tag.attributes.push(attribute);
        }
    }

    fn start_attribute(&mut self) {
        self.finish_attribute();
        if let Some(tag) = self.current_tag.as_mut() {
            tag.current_attribute = Some(Attribute::new("", ""));
        }
    }

    fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attr) = self
            .current_tag
            .as_mut()
            .and_then(|t| t.current_attribute.as_mut())
        {
            attr.name.push(c);
        }
    }

    fn append_to_attribute_value(&mut self, s: &str) {
        if let Some(attr) = self
            .current_tag
            .as_mut()
            .and_then(|t| t.current_attribute.as_mut())
        {
            attr.value.push_str(s);
        }
    }

    fn append_to_tag_name(&mut self, c: char) {
        if let Some(tag) = self.current_tag.as_mut() {
            tag.name.push(c);
        }
    }

    /// "Emit the current tag token."
    fn emit_current_tag(&mut self) {
        self.finish_attribute();
        let Some(tag) = self.current_tag.take() else {
            return;
        };
        if tag.is_end {
            if !tag.attributes.is_empty() {
                self.parse_error("end-tag-with-attributes");
            }
            if tag.self_closing {
                self.parse_error("end-tag-with-trailing-solidus");
            }
            self.emit(Token::EndTag { name: tag.name });
            self.switch_to(TokenizerState::Data);
            return;
        }

        // [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
        //
        // The tree builder would "switch the tokenizer to the RCDATA/RAWTEXT
        // state"; running ahead, the tokenizer makes that switch here.
        let next_state = match tag.name.as_str() {
            "title" | "textarea" => TokenizerState::RCDATA,
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => TokenizerState::RAWTEXT,
            "noscript" if self.scripting => TokenizerState::RAWTEXT,
            "script" => TokenizerState::ScriptData,
            "plaintext" => TokenizerState::PLAINTEXT,
            _ => TokenizerState::Data,
        };
        self.last_start_tag_name = Some(tag.name.clone());
        self.emit(Token::StartTag {
            name: tag.name,
            self_closing: tag.self_closing,
            attributes: tag.attributes,
        });
        self.switch_to(next_state);
    }

    fn emit_current_comment(&mut self) {
        let data = std::mem::take(&mut self.current_comment);
        self.emit(Token::Comment { data });
    }

    fn emit_current_doctype(&mut self) {
        let doctype = std::mem::take(&mut self.current_doctype);
        self.emit(Token::Doctype {
            name: doctype.name,
            public_identifier: doctype.public_identifier,
            system_identifier: doctype.system_identifier,
            force_quirks: doctype.force_quirks,
        });
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// Called with the `&` as current character. Returns the text to append.
    fn consume_character_reference(&mut self, in_attribute: bool) -> String {
        let rest = &self.input[self.current_pos..];
        match consume_character_reference(rest, in_attribute) {
            Some(reference) => {
                self.current_pos += reference.consumed;
                if let Some(error) = reference.error {
                    self.parse_error(error);
                }
                reference.replacement
            }
            None => "&".to_string(),
        }
    }

    // =========================================================================
    // Content states
    // =========================================================================

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            Some('&') => {
                let text = self.consume_character_reference(false);
                self.pending_text.push_str(&text);
            }
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.pending_text.push('\0');
            }
            None => self.emit_eof(),
            Some(c) => self.pending_text.push(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state),
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state),
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    fn handle_text_content_state(&mut self) {
        match self.current_input_character {
            Some('&') if self.state == TokenizerState::RCDATA => {
                let text = self.consume_character_reference(false);
                self.pending_text.push_str(&text);
            }
            Some('<') if self.at_appropriate_end_tag() => {
                // "An appropriate end tag token is an end tag token whose tag
                // name matches the tag name of the last start tag to have been
                // emitted from this tokenizer"
                let name = self.last_start_tag_name.clone().unwrap_or_default();
                self.current_pos += 1 + name.len();
                self.current_tag = Some(TagBuilder {
                    name,
                    is_end: true,
                    ..TagBuilder::default()
                });
                self.switch_to(TokenizerState::TagName);
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.pending_text.push('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(c) => self.pending_text.push(c),
        }
    }

    /// Lookahead for `</name` followed by whitespace, `/` or `>`.
    fn at_appropriate_end_tag(&self) -> bool {
        let Some(name) = self.last_start_tag_name.as_deref() else {
            return false;
        };
        let rest = &self.input[self.current_pos..];
        let Some(after_solidus) = rest.strip_prefix('/') else {
            return false;
        };
        if after_solidus.len() < name.len()
            || !after_solidus.is_char_boundary(name.len())
            || !after_solidus[..name.len()].eq_ignore_ascii_case(name)
        {
            return false;
        }
        matches!(
            after_solidus[name.len()..].chars().next(),
            Some('\t' | '\n' | '\x0C' | ' ' | '/' | '>')
        )
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    fn handle_plaintext_state(&mut self) {
        match self.current_input_character {
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.pending_text.push('\u{FFFD}');
            }
            None => self.emit_eof(),
            Some(c) => self.pending_text.push(c),
        }
    }

    // =========================================================================
    // Tag states
    // =========================================================================

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = Some(TagBuilder::default());
                self.reconsume_in(TokenizerState::TagName);
            }
            Some('?') => {
                self.parse_error("unexpected-question-mark-instead-of-tag-name");
                self.current_comment.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
            None => {
                self.parse_error("eof-before-tag-name");
                self.pending_text.push('<');
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error("invalid-first-character-of-tag-name");
                self.pending_text.push('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = Some(TagBuilder {
                    is_end: true,
                    ..TagBuilder::default()
                });
                self.reconsume_in(TokenizerState::TagName);
            }
            Some('>') => {
                self.parse_error("missing-end-tag-name");
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error("eof-before-tag-name");
                self.pending_text.push_str("</");
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error("invalid-first-character-of-tag-name");
                self.current_comment.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_tag_name('\u{FFFD}');
            }
            None => {
                self.parse_error("eof-in-tag");
                self.emit_eof();
            }
            Some(c) => self.append_to_tag_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => {
                self.parse_error("unexpected-equals-sign-before-attribute-name");
                self.start_attribute();
                self.append_to_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_attribute_name('\u{FFFD}');
            }
            Some(c) => {
                if matches!(c, '"' | '\'' | '<') {
                    self.parse_error("unexpected-character-in-attribute-name");
                }
                self.append_to_attribute_name(c.to_ascii_lowercase());
            }
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => self.emit_current_tag(),
            None => {
                self.parse_error("eof-in-tag");
                self.emit_eof();
            }
            Some(_) => {
                self.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            Some('>') => {
                self.parse_error("missing-attribute-value");
                self.emit_current_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_quoted_value_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => {
                let text = self.consume_character_reference(true);
                self.append_to_attribute_value(&text);
            }
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_attribute_value("\u{FFFD}");
            }
            None => {
                self.parse_error("eof-in-tag");
                self.emit_eof();
            }
            Some(c) => {
                let mut buf = [0u8; 4];
                self.append_to_attribute_value(c.encode_utf8(&mut buf));
            }
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_unquoted_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('&') => {
                let text = self.consume_character_reference(true);
                self.append_to_attribute_value(&text);
            }
            Some('>') => self.emit_current_tag(),
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.append_to_attribute_value("\u{FFFD}");
            }
            None => {
                self.parse_error("eof-in-tag");
                self.emit_eof();
            }
            Some(c) => {
                if matches!(c, '"' | '\'' | '<' | '=' | '`') {
                    self.parse_error("unexpected-character-in-unquoted-attribute-value");
                }
                let mut buf = [0u8; 4];
                self.append_to_attribute_value(c.encode_utf8(&mut buf));
            }
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            None => {
                self.parse_error("eof-in-tag");
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error("missing-whitespace-between-attributes");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.self_closing = true;
                }
                self.emit_current_tag();
            }
            None => {
                self.parse_error("eof-in-tag");
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error("unexpected-solidus-in-tag");
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    // =========================================================================
    // Comment states
    // =========================================================================

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.emit_current_comment();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.emit_current_comment();
                self.emit_eof();
            }
            Some('\0') => self.current_comment.push('\u{FFFD}'),
            Some(c) => self.current_comment.push(c),
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Entered after `<!`; the current character is the one after the `!`.
    fn handle_markup_declaration_open_state(&mut self) {
        // Step back so the lookahead includes the current character.
        if let Some(c) = self.current_input_character {
            self.current_pos -= c.len_utf8();
        }
        self.current_comment.clear();
        if self.consume_if_next_is("--", false) {
            self.switch_to(TokenizerState::CommentStart);
        } else if self.consume_if_next_is("DOCTYPE", true) {
            self.switch_to(TokenizerState::DOCTYPE);
        } else if self.consume_if_next_is("[CDATA[", false) {
            // Not in foreign content: "cdata-in-html-content parse error.
            // Create a comment token whose data is the "[CDATA[" string."
            self.parse_error("cdata-in-html-content");
            self.current_comment.push_str("[CDATA[");
            self.switch_to(TokenizerState::BogusComment);
        } else {
            self.parse_error("incorrectly-opened-comment");
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            Some('>') => {
                self.parse_error("abrupt-closing-of-empty-comment");
                self.emit_current_comment();
                self.switch_to(TokenizerState::Data);
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.parse_error("abrupt-closing-of-empty-comment");
                self.emit_current_comment();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error("eof-in-comment");
                self.emit_current_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.current_comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.parse_error("unexpected-null-character");
                self.current_comment.push('\u{FFFD}');
            }
            None => {
                self.parse_error("eof-in-comment");
                self.emit_current_comment();
                self.emit_eof();
            }
            Some(c) => self.current_comment.push(c),
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => {
                self.parse_error("eof-in-comment");
                self.emit_current_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.current_comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.emit_current_comment();
                self.switch_to(TokenizerState::Data);
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.current_comment.push('-'),
            None => {
                self.parse_error("eof-in-comment");
                self.emit_current_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.current_comment.push_str("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.current_comment.push_str("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            Some('>') => {
                self.parse_error("incorrectly-closed-comment");
                self.emit_current_comment();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error("eof-in-comment");
                self.emit_current_comment();
                self.emit_eof();
            }
            Some(_) => {
                self.current_comment.push_str("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    // =========================================================================
    // DOCTYPE states
    // =========================================================================

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self) {
        self.current_doctype = DoctypeBuilder::default();
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            None => {
                self.parse_error("eof-in-doctype");
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error("missing-whitespace-before-doctype-name");
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {}
            Some('>') => {
                self.parse_error("missing-doctype-name");
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error("eof-in-doctype");
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
                self.emit_eof();
            }
            Some(c) => {
                let c = if c == '\0' { '\u{FFFD}' } else { c.to_ascii_lowercase() };
                self.current_doctype.name = Some(c.to_string());
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => self.switch_to(TokenizerState::AfterDOCTYPEName),
            Some('>') => {
                self.emit_current_doctype();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error("eof-in-doctype");
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
                self.emit_eof();
            }
            Some(c) => {
                let c = if c == '\0' { '\u{FFFD}' } else { c.to_ascii_lowercase() };
                self.current_doctype.name.get_or_insert_with(String::new).push(c);
            }
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {}
            Some('>') => {
                self.emit_current_doctype();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error("eof-in-doctype");
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
                self.emit_eof();
            }
            Some(_) => {
                // "If the six characters starting from the current input
                // character are an ASCII case-insensitive match for the word
                // "PUBLIC"..." / "SYSTEM"
                let keyword = self.remaining_from_current().get(..6).map(str::to_ascii_uppercase);
                let kind = match keyword.as_deref() {
                    Some("PUBLIC") => Some(IdentifierKind::Public),
                    Some("SYSTEM") => Some(IdentifierKind::System),
                    _ => None,
                };
                if let Some(kind) = kind {
                    self.current_pos += 5;
                    self.switch_to(TokenizerState::BeforeDOCTYPEIdentifier(kind));
                } else {
                    self.parse_error("invalid-character-sequence-after-doctype-name");
                    self.current_doctype.force_quirks = true;
                    self.reconsume_in(TokenizerState::BogusDOCTYPE);
                }
            }
        }
    }

    /// After the PUBLIC or SYSTEM keyword, up to the opening quote.
    fn handle_before_doctype_identifier_state(&mut self, kind: IdentifierKind) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {}
            Some(quote @ ('"' | '\'')) => {
                self.set_doctype_identifier(kind, String::new());
                self.switch_to(TokenizerState::DOCTYPEIdentifierQuoted(kind, quote));
            }
            Some('>') => {
                self.parse_error("missing-doctype-identifier");
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error("eof-in-doctype");
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error("missing-quote-before-doctype-identifier");
                self.current_doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    fn set_doctype_identifier(&mut self, kind: IdentifierKind, value: String) {
        match kind {
            IdentifierKind::Public => self.current_doctype.public_identifier = Some(value),
            IdentifierKind::System => self.current_doctype.system_identifier = Some(value),
        }
    }

    fn handle_doctype_identifier_quoted_state(&mut self, kind: IdentifierKind, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterDOCTYPEIdentifier(kind)),
            Some('>') => {
                self.parse_error("abrupt-doctype-identifier");
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error("eof-in-doctype");
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
                self.emit_eof();
            }
            Some(c) => {
                let c = if c == '\0' { '\u{FFFD}' } else { c };
                let slot = match kind {
                    IdentifierKind::Public => &mut self.current_doctype.public_identifier,
                    IdentifierKind::System => &mut self.current_doctype.system_identifier,
                };
                slot.get_or_insert_with(String::new).push(c);
            }
        }
    }

    fn handle_after_doctype_identifier_state(&mut self, kind: IdentifierKind) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace(c) => {}
            Some('>') => {
                self.emit_current_doctype();
                self.switch_to(TokenizerState::Data);
            }
            // "Between DOCTYPE public and system identifiers": a quote starts
            // the system identifier.
            Some(quote @ ('"' | '\'')) if kind == IdentifierKind::Public => {
                self.set_doctype_identifier(IdentifierKind::System, String::new());
                self.switch_to(TokenizerState::DOCTYPEIdentifierQuoted(
                    IdentifierKind::System,
                    quote,
                ));
            }
            None => {
                self.parse_error("eof-in-doctype");
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
                self.emit_eof();
            }
            Some(_) => {
                self.parse_error("unexpected-character-after-doctype-identifier");
                if kind == IdentifierKind::Public {
                    self.current_doctype.force_quirks = true;
                }
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.emit_current_doctype();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.emit_current_doctype();
                self.emit_eof();
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HTMLTokenizer, TokenizerState};
    use crate::tokenizer::Token;

    fn tokenize(html: &str) -> Vec<Token> {
        let mut tokenizer = HTMLTokenizer::new(html.to_string());
        tokenizer.run();
        tokenizer.into_tokens()
    }

    #[test]
    fn test_title_switches_to_rcdata() {
        let tokens = tokenize("<title>a <b> &amp; c</title>x");
        assert_eq!(
            tokens,
            vec![
                Token::start_tag("title", &[]),
                Token::characters("a <b> & c"),
                Token::end_tag("title"),
                Token::characters("x"),
                Token::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_script_end_tag_needs_matching_name() {
        let tokens = tokenize("<script>if (a</b) {}</SCRIPT >");
        assert_eq!(tokens[1], Token::characters("if (a</b) {}"));
        assert_eq!(tokens[2], Token::end_tag("script"));
    }

    #[test]
    fn test_state_returns_to_data_after_end_tag() {
        let mut tokenizer = HTMLTokenizer::new("<style>p{}</style>".to_string());
        tokenizer.run();
        assert_eq!(tokenizer.state(), TokenizerState::Data);
    }
}
