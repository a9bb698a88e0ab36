//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! "The input to the tree construction stage is a sequence of tokens from the
//! tokenization stage. The tree construction stage is associated with a DOM
//! Document object when a parser is created. The "output" of this stage
//! consists of dynamically modifying or extending that document's DOM tree."
//!
//! [`TreeBuilder`] accepts tokens one at a time. Each token is dispatched to
//! the handler of the current insertion mode; a handler that asks for the
//! token to be reprocessed returns [`Step::Reprocess`] and the dispatcher loops
//! instead of recursing.

mod adoption;
mod algorithms;
/// The list of active formatting elements.
pub mod formatting;
mod forms;
mod insertion;
mod insertion_mode;
mod modes;
/// The stack of open elements and scope queries.
pub mod open_elements;

pub use insertion_mode::InsertionMode;

use std::collections::HashMap;

use canopy_common::diagnostics::{Diagnostic, DiagnosticSink};
use canopy_common::warning::warn_once;
use canopy_dom::{DomTree, NodeId};

use crate::tokenizer::Token;
use formatting::ActiveFormattingList;
use open_elements::OpenElements;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// [§ 13.2.2 The scripting flag](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for the
    /// Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise."
    ///
    /// Decides whether `<noscript>` content is raw text. On by default, as in
    /// a browser.
    pub scripting: bool,
    /// Echo every diagnostic to stderr as it is raised.
    pub strict: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            scripting: true,
            strict: false,
        }
    }
}

/// What the dispatcher does after a mode handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The token has been consumed.
    Done,
    /// "Reprocess the token" in the (possibly new) current insertion mode.
    Reprocess,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Builds a DOM tree from tokens delivered one call at a time.
#[allow(clippy::struct_excessive_bools)]
pub struct TreeBuilder {
    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// "When the insertion mode is switched to "text" or "in table text", the
    /// original insertion mode is also set."
    original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    ///
    /// "The stack of template insertion modes"
    template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    open_elements: OpenElements,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    active_formatting: ActiveFormattingList,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#head-element-pointer)
    head_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#form-element-pointer)
    ///
    /// "The form element pointer points to the last form element that was
    /// opened and whose end tag has not yet been seen."
    ///
    /// Never owning. The form may sit anywhere in the tree, or (after a
    /// frameset replaced the body) outside it, in which case it is cleared.
    form_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// "The frameset-ok flag is set to "ok" when the parser is created. It is
    /// set to "not ok" after certain tokens are seen."
    frameset_ok: bool,

    /// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    foster_parenting: bool,

    /// "If the next token is a U+000A LINE FEED (LF) character token, then
    /// ignore that token and move on to the next one. (Newlines at the start
    /// of pre blocks are ignored as an authoring convenience.)"
    ignore_next_line_feed: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    ///
    /// "the pending table character tokens"
    pending_table_text: Vec<String>,

    options: ParserOptions,

    /// DOM tree. `NodeId::ROOT` is the Document node.
    tree: DomTree,

    /// Index of the token being processed.
    token_index: usize,

    /// Set once the end-of-file token has been handled.
    finished: bool,

    /// Elements created with each `id`, in creation order. Resolves `form`
    /// attributes without walking the tree.
    elements_by_id: HashMap<String, Vec<NodeId>>,

    issues: Vec<Diagnostic>,
    sink: Option<Box<dyn DiagnosticSink>>,
}

impl TreeBuilder {
    /// A tree builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    /// A tree builder with the given options.
    #[must_use]
    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            open_elements: OpenElements::new(),
            active_formatting: ActiveFormattingList::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            frameset_ok: true,
            foster_parenting: false,
            ignore_next_line_feed: false,
            pending_table_text: Vec::new(),
            options,
            tree: DomTree::new(),
            token_index: 0,
            finished: false,
            elements_by_id: HashMap::new(),
            issues: Vec::new(),
            sink: None,
        }
    }

    /// Forward every diagnostic to `sink` as it is raised.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// The options this builder was created with.
    #[must_use]
    pub const fn options(&self) -> ParserOptions {
        self.options
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// Whether the end-of-file token has been processed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// The tree built so far. Valid between any two tokens.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The stack of open elements.
    #[must_use]
    pub const fn open_elements(&self) -> &OpenElements {
        &self.open_elements
    }

    /// The form element pointer.
    #[must_use]
    pub const fn form_element_pointer(&self) -> Option<NodeId> {
        self.form_element_pointer
    }

    /// The frameset-ok flag.
    #[must_use]
    pub const fn frameset_ok(&self) -> bool {
        self.frameset_ok
    }

    /// All diagnostics raised so far.
    #[must_use]
    pub fn get_issues(&self) -> &[Diagnostic] {
        &self.issues
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must follow
    /// the appropriate steps from the following list"
    ///
    /// Tokens arriving after end-of-file are ignored.
    pub fn process_token(&mut self, token: Token) {
        if self.finished {
            return;
        }

        let token = if std::mem::take(&mut self.ignore_next_line_feed) {
            match token {
                Token::Character { data } => match data.strip_prefix('\n') {
                    Some("") => {
                        self.token_index += 1;
                        return;
                    }
                    Some(rest) => Token::Character {
                        data: rest.to_string(),
                    },
                    None => Token::Character { data },
                },
                other => other,
            }
        } else {
            token
        };

        // Every mode decides character handling on whether a character is
        // whitespace, so a run of characters of one class is handled as a
        // unit. Mixed runs are split.
        match &token {
            Token::Character { data } => {
                for run in split_whitespace_runs(data) {
                    self.dispatch(&Token::Character {
                        data: run.to_string(),
                    });
                }
            }
            _ => self.dispatch(&token),
        }
        self.token_index += 1;
    }

    /// Process `EndOfFile` if it has not been seen and return the tree.
    #[must_use]
    pub fn finish(self) -> DomTree {
        self.finish_with_issues().0
    }

    /// Like [`finish`](Self::finish), also returning the diagnostics.
    #[must_use]
    pub fn finish_with_issues(mut self) -> (DomTree, Vec<Diagnostic>) {
        if !self.finished {
            self.process_token(Token::EndOfFile);
        }
        (self.tree, self.issues)
    }

    fn dispatch(&mut self, token: &Token) {
        while self.process_in_mode(self.insertion_mode, token) == Step::Reprocess {}
    }

    /// Apply the rules of `mode` to `token`. Used both by the dispatcher and
    /// by handlers that "process the token using the rules for" another mode.
    pub(crate) fn process_in_mode(&mut self, mode: InsertionMode, token: &Token) -> Step {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// Switch the insertion mode and ask for the token to be reprocessed.
    pub(crate) const fn reprocess_in(&mut self, mode: InsertionMode) -> Step {
        self.insertion_mode = mode;
        Step::Reprocess
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if self.options.strict {
            let _ = warn_once(
                "HTML Parser",
                &format!("{}: {}", diagnostic.severity, diagnostic.message),
            );
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.report(&diagnostic);
        }
        self.issues.push(diagnostic);
    }

    /// Record a parse error. Parse errors never change control flow.
    pub(crate) fn parse_error(&mut self, message: &str) {
        let diagnostic = Diagnostic::error(
            format!("{message} (in {})", self.insertion_mode),
            self.token_index,
        );
        self.report(diagnostic);
    }

    /// Record a warning for input handled by a documented simplification.
    pub(crate) fn parse_warning(&mut self, message: &str) {
        let diagnostic = Diagnostic::warning(message, self.token_index);
        self.report(diagnostic);
    }

    /// Forward tokenizer diagnostics, which carry their own token index.
    pub(crate) fn report_external(&mut self, diagnostic: Diagnostic) {
        self.report(diagnostic);
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// "U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF), U+000C FORM FEED (FF),
/// U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
pub(crate) const fn is_html_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// Whether a character run consists only of HTML whitespace.
pub(crate) fn is_whitespace_text(data: &str) -> bool {
    data.chars().all(is_html_whitespace)
}

/// Split text into maximal runs that are either all whitespace or contain no
/// whitespace.
fn split_whitespace_runs(data: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current_class = None;
    for (index, c) in data.char_indices() {
        let class = is_html_whitespace(c);
        if current_class.is_some_and(|k| k != class) {
            runs.push(&data[start..index]);
            start = index;
        }
        current_class = Some(class);
    }
    if start < data.len() {
        runs.push(&data[start..]);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::split_whitespace_runs;

    #[test]
    fn test_split_whitespace_runs() {
        assert_eq!(
            split_whitespace_runs("  ab c\n"),
            vec!["  ", "ab", " ", "c", "\n"]
        );
        assert_eq!(split_whitespace_runs("x"), vec!["x"]);
        assert!(split_whitespace_runs("").is_empty());
    }
}
