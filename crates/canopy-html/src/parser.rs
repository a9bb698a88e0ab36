//! Batch drivers over the tokenizer and tree builder.

use canopy_common::diagnostics::{Diagnostic, DiagnosticSink};
use canopy_dom::{DomTree, NodeId, NodeType};

use crate::tokenizer::{HTMLTokenizer, Token};
use crate::tree_builder::{ParserOptions, TreeBuilder};

/// Builds a document from an already tokenized input.
pub struct HTMLParser {
    tokens: Vec<Token>,
    builder: TreeBuilder,
}

impl HTMLParser {
    /// Create a parser over `tokens` with default options.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_options(tokens, ParserOptions::default())
    }

    /// Create a parser over `tokens` with explicit options.
    #[must_use]
    pub fn with_options(tokens: Vec<Token>, options: ParserOptions) -> Self {
        Self {
            tokens,
            builder: TreeBuilder::with_options(options),
        }
    }

    /// Forward every diagnostic to `sink` as it is raised.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.builder = self.builder.with_diagnostics(sink);
        self
    }

    /// Feed every token, then end-of-file, and return the document.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Like [`run`](Self::run), also returning the tree builder's diagnostics.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<Diagnostic>) {
        for token in self.tokens {
            self.builder.process_token(token);
        }
        self.builder.finish_with_issues()
    }
}

/// Tokenize and parse `html` with default options.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    parse_document_with_options(html, ParserOptions::default()).0
}

/// Tokenize and parse `html`, returning tokenizer and tree builder
/// diagnostics together, in the order they were raised per stage.
#[must_use]
pub fn parse_document_with_options(html: &str, options: ParserOptions) -> (DomTree, Vec<Diagnostic>) {
    let mut tokenizer = HTMLTokenizer::new(html.to_string()).with_scripting(options.scripting);
    tokenizer.run();
    let tokenizer_issues = tokenizer.issues().to_vec();

    let mut builder = TreeBuilder::with_options(options);
    for issue in tokenizer_issues {
        builder.report_external(issue);
    }
    for token in tokenizer.into_tokens() {
        builder.process_token(token);
    }
    builder.finish_with_issues()
}

/// Print the subtree rooted at `id`, one node per line.
///
/// Text is shown with `\n` for line feeds and `·` for spaces so whitespace
/// nodes are visible.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => {
            println!("{prefix}Document ({:?})", tree.quirks_mode());
            if let Some(doctype) = tree.doctype() {
                println!("{prefix}  <!DOCTYPE {}>", doctype.name);
            }
        }
        NodeType::Element(data) => {
            if data.attrs.is_empty() {
                println!("{prefix}<{}>", data.tag_name);
            } else {
                let attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.to_string()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                println!("{prefix}<{} {}>", data.tag_name, attrs.join(" "));
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            println!("{prefix}\"{display}\"");
        }
        NodeType::Comment(data) => {
            println!("{prefix}<!-- {data} -->");
        }
    }
    for &child_id in tree.children(id) {
        print_tree(tree, child_id, indent + 1);
    }
}
