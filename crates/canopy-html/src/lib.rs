//! HTML tokenizer and tree builder for Canopy.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, script data and PLAINTEXT states
//!   - DOCTYPE, comment, and character reference handling
//!   - Attribute parsing with duplicate detection
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All insertion modes, including tables, selects, templates and framesets
//!   - Stack of open elements with scope queries
//!   - Active formatting elements and the adoption agency algorithm
//!   - Foster parenting
//!   - Form element pointer and form owner association
//!   - Quirks mode detection from the DOCTYPE
//!
//! # Not Implemented
//!
//! - Foreign content: `svg` and `math` are built as ordinary elements
//! - Fragment parsing
//! - Script execution

/// Batch drivers and tree dumping.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;
/// Tree construction.
pub mod tree_builder;

pub use parser::{HTMLParser, parse_document, parse_document_with_options, print_tree};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};
pub use tree_builder::{InsertionMode, ParserOptions, TreeBuilder};
