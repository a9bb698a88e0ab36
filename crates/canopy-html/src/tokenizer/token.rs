use std::fmt;

use canopy_dom::Attributes;

/// An attribute on a start tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
///
/// Consecutive characters travel in a single `Character` token. The tree
/// builder splits runs where whitespace and other characters are treated
/// differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag."
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes"
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes", in source order
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes on end tags are a parse error and are dropped.
    EndTag {
        /// "a tag name"
        name: String,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// A run of character data.
    Character {
        /// "data"
        data: String,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// A start tag with the given attributes.
    #[must_use]
    pub fn start_tag(name: &str, attributes: &[(&str, &str)]) -> Self {
        Self::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes: attributes
                .iter()
                .map(|&(n, v)| Attribute::new(n, v))
                .collect(),
        }
    }

    /// A self-closing start tag, e.g. `<br/>`.
    #[must_use]
    pub fn self_closing_tag(name: &str, attributes: &[(&str, &str)]) -> Self {
        match Self::start_tag(name, attributes) {
            Self::StartTag {
                name, attributes, ..
            } => Self::StartTag {
                name,
                self_closing: true,
                attributes,
            },
            other => other,
        }
    }

    /// An end tag.
    #[must_use]
    pub fn end_tag(name: &str) -> Self {
        Self::EndTag {
            name: name.to_string(),
        }
    }

    /// A run of characters.
    #[must_use]
    pub fn characters(data: &str) -> Self {
        Self::Character {
            data: data.to_string(),
        }
    }

    /// A comment.
    #[must_use]
    pub fn comment(data: &str) -> Self {
        Self::Comment {
            data: data.to_string(),
        }
    }

    /// `<!DOCTYPE html>`
    #[must_use]
    pub fn html_doctype() -> Self {
        Self::Doctype {
            name: Some("html".to_string()),
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }
    }

    /// Tag name of a start or end tag.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => Some(name),
            _ => None,
        }
    }
}

/// Convert a start tag's attribute list into element attributes.
///
/// The tokenizer already drops duplicate names; hand-built tokens may not, and
/// for those the last value wins.
#[must_use]
pub fn attributes_to_map(attributes: &[Attribute]) -> Attributes {
    attributes
        .iter()
        .map(|a| (a.name.as_str(), a.value.as_str()))
        .collect()
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                write!(f, "DOCTYPE")?;
                if let Some(n) = name {
                    write!(f, " {n}")?;
                }
                if let Some(pub_id) = public_identifier {
                    write!(f, " PUBLIC \"{pub_id}\"")?;
                }
                if let Some(sys_id) = system_identifier {
                    write!(f, " SYSTEM \"{sys_id}\"")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                Ok(())
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Character { data } => write!(f, "Character({})", data.escape_debug()),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}
