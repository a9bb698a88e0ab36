//! Canopy CLI
//!
//! Parses a document and prints the resulting tree, its serialization, the
//! token stream or the diagnostics raised while building it.

use anyhow::Result;
use canopy_common::diagnostics::{Diagnostic, Severity};
use canopy_common::source::read_document;
use canopy_dom::serialize::serialize_document;
use canopy_dom::{DomTree, NodeId, NodeType};
use canopy_html::{HTMLTokenizer, ParserOptions, parse_document_with_options, print_tree};
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};

/// Canopy: build a browser-compatible DOM from HTML
#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the DOM tree of a file
    canopy ./index.html

    # Parse inline HTML and print its serialization
    canopy --serialize --html '<table><div>x</div></table>'

    # Dump the tree as JSON
    canopy --json ./index.html

    # Show every recovery the parser performed
    canopy --issues --html '<b><i>x</b></i>'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<String>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print the tree as JSON
    #[arg(long)]
    json: bool,

    /// Print the token stream instead of the tree
    #[arg(long)]
    tokens: bool,

    /// Print diagnostics after the output (included in the JSON with --json)
    #[arg(long)]
    issues: bool,

    /// Parse as if scripting were disabled (affects <noscript>)
    #[arg(long)]
    no_scripting: bool,

    /// Echo every diagnostic to stderr as it is raised
    #[arg(long)]
    strict: bool,

    /// Print the serialized document instead of the tree
    #[arg(long)]
    serialize: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let html = load_source(&cli)?;
    let options = ParserOptions {
        scripting: !cli.no_scripting,
        strict: cli.strict,
    };

    if cli.tokens {
        let mut tokenizer = HTMLTokenizer::new(html).with_scripting(options.scripting);
        tokenizer.run();
        for token in tokenizer.into_tokens() {
            println!("{token}");
        }
        return Ok(());
    }

    let (tree, issues) = parse_document_with_options(&html, options);

    if cli.json {
        let mut output = document_to_json(&tree)?;
        if cli.issues
            && let Some(map) = output.as_object_mut()
        {
            let _ = map.insert("issues".to_string(), serde_json::to_value(&issues)?);
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if cli.serialize {
        println!("{}", serialize_document(&tree));
    } else {
        println!("=== DOM Tree ===");
        print_tree(&tree, tree.root(), 0);
    }

    if cli.issues {
        print_issues(&issues);
    }

    Ok(())
}

/// Load markup from CLI arguments
fn load_source(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        Ok(read_document(path)?)
    } else {
        anyhow::bail!("expected a file path or --html")
    }
}

fn print_issues(issues: &[Diagnostic]) {
    println!("\n=== Parse Issues ({}) ===", issues.len());
    for issue in issues {
        let label = match issue.severity {
            Severity::Error => issue.severity.red().bold().to_string(),
            Severity::Warning => issue.severity.yellow().to_string(),
        };
        println!("  [token {}] {label}: {}", issue.token_index, issue.message);
    }
}

fn document_to_json(tree: &DomTree) -> serde_json::Result<Value> {
    Ok(json!({
        "type": "document",
        "quirksMode": serde_json::to_value(tree.quirks_mode())?,
        "doctype": serde_json::to_value(tree.doctype())?,
        "children": children_to_json(tree, tree.root()),
    }))
}

fn children_to_json(tree: &DomTree, id: NodeId) -> Vec<Value> {
    tree.children(id)
        .iter()
        .map(|&child| node_to_json(tree, child))
        .collect()
}

fn node_to_json(tree: &DomTree, id: NodeId) -> Value {
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };
    match &node.node_type {
        NodeType::Document => json!({ "type": "document" }),
        NodeType::Element(data) => {
            let attributes: Map<String, Value> = data
                .attrs
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect();
            let mut object = json!({
                "type": "element",
                "tagName": data.tag_name,
                "attributes": attributes,
                "children": children_to_json(tree, id),
            });
            if let Some(form) = data.form_owner
                && let Some(map) = object.as_object_mut()
            {
                let _ = map.insert("formOwner".to_string(), json!(form.0));
            }
            object
        }
        NodeType::Text(text) => json!({ "type": "text", "content": text }),
        NodeType::Comment(text) => json!({ "type": "comment", "content": text }),
    }
}
