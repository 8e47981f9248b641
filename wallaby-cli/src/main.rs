//! Wallaby CLI
//!
//! Runs a selector against a JSON-described element tree and prints the
//! matches, for trying out selectors and debugging backend behavior.
//!
//! ```text
//! wallaby 'ul > li.item:odd' page.json
//! wallaby 'p:contains(hi)' --json '{"tag":"p","children":["hi"]}'
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use serde::Deserialize;
use wallaby_dom::{DomTree, ElementData, NodeId, NodeType};
use wallaby_selector::{Engine, engine, find_all, find_first};

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "wallaby", about = "Run selectors against a JSON-described tree")]
struct Args {
    /// The selector to run (comma-separated lists are unioned).
    selector: String,

    /// JSON tree file (object or array of objects; strings are text nodes).
    #[arg(required_unless_present = "json")]
    file: Option<PathBuf>,

    /// Inline JSON tree instead of a file.
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Evaluation backend.
    #[arg(long, value_enum, default_value_t = Backend::Auto)]
    backend: Backend,

    /// Print only the first match.
    #[arg(long)]
    first: bool,
}

/// Which engine to install for this run.
#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// Prefer the declarative tree-query backend when compiled in.
    Auto,
    /// Declarative: compile to one tree-query path.
    Xpath,
    /// Imperative: walk the tree, narrowing a candidate set.
    Filter,
}

/// One node of the JSON tree format: an element object or bare text.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonNode {
    /// A text node.
    Text(String),
    /// An element with optional attributes and children.
    Element {
        /// Tag name.
        tag: String,
        /// Attribute map.
        #[serde(default)]
        attrs: HashMap<String, String>,
        /// Child nodes.
        #[serde(default)]
        children: Vec<JsonNode>,
    },
}

/// A document: one root element or several.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDoc {
    /// A single root node.
    One(JsonNode),
    /// Multiple top-level nodes.
    Many(Vec<JsonNode>),
}

fn main() -> Result<()> {
    let args = Args::parse();

    let source = match (&args.json, &args.file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        (None, None) => bail!("a tree file or --json is required"),
    };
    let doc: JsonDoc = serde_json::from_str(&source).context("parsing JSON tree")?;
    let tree = build_tree(&doc);

    let chosen = match args.backend {
        Backend::Auto => Engine::auto(),
        Backend::Xpath => Engine::declarative(),
        Backend::Filter => Engine::imperative(),
    };
    engine::install(chosen).map_err(|_| anyhow!("engine already installed"))?;

    let matches = if args.first {
        find_first(&tree, None, &args.selector)?
            .into_iter()
            .collect()
    } else {
        find_all(&tree, None, &args.selector)?
    };

    if matches.is_empty() {
        println!("no matches");
        return Ok(());
    }
    println!("{} match(es)", matches.len());
    for id in matches {
        println!("  {}", breadcrumb(&tree, id));
    }
    Ok(())
}

/// Build a [`DomTree`] from the deserialized document.
fn build_tree(doc: &JsonDoc) -> DomTree {
    let mut tree = DomTree::new();
    let roots: Vec<&JsonNode> = match doc {
        JsonDoc::One(node) => vec![node],
        JsonDoc::Many(nodes) => nodes.iter().collect(),
    };
    for node in roots {
        attach(&mut tree, NodeId::ROOT, node);
    }
    tree
}

fn attach(tree: &mut DomTree, parent: NodeId, node: &JsonNode) {
    match node {
        JsonNode::Text(text) => {
            let id = tree.alloc(NodeType::Text(text.clone()));
            tree.append_child(parent, id);
        }
        JsonNode::Element {
            tag,
            attrs,
            children,
        } => {
            let id = tree.alloc(NodeType::Element(ElementData::new(
                tag.clone(),
                attrs.clone(),
            )));
            tree.append_child(parent, id);
            for child in children {
                attach(tree, id, child);
            }
        }
    }
}

/// Render a node as an ancestor breadcrumb, the match itself highlighted:
/// `html > body > ul > li#nav.item`.
fn breadcrumb(tree: &DomTree, id: NodeId) -> String {
    let mut segments: Vec<String> = tree
        .ancestors(id)
        .filter(|&a| tree.as_element(a).is_some())
        .map(|a| label(tree, a))
        .collect();
    segments.reverse();
    segments.push(label(tree, id).green().bold().to_string());
    segments.join(" > ")
}

/// `tag#id.class1.class2` label for one element.
fn label(tree: &DomTree, id: NodeId) -> String {
    let Some(element) = tree.as_element(id) else {
        return "?".to_string();
    };
    let mut out = element.tag_name.clone();
    if let Some(idv) = element.id() {
        out.push('#');
        out.push_str(idv);
    }
    if let Some(classes) = element.attrs.get("class") {
        for class in classes.split_ascii_whitespace() {
            out.push('.');
            out.push_str(class);
        }
    }
    out
}
