//! GFM markdown → `ast::Node`, via the `markdown` crate's mdast.
use ::markdown::mdast;
use ::markdown::ParseOptions;

use super::{Node, NodeKind, Position};
use crate::error::SourceError;

/// Parse GFM markdown (tables enabled) into the compiler's document tree.
pub fn parse(source: &str) -> Result<Node, SourceError> {
    let tree = ::markdown::to_mdast(source, &ParseOptions::gfm())
        .map_err(|error| SourceError::Markdown(error.to_string()))?;
    Ok(convert(&tree))
}

fn convert(node: &mdast::Node) -> Node {
    let kind = match node {
        mdast::Node::Root(_) => NodeKind::Root,
        mdast::Node::Heading(h) => NodeKind::Heading { depth: h.depth },
        mdast::Node::Paragraph(_) => NodeKind::Paragraph,
        mdast::Node::Table(_) => NodeKind::Table,
        mdast::Node::TableRow(_) => NodeKind::TableRow,
        mdast::Node::TableCell(_) => NodeKind::TableCell,
        mdast::Node::Code(c) => NodeKind::Code { lang: c.lang.clone(), value: c.value.clone() },
        mdast::Node::List(_) => NodeKind::List,
        mdast::Node::ListItem(_) => NodeKind::ListItem,
        mdast::Node::Text(t) => NodeKind::Text(t.value.clone()),
        mdast::Node::Strong(_) => NodeKind::Strong,
        mdast::Node::Emphasis(_) => NodeKind::Emphasis,
        mdast::Node::InlineCode(c) => NodeKind::InlineCode(c.value.clone()),
        mdast::Node::Link(l) => NodeKind::Link { url: l.url.clone(), title: l.title.clone() },
        mdast::Node::LinkReference(r) => NodeKind::LinkReference { identifier: r.identifier.clone() },
        mdast::Node::Html(h) => NodeKind::Html(h.value.clone()),
        mdast::Node::Break(_) => NodeKind::Break,
        mdast::Node::Blockquote(_) => NodeKind::Other("blockquote"),
        mdast::Node::Delete(_) => NodeKind::Other("delete"),
        mdast::Node::Image(_) => NodeKind::Other("image"),
        mdast::Node::ThematicBreak(_) => NodeKind::Other("thematicBreak"),
        mdast::Node::Definition(_) => NodeKind::Other("definition"),
        _ => NodeKind::Other("unknown"),
    };

    let children: Vec<Node> = node
        .children()
        .map(|xs| xs.iter().map(convert).collect())
        .unwrap_or_default();

    let position = node.position().map(|p| Position {
        line: p.start.line,
        column: p.start.column,
    });

    Node { kind, children, position }
}
