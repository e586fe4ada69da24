//! Closed document tree the compiler walks.
//!
//! Mirrors the mdast node shapes the compiler cares about. Anything else the
//! markdown parser produces lands in `NodeKind::Other` with its type name so
//! diagnostics can still point at it.
pub mod markdown;

use std::fmt;

// ------------------------------- Position --------------------------------- //

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// --------------------------------- Nodes ---------------------------------- //

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Root,
    Heading { depth: u8 },
    Paragraph,
    Table,
    TableRow,
    TableCell,
    Code { lang: Option<String>, value: String },
    List,
    ListItem,
    Text(String),
    Strong,
    Emphasis,
    InlineCode(String),
    Link { url: String, title: Option<String> },
    LinkReference { identifier: String },
    Html(String),
    Break,
    Other(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    pub position: Option<Position>,
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Self { kind, children, position: None }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some(Position { line, column });
        self
    }

    /// mdast-style type name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Root => "root",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Table => "table",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableCell => "tableCell",
            NodeKind::Code { .. } => "code",
            NodeKind::List => "list",
            NodeKind::ListItem => "listItem",
            NodeKind::Text(_) => "text",
            NodeKind::Strong => "strong",
            NodeKind::Emphasis => "emphasis",
            NodeKind::InlineCode(_) => "inlineCode",
            NodeKind::Link { .. } => "link",
            NodeKind::LinkReference { .. } => "linkReference",
            NodeKind::Html(_) => "html",
            NodeKind::Break => "break",
            NodeKind::Other(name) => *name,
        }
    }

    pub fn heading_depth(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Heading { depth } => Some(depth),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self.kind, NodeKind::Table)
    }

    pub fn is_code(&self) -> bool {
        matches!(self.kind, NodeKind::Code { .. })
    }

    /// Value of a text leaf, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(value) => Some(value),
            _ => None,
        }
    }

    // ---- builders (mostly for tests and hand-built trees) ----

    pub fn root(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Root, children)
    }
    pub fn heading(depth: u8, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Heading { depth }, children)
    }
    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph, children)
    }
    pub fn table(rows: Vec<Node>) -> Self {
        Self::new(NodeKind::Table, rows)
    }
    pub fn row(cells: Vec<Node>) -> Self {
        Self::new(NodeKind::TableRow, cells)
    }
    pub fn cell(children: Vec<Node>) -> Self {
        Self::new(NodeKind::TableCell, children)
    }
    pub fn code(lang: Option<&str>, value: &str) -> Self {
        Self::new(
            NodeKind::Code { lang: lang.map(str::to_owned), value: value.to_owned() },
            Vec::new(),
        )
    }
    pub fn list(items: Vec<Node>) -> Self {
        Self::new(NodeKind::List, items)
    }
    pub fn list_item(children: Vec<Node>) -> Self {
        Self::new(NodeKind::ListItem, children)
    }
    pub fn text(value: &str) -> Self {
        Self::new(NodeKind::Text(value.to_owned()), Vec::new())
    }
    pub fn strong(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Strong, children)
    }
    pub fn inline_code(value: &str) -> Self {
        Self::new(NodeKind::InlineCode(value.to_owned()), Vec::new())
    }
    pub fn link(url: &str, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Link { url: url.to_owned(), title: None }, children)
    }
    pub fn link_reference(identifier: &str, children: Vec<Node>) -> Self {
        Self::new(NodeKind::LinkReference { identifier: identifier.to_owned() }, children)
    }
}
