//! Inline text renderer: flattens a node subtree into the text an author sees.
use crate::ast::{Node, NodeKind};
use crate::error::CompileError;

pub fn render(node: &Node) -> Result<String, CompileError> {
    render_node(node).map_err(|err| locate(err, node))
}

pub fn render_all(nodes: &[Node]) -> Result<String, CompileError> {
    nodes.iter().map(render).collect()
}

// A failure deep in the tree without a position of its own borrows the
// nearest located ancestor's, so the message still points into the source.
fn locate(err: CompileError, node: &Node) -> CompileError {
    match err {
        CompileError::MalformedInlineNode { kind, position: None } => {
            CompileError::MalformedInlineNode { kind, position: node.position }
        }
        other => other,
    }
}

fn render_node(node: &Node) -> Result<String, CompileError> {
    match &node.kind {
        NodeKind::Text(value) => Ok(value.clone()),
        NodeKind::InlineCode(value) => Ok(format!("`{value}`")),
        NodeKind::Strong => Ok(format!("**{}**", render_all(&node.children)?)),
        NodeKind::ListItem => Ok(format!(" + {}\n", render_all(&node.children)?)),
        NodeKind::Code { lang, value } => Ok(render_code(lang.as_deref(), value)),
        NodeKind::Link { url, title } => {
            let text = render_all(&node.children)?;
            Ok(match title {
                Some(title) => format!("[{text}]({url} \"{title}\")"),
                None => format!("[{text}]({url})"),
            })
        }
        NodeKind::Break => Ok("\n".to_owned()),

        // no linear text form
        NodeKind::Root | NodeKind::Table | NodeKind::TableRow => {
            Err(CompileError::MalformedInlineNode {
                kind: node.kind_name(),
                position: node.position,
            })
        }

        NodeKind::Heading { .. }
        | NodeKind::Paragraph
        | NodeKind::TableCell
        | NodeKind::List
        | NodeKind::Emphasis
        | NodeKind::LinkReference { .. }
        | NodeKind::Html(_)
        | NodeKind::Other(_) => render_all(&node.children),
    }
}

fn render_code(lang: Option<&str>, value: &str) -> String {
    let body = value
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("```{}\n{body}\n```", lang.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_and_code_keep_markers() {
        let p = Node::paragraph(vec![
            Node::strong(vec![Node::text("REQUIRED")]),
            Node::text(". The "),
            Node::inline_code("url"),
            Node::text(" field."),
        ]);
        assert_eq!(render(&p).unwrap(), "**REQUIRED**. The `url` field.");
    }

    #[test]
    fn links_render_with_optional_title() {
        let plain = Node::link("#infoObject", vec![Node::text("Info Object")]);
        assert_eq!(render(&plain).unwrap(), "[Info Object](#infoObject)");

        let mut titled = plain.clone();
        titled.kind = NodeKind::Link { url: "#infoObject".into(), title: Some("info".into()) };
        assert_eq!(render(&titled).unwrap(), "[Info Object](#infoObject \"info\")");
    }

    #[test]
    fn list_items_are_bulleted() {
        let list = Node::list(vec![
            Node::list_item(vec![Node::paragraph(vec![Node::text("one")])]),
            Node::list_item(vec![Node::paragraph(vec![Node::text("two")])]),
        ]);
        assert_eq!(render(&list).unwrap(), " + one\n + two\n");
    }

    #[test]
    fn code_blocks_are_fenced_and_indented() {
        let code = Node::code(Some("yaml"), "title: Sample\nversion: 1.0.1");
        assert_eq!(render(&code).unwrap(), "```yaml\n  title: Sample\n  version: 1.0.1\n```");
        assert_eq!(render(&Node::code(None, "x")).unwrap(), "```\n  x\n```");
    }

    #[test]
    fn unknown_leaves_render_empty() {
        let heading = Node::heading(
            4,
            vec![Node::new(NodeKind::Html("<a name=\"infoObject\"></a>".into()), vec![]), Node::text("Info Object")],
        );
        assert_eq!(render(&heading).unwrap(), "Info Object");
        assert_eq!(render(&Node::new(NodeKind::Other("image"), vec![])).unwrap(), "");
    }

    #[test]
    fn nested_table_fails_with_ancestor_position() {
        let p = Node::paragraph(vec![Node::text("see "), Node::table(vec![])]).at(7, 1);
        let err = render(&p).unwrap_err();
        assert_eq!(
            err,
            CompileError::MalformedInlineNode {
                kind: "table",
                position: Some(crate::ast::Position { line: 7, column: 1 }),
            }
        );
    }
}
