//! Section segmenter: object headings and the blocks they own.
use tracing::debug;

use super::render::render;
use crate::ast::Node;
use crate::config::CompilerConfig;
use crate::error::SectionError;

/// An object heading plus every block up to the next heading at the same
/// or a shallower depth.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub heading: &'a Node,
    /// Rendered, trimmed heading text, e.g. `"Info Object"`.
    pub title: String,
    pub blocks: &'a [Node],
}

/// Walk the top-level blocks once, opening a section at every heading of the
/// watched depth whose text ends with the object suffix. Output follows
/// document order; a watched heading whose text cannot be rendered shows up
/// as an error in its place.
pub fn segment<'a>(blocks: &'a [Node], config: &CompilerConfig) -> Vec<Result<Section<'a>, SectionError>> {
    let depth = config.object_heading_depth;
    let mut sections = Vec::new();
    let mut index = 0;

    while index < blocks.len() {
        let node = &blocks[index];
        index += 1;
        if node.heading_depth() != Some(depth) {
            continue;
        }
        let title = match render(node) {
            Ok(text) => text.trim().to_owned(),
            Err(error) => {
                let object = match node.position {
                    Some(p) => format!("heading at {p}"),
                    None => format!("heading #{index}"),
                };
                sections.push(Err(SectionError { object, error }));
                continue;
            }
        };
        if !title.ends_with(config.object_suffix.as_str()) {
            continue;
        }

        let end = section_end(blocks, index, depth);
        debug!(object = %title, blocks = end - index, "object section");
        sections.push(Ok(Section { heading: node, title, blocks: &blocks[index..end] }));
        index = end;
    }

    sections
}

fn section_end(blocks: &[Node], start: usize, depth: u8) -> usize {
    blocks[start..]
        .iter()
        .position(|b| b.heading_depth().is_some_and(|d| d <= depth))
        .map_or(blocks.len(), |offset| start + offset)
}
