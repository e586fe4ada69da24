//! Error types for the document compiler.
use thiserror::Error;

use crate::ast::Position;

/// Failures local to one object section.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A node the text renderer cannot linearize.
    #[error("cannot render `{kind}` node as text{}", at(.position))]
    MalformedInlineNode {
        kind: &'static str,
        position: Option<Position>,
    },

    /// A type cell that matches none of the known shapes.
    #[error("unparsable type expression: `{cell}`")]
    UnparsableTypeExpression { cell: String },

    /// A `Map` cell whose key/value split could not be made.
    #[error("malformed map type: `{cell}`")]
    MalformedMapType { cell: String },

    /// A field table row with no usable name or pattern.
    #[error("field table row {row} has no field name")]
    MissingFieldName { row: usize },
}

fn at(position: &Option<Position>) -> String {
    match position {
        Some(p) => format!(" at {p}"),
        None => String::new(),
    }
}

/// A `CompileError` bound to the object heading it came from.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{object}: {error}")]
pub struct SectionError {
    pub object: String,
    #[source]
    pub error: CompileError,
}

/// Every section failure of one compile, reported together.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} object section(s) failed to compile:\n{}", .0.len(), format_section_errors(.0))]
pub struct CompileErrors(pub Vec<SectionError>);

fn format_section_errors(errors: &[SectionError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Failures before compilation starts: reading markdown or configuration.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("markdown parse error: {0}")]
    Markdown(String),

    #[error("config error at {path}: {message}")]
    Config { path: String, message: String },
}
