//! Field tables: header row names the column roles, every other row is one field.
use indexmap::IndexMap;

use super::naming::{camel_case, pattern_identifier};
use super::render::{render, render_all};
use super::ty::parse_type_cell;
use crate::ast::Node;
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::ir::{FieldSpec, TypeExpr};

const FIELD_NAME_COLUMN: &str = "fieldName";

#[derive(Clone, Debug, PartialEq, Eq)]
enum ColumnRole {
    Description,
    Type,
    FieldPattern,
    /// Any other column, kept verbatim under its camel-cased header.
    Attribute(String),
}

impl ColumnRole {
    fn from_header(header: &str) -> Self {
        match camel_case(header).as_str() {
            "description" => ColumnRole::Description,
            "type" => ColumnRole::Type,
            "fieldPattern" => ColumnRole::FieldPattern,
            other => ColumnRole::Attribute(other.to_owned()),
        }
    }
}

#[derive(Debug, Default)]
struct FieldRecord {
    pattern: Option<String>,
    ty: Option<TypeExpr>,
    required: bool,
    description: String,
    attributes: IndexMap<String, String>,
}

impl FieldRecord {
    fn into_field(mut self, row: usize) -> Result<FieldSpec, CompileError> {
        let name = self
            .pattern
            .take()
            .or_else(|| self.attributes.shift_remove(FIELD_NAME_COLUMN))
            .or_else(|| self.attributes.shift_remove_index(0).map(|(_, v)| v))
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .ok_or(CompileError::MissingFieldName { row })?;
        Ok(FieldSpec {
            name_pattern: name,
            ty: self.ty,
            required: self.required,
            description: self.description,
            attributes: self.attributes,
        })
    }
}

/// Extract one `FieldSpec` per data row. A header-only table yields none.
pub fn extract_fields(table: &Node, config: &CompilerConfig) -> Result<Vec<FieldSpec>, CompileError> {
    let Some((header, rows)) = table.children.split_first() else {
        return Ok(Vec::new());
    };
    let roles = header
        .children
        .iter()
        .map(|cell| render(cell).map(|text| ColumnRole::from_header(&text)))
        .collect::<Result<Vec<_>, _>>()?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let record = row
                .children
                .iter()
                .zip(&roles)
                .try_fold(FieldRecord::default(), |record, (cell, role)| {
                    fill(record, role, cell, config)
                })?;
            record.into_field(i + 1)
        })
        .collect()
}

fn fill(
    mut record: FieldRecord,
    role: &ColumnRole,
    cell: &Node,
    config: &CompilerConfig,
) -> Result<FieldRecord, CompileError> {
    match role {
        ColumnRole::Description => {
            let text = render_all(&cell.children)?;
            match text.strip_prefix(config.required_marker.as_str()) {
                Some(rest) => {
                    record.required = true;
                    record.description = rest.trim().to_owned();
                }
                None => record.description = text.trim().to_owned(),
            }
        }
        ColumnRole::Type => record.ty = parse_type_cell(&cell.children, config)?,
        ColumnRole::FieldPattern => {
            record.pattern = Some(pattern_identifier(&render_all(&cell.children)?));
        }
        ColumnRole::Attribute(name) => {
            record.attributes.insert(name.clone(), render_all(&cell.children)?.trim().to_owned());
        }
    }
    Ok(record)
}
