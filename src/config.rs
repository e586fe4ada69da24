//! Compiler vocabulary: which headings open objects, which sentences are
//! markers, and which words the type grammar treats as keywords.
//!
//! Defaults match OpenAPI-style specification documents.
use serde::Deserialize;

use crate::error::SourceError;

pub const ANY_KEYWORD: &str = "Any";
pub const MAP_KEYWORD: &str = "Map";
pub const RUNTIME_EXPRESSION_PLACEHOLDER: &str = "{expression}";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Heading depth that opens an object section.
    pub object_heading_depth: u8,
    /// Heading text suffix marking an object definition.
    pub object_suffix: String,
    pub fixed_fields_marker: String,
    pub patterned_fields_marker: String,
    /// Prefix of the sentence declaring the object extensible.
    pub extension_marker: String,
    /// Appended to the object heading text to form its example marker.
    pub example_suffix: String,
    /// Description prefix flagging a required field.
    pub required_marker: String,
    pub any_keyword: String,
    pub map_keyword: String,
    /// Link text standing for a runtime expression string.
    pub runtime_expression_placeholder: String,
    /// Prepended to object and reference names.
    pub type_prefix: String,
    pub extension_field_name: String,
    /// Appended to patterned field names widened to accept extensions.
    pub extension_suffix: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            object_heading_depth: 4,
            object_suffix: "Object".into(),
            fixed_fields_marker: "Fixed Fields".into(),
            patterned_fields_marker: "Patterned Fields".into(),
            extension_marker: "This object MAY be extended with".into(),
            example_suffix: "Example".into(),
            required_marker: "**REQUIRED**. ".into(),
            any_keyword: ANY_KEYWORD.into(),
            map_keyword: MAP_KEYWORD.into(),
            runtime_expression_placeholder: RUNTIME_EXPRESSION_PLACEHOLDER.into(),
            type_prefix: String::new(),
            extension_field_name: "extension".into(),
            extension_suffix: "OrExtension".into(),
        }
    }
}

/// Load a config from JSON bytes; unset keys keep their defaults.
pub fn load_config(bytes: &[u8]) -> Result<CompilerConfig, SourceError> {
    crate::path_de::from_slice_with_path(bytes)
}
