//! Compile prose specification documents (headings, field tables, examples)
//! into object/type descriptors for a downstream emitter.
pub mod ast;
pub mod compile;
pub mod config;
pub mod error;
pub mod ir;
pub mod path_de;

pub use compile::{compile_blocks, compile_document, Compilation, SectionOutcome};
pub use config::CompilerConfig;
pub use error::{CompileError, CompileErrors, SectionError, SourceError};
pub use ir::{FieldSpec, ObjectDescriptor, TypeExpr};

/// Parse GFM markdown and compile every object section in it.
pub fn compile_markdown(source: &str, config: &CompilerConfig) -> Result<Compilation, SourceError> {
    let root = ast::markdown::parse(source)?;
    Ok(compile_document(&root, config))
}
