//! Document → object descriptors.
//!
//! One linear pass: the segmenter cuts the document into object sections,
//! then each section is folded block by block into an `ObjectDescriptor`.
//! Marker sentences ("Fixed Fields", "Patterned Fields", the extension note,
//! "<Object> Example") steer where the following blocks go:
//!
//! - prose before the first marker is the description
//! - a fields marker claims the next block as its table
//! - an example marker, or a bare code block, starts the example; everything
//!   after that belongs to it
//!
//! A failing section never stops the others: every section yields its own
//! outcome and the caller sees all of them.
pub mod naming;
pub mod render;
pub mod section;
pub mod table;
pub mod ty;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::ast::{Node, NodeKind};
use crate::config::CompilerConfig;
use crate::error::{CompileError, CompileErrors, SectionError};
use crate::ir::{FieldSpec, ObjectDescriptor, TypeExpr};
use section::Section;

pub use section::segment;
pub use ty::parse_type_cell;

// ------------------------------- Outcomes --------------------------------- //

pub type SectionOutcome = Result<ObjectDescriptor, SectionError>;

/// Per-document report: one outcome per object section, in document order.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub outcomes: Vec<SectionOutcome>,
}

/// A `Reference` whose target matches no compiled descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference<'a> {
    pub object: &'a str,
    pub field: &'a str,
    pub target: &'a str,
}

impl Compilation {
    pub fn descriptors(&self) -> impl Iterator<Item = &ObjectDescriptor> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = &SectionError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn is_ok(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }

    /// All descriptors, or every section error at once.
    pub fn into_result(self) -> Result<Vec<ObjectDescriptor>, CompileErrors> {
        let (ok, err): (Vec<_>, Vec<_>) = self.outcomes.into_iter().partition(Result::is_ok);
        if err.is_empty() {
            Ok(ok.into_iter().filter_map(Result::ok).collect())
        } else {
            Err(CompileErrors(err.into_iter().filter_map(Result::err).collect()))
        }
    }

    pub fn unresolved_references(&self) -> Vec<UnresolvedReference<'_>> {
        let known: BTreeSet<&str> = self.descriptors().map(|d| d.name.as_str()).collect();
        let mut out = Vec::new();
        for object in self.descriptors() {
            for field in object.fields() {
                let Some(ty) = &field.ty else { continue };
                for target in ty.references() {
                    if !known.contains(target) {
                        out.push(UnresolvedReference {
                            object: &object.name,
                            field: &field.name_pattern,
                            target,
                        });
                    }
                }
            }
        }
        out
    }
}

// ------------------------------ Entry points ------------------------------ //

/// Compile a whole document (a `Root` node, or a single block).
pub fn compile_document(root: &Node, config: &CompilerConfig) -> Compilation {
    match root.kind {
        NodeKind::Root => compile_blocks(&root.children, config),
        _ => compile_blocks(std::slice::from_ref(root), config),
    }
}

pub fn compile_blocks(blocks: &[Node], config: &CompilerConfig) -> Compilation {
    let outcomes = segment(blocks, config)
        .into_iter()
        .map(|section| {
            let section = section?;
            compile_section(&section, config).map_err(|error| SectionError {
                object: section.title.clone(),
                error,
            })
        })
        .collect();
    Compilation { outcomes }
}

/// Fold one section's blocks into its descriptor.
pub fn compile_section(section: &Section<'_>, config: &CompilerConfig) -> Result<ObjectDescriptor, CompileError> {
    let vocabulary = Vocabulary::new(config, &section.title);
    let acc = section
        .blocks
        .iter()
        .try_fold(Accumulator::default(), |acc, block| acc.step(block, &vocabulary))?;
    let object = acc.finish(section, config);
    debug!(
        object = %object.name,
        line = section.heading.position.map(|p| p.line),
        fixed = object.fixed_fields.len(),
        patterned = object.patterned_fields.len(),
        extensible = object.is_extensible,
        "compiled object"
    );
    Ok(object)
}

// ------------------------------- Markers ---------------------------------- //

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldKind {
    Fixed,
    Patterned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Fields(FieldKind),
    Extension,
    Example,
}

struct Vocabulary<'c> {
    config: &'c CompilerConfig,
    example_marker: String,
}

impl<'c> Vocabulary<'c> {
    fn new(config: &'c CompilerConfig, title: &str) -> Self {
        Self {
            config,
            example_marker: format!("{title} {}", config.example_suffix),
        }
    }

    fn classify(&self, text: &str) -> Option<Marker> {
        if text == self.config.fixed_fields_marker {
            Some(Marker::Fields(FieldKind::Fixed))
        } else if text == self.config.patterned_fields_marker {
            Some(Marker::Fields(FieldKind::Patterned))
        } else if text.starts_with(self.config.extension_marker.as_str()) {
            Some(Marker::Extension)
        } else if text.starts_with(self.example_marker.as_str()) {
            Some(Marker::Example)
        } else {
            None
        }
    }
}

// ------------------------------ Accumulator ------------------------------- //

/// Where the next block goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Mode {
    #[default]
    Description,
    AwaitTable(FieldKind),
    /// Past the first marker; prose that is not a marker is dropped.
    Fields,
    Example,
}

#[derive(Debug, Default)]
struct Accumulator {
    mode: Mode,
    description: Vec<String>,
    examples: Vec<String>,
    extension_note: Option<String>,
    fixed: Vec<FieldSpec>,
    patterned: Vec<FieldSpec>,
}

impl Accumulator {
    fn step(mut self, block: &Node, vocabulary: &Vocabulary<'_>) -> Result<Self, CompileError> {
        match self.mode {
            Mode::Example => {
                if block.is_table() {
                    warn!(line = block.position.map(|p| p.line), "table inside example ignored");
                } else {
                    self.examples.push(render::render(block)?);
                }
                return Ok(self);
            }
            Mode::AwaitTable(kind) if block.is_table() => {
                let fields = table::extract_fields(block, vocabulary.config)?;
                match kind {
                    FieldKind::Fixed => self.fixed.extend(fields),
                    FieldKind::Patterned => self.patterned.extend(fields),
                }
                self.mode = Mode::Fields;
                return Ok(self);
            }
            Mode::AwaitTable(kind) => {
                warn!(?kind, line = block.position.map(|p| p.line), "fields marker not followed by a table");
                self.mode = Mode::Fields;
            }
            Mode::Description | Mode::Fields => {}
        }

        if block.is_table() {
            warn!(line = block.position.map(|p| p.line), "table without a fields marker ignored");
            return Ok(self);
        }
        // code never appears in a plain description: the example has begun
        if block.is_code() {
            self.mode = Mode::Example;
            self.examples.push(render::render(block)?);
            return Ok(self);
        }

        let rendered = render::render(block)?;
        let text = rendered.trim();
        match vocabulary.classify(text) {
            Some(Marker::Fields(kind)) => self.mode = Mode::AwaitTable(kind),
            Some(Marker::Extension) => {
                self.extension_note = Some(text.to_owned());
                self.mode = Mode::Fields;
            }
            Some(Marker::Example) => self.mode = Mode::Example,
            None if self.mode == Mode::Description && block.heading_depth().is_none() => {
                self.description.push(text.to_owned());
            }
            None if self.mode == Mode::Fields => {
                warn!(line = block.position.map(|p| p.line), text, "prose after a fields marker ignored");
            }
            None => debug!(text, "heading inside description ignored"),
        }
        Ok(self)
    }

    fn finish(self, section: &Section<'_>, config: &CompilerConfig) -> ObjectDescriptor {
        let is_extensible = self.extension_note.is_some();
        let mut patterned = self.patterned;
        if let Some(note) = self.extension_note {
            if patterned.is_empty() {
                patterned.push(FieldSpec {
                    name_pattern: config.extension_field_name.clone(),
                    ty: Some(TypeExpr::Any),
                    required: false,
                    description: note,
                    attributes: Default::default(),
                });
            } else {
                patterned = patterned
                    .into_iter()
                    .map(|field| admit_extensions(field, &note, config))
                    .collect();
            }
        }

        ObjectDescriptor {
            name: naming::type_name(&config.type_prefix, &section.title),
            title: section.title.clone(),
            description: self.description.join("\n"),
            example: (!self.examples.is_empty()).then(|| self.examples.join("\n\n")),
            is_extensible,
            fixed_fields: self.fixed,
            patterned_fields: patterned,
        }
    }
}

/// Widen a declared patterned field so it also covers extension keys.
fn admit_extensions(mut field: FieldSpec, note: &str, config: &CompilerConfig) -> FieldSpec {
    field.name_pattern.push_str(&config.extension_suffix);
    field.ty = Some(field.ty.map_or(TypeExpr::Any, TypeExpr::widen_with_any));
    if field.description.is_empty() {
        field.description = note.to_owned();
    } else {
        field.description = format!("{}\n{note}", field.description);
    }
    field
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn h(depth: u8, text: &str) -> Node {
        Node::heading(depth, vec![Node::text(text)])
    }

    fn p(text: &str) -> Node {
        Node::paragraph(vec![Node::text(text)])
    }

    fn header(names: &[&str]) -> Node {
        Node::row(names.iter().map(|n| Node::cell(vec![Node::text(n)])).collect())
    }

    fn fields_table(first_column: &str, rows: &[(&str, Node, &str)]) -> Node {
        let mut children = vec![header(&[first_column, "Type", "Description"])];
        children.extend(rows.iter().map(|(name, ty, desc)| {
            Node::row(vec![
                Node::cell(vec![Node::text(name)]),
                Node::cell(vec![ty.clone()]),
                Node::cell(vec![Node::text(desc)]),
            ])
        }));
        Node::table(children)
    }

    fn extension_sentence() -> Node {
        Node::paragraph(vec![
            Node::text("This object MAY be extended with "),
            Node::link("#specificationExtensions", vec![Node::text("Specification Extensions")]),
            Node::text("."),
        ])
    }

    fn compile(blocks: Vec<Node>) -> Compilation {
        compile_document(&Node::root(blocks), &CompilerConfig::default())
    }

    fn only(c: Compilation) -> ObjectDescriptor {
        let mut all = c.into_result().unwrap();
        assert_eq!(all.len(), 1);
        all.remove(0)
    }

    #[test]
    fn document_without_objects_compiles_to_nothing() {
        let c = compile(vec![h(1, "OpenAPI"), p("Intro."), h(4, "Format")]);
        assert!(c.outcomes.is_empty());
        assert!(c.is_ok());
        assert!(compile(vec![]).into_result().unwrap().is_empty());
    }

    #[test]
    fn full_object_section() {
        let o = only(compile(vec![
            h(4, "Contact Object"),
            p("Contact information for the exposed API."),
            p("Second paragraph."),
            h(5, "Fixed Fields"),
            fields_table("Field Name", &[
                ("name", Node::inline_code("string"), "The identifying name."),
                ("url", Node::inline_code("string"), "The URL pointing to the contact information."),
            ]),
            extension_sentence(),
            h(5, "Contact Object Example"),
            Node::code(Some("json"), "{\n  \"name\": \"API Support\"\n}"),
            Node::code(Some("yaml"), "name: API Support"),
        ]));

        assert_eq!(o.name, "ContactObject");
        assert_eq!(o.title, "Contact Object");
        assert_eq!(o.description, "Contact information for the exposed API.\nSecond paragraph.");
        assert_eq!(o.fixed_fields.len(), 2);
        assert_eq!(o.fixed_fields[1].name_pattern, "url");
        assert!(o.is_extensible);
        assert_eq!(o.patterned_fields.len(), 1);
        assert_eq!(
            o.example.as_deref(),
            Some("```json\n  {\n    \"name\": \"API Support\"\n  }\n```\n\n```yaml\n  name: API Support\n```")
        );
    }

    #[test]
    fn extension_without_patterned_fields_synthesizes_one() {
        let o = only(compile(vec![h(4, "Tag Object"), p("Adds metadata."), extension_sentence()]));
        assert!(o.is_extensible);
        assert_eq!(o.patterned_fields.len(), 1);
        let ext = &o.patterned_fields[0];
        assert_eq!(ext.name_pattern, "extension");
        assert_eq!(ext.ty, Some(TypeExpr::Any));
        assert!(!ext.required);
        assert!(ext.description.starts_with("This object MAY be extended with"));
    }

    #[test]
    fn extension_widens_declared_patterned_fields() {
        let o = only(compile(vec![
            h(4, "Paths Object"),
            p("Holds the relative paths."),
            h(5, "Patterned Fields"),
            fields_table("Field Pattern", &[(
                "/{path}",
                Node::link("#pathItemObject", vec![Node::text("Path Item Object")]),
                "A relative path to an individual endpoint.",
            )]),
            extension_sentence(),
        ]));
        assert_eq!(o.patterned_fields.len(), 1);
        let field = &o.patterned_fields[0];
        assert_eq!(field.name_pattern, "pathOrExtension");
        assert_ne!(field.name_pattern, "extension");
        assert_eq!(
            field.ty,
            Some(TypeExpr::Union(vec![TypeExpr::Reference("PathItemObject".into()), TypeExpr::Any]))
        );
        assert_eq!(
            field.description,
            "A relative path to an individual endpoint.\nThis object MAY be extended with [Specification Extensions](#specificationExtensions)."
        );
    }

    #[test]
    fn prose_only_object_is_valid() {
        let o = only(compile(vec![h(4, "Reference Object"), p("A simple object to allow referencing.")]));
        assert!(o.fixed_fields.is_empty());
        assert!(o.patterned_fields.is_empty());
        assert!(!o.is_extensible);
        assert_eq!(o.example, None);
    }

    #[test]
    fn bare_code_block_ends_description() {
        let o = only(compile(vec![
            h(4, "Header Object"),
            p("Follows the structure of the Parameter Object."),
            Node::code(None, "X-Rate-Limit: 100"),
            p("Trailing prose belongs to the example."),
            h(5, "Fixed Fields"),
        ]));
        assert_eq!(o.description, "Follows the structure of the Parameter Object.");
        assert_eq!(
            o.example.as_deref(),
            Some("```\n  X-Rate-Limit: 100\n```\n\nTrailing prose belongs to the example.\n\nFixed Fields")
        );
        assert!(o.fixed_fields.is_empty());
    }

    #[test]
    fn prose_after_a_marker_is_not_description() {
        let o = only(compile(vec![
            h(4, "Paths Object"),
            p("Holds the relative paths."),
            h(5, "Patterned Fields"),
            fields_table("Field Pattern", &[("/{path}", Node::inline_code("string"), "x")]),
            p("The Paths MAY be empty, due to ACL constraints."),
        ]));
        assert_eq!(o.description, "Holds the relative paths.");
        assert_eq!(o.example, None);
        assert_eq!(o.patterned_fields.len(), 1);
    }

    #[test]
    fn failing_section_does_not_stop_the_rest() {
        let c = compile(vec![
            h(4, "Broken Object"),
            h(5, "Fixed Fields"),
            fields_table("Field Name", &[("x", Node::text("not a type"), "y")]),
            h(4, "Tag Object"),
            p("Fine."),
        ]);
        assert_eq!(c.outcomes.len(), 2);
        assert_eq!(c.descriptors().map(|d| d.name.as_str()).collect::<Vec<_>>(), vec!["TagObject"]);
        let errors: Vec<_> = c.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].object, "Broken Object");
        assert_eq!(
            errors[0].error,
            CompileError::UnparsableTypeExpression { cell: "not a type".into() }
        );
        assert_eq!(c.into_result().unwrap_err().0.len(), 1);
    }

    #[test]
    fn unresolved_references_are_listed() {
        let c = compile(vec![
            h(4, "Info Object"),
            h(5, "Fixed Fields"),
            fields_table("Field Name", &[
                ("contact", Node::link("#contactObject", vec![Node::text("Contact Object")]), "c"),
                ("license", Node::link("#licenseObject", vec![Node::text("License Object")]), "l"),
            ]),
            h(4, "Contact Object"),
            p("Contact information."),
        ]);
        assert_eq!(
            c.unresolved_references(),
            vec![UnresolvedReference { object: "InfoObject", field: "license", target: "LicenseObject" }]
        );
    }
}
