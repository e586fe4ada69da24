// Strongly-typed IR handed to emitters. No markdown nodes here.
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{self, CompilerConfig};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "of")]
pub enum TypeExpr {
    Any,                        // unconstrained
    Literal(String),            // `int32`, `boolean`, ... taken verbatim
    Reference(String),          // another object, by descriptor name
    RuntimeExpression,          // a string evaluated later against a live message
    Array(Box<TypeExpr>),
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Union(Vec<TypeExpr>),       // always >= 2 alternatives
}

impl TypeExpr {
    pub fn array(of: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(of))
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map { key: Box::new(key), value: Box::new(value) }
    }

    /// Union of `alternatives`, with nested unions spliced in and a single
    /// alternative collapsed to itself.
    pub fn union(alternatives: Vec<TypeExpr>) -> Self {
        let mut arms: Vec<TypeExpr> = alternatives
            .into_iter()
            .flat_map(|arm| match arm {
                TypeExpr::Union(inner) => inner,
                other => vec![other],
            })
            .collect();
        if arms.len() == 1 {
            arms.remove(0)
        } else {
            TypeExpr::Union(arms)
        }
    }

    /// `self | Any`, unless `Any` is already admitted at the top level.
    pub fn widen_with_any(self) -> Self {
        match self {
            TypeExpr::Any => TypeExpr::Any,
            TypeExpr::Union(mut arms) => {
                if !arms.contains(&TypeExpr::Any) {
                    arms.push(TypeExpr::Any);
                }
                TypeExpr::Union(arms)
            }
            other => TypeExpr::Union(vec![other, TypeExpr::Any]),
        }
    }

    /// Every `Reference` target, depth-first, in source order.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeExpr::Reference(name) => out.push(name),
            TypeExpr::Array(of) => of.collect_references(out),
            TypeExpr::Map { key, value } => {
                key.collect_references(out);
                value.collect_references(out);
            }
            TypeExpr::Union(arms) => arms.iter().for_each(|t| t.collect_references(out)),
            TypeExpr::Any | TypeExpr::Literal(_) | TypeExpr::RuntimeExpression => {}
        }
    }
}

// ---- Markdown shape ----

/// A `TypeExpr` rendered in its documented markdown shape with a given
/// vocabulary (paragraph context; a table cell would need `|` escaped).
pub struct Markdown<'a> {
    ty: &'a TypeExpr,
    any_keyword: &'a str,
    map_keyword: &'a str,
    placeholder: &'a str,
}

impl TypeExpr {
    /// Markdown shape under `config`, which the type parser reads back as `self`.
    pub fn markdown<'a>(&'a self, config: &'a CompilerConfig) -> Markdown<'a> {
        Markdown {
            ty: self,
            any_keyword: &config.any_keyword,
            map_keyword: &config.map_keyword,
            placeholder: &config.runtime_expression_placeholder,
        }
    }
}

impl Markdown<'_> {
    fn nested<'b>(&'b self, ty: &'b TypeExpr) -> Markdown<'b> {
        Markdown { ty, ..*self }
    }
}

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            TypeExpr::Any => f.write_str(self.any_keyword),
            TypeExpr::Literal(name) => write!(f, "`{name}`"),
            TypeExpr::Reference(name) => write!(f, "[{name}](#{name})"),
            TypeExpr::RuntimeExpression => write!(f, "[{}](#runtimeExpression)", self.placeholder),
            TypeExpr::Array(of) => write!(f, "[{}]", self.nested(of)),
            TypeExpr::Map { key, value } => {
                write!(f, "{}[{}, {}]", self.map_keyword, self.nested(key), self.nested(value))
            }
            TypeExpr::Union(arms) => {
                for (i, arm) in arms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", self.nested(arm))?;
                }
                Ok(())
            }
        }
    }
}

/// Markdown shape under the default vocabulary.
impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = Markdown {
            ty: self,
            any_keyword: config::ANY_KEYWORD,
            map_keyword: config::MAP_KEYWORD,
            placeholder: config::RUNTIME_EXPRESSION_PLACEHOLDER,
        };
        write!(f, "{shape}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name_pattern: String,
    /// `None` when the type cell is blank: an untyped placeholder field.
    #[serde(rename = "type")]
    pub ty: Option<TypeExpr>,
    pub required: bool,
    pub description: String,
    /// Table columns with no dedicated role, keyed by camel-cased header.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescriptor {
    pub name: String,
    /// Heading text the object was declared under.
    pub title: String,
    pub description: String,
    pub example: Option<String>,
    pub is_extensible: bool,
    pub fixed_fields: Vec<FieldSpec>,      // stable order for deterministic codegen
    pub patterned_fields: Vec<FieldSpec>,
}

impl ObjectDescriptor {
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fixed_fields.iter().chain(self.patterned_fields.iter())
    }
}
