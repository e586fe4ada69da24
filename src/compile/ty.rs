//! Type expression parser over the inline tokens of one "Type" table cell.
//!
//! Authors write types in a handful of recurring shapes:
//!
//! - `Any`
//! - `` `string` ``                                  (literal)
//! - `[Info Object](#infoObject)`                    (reference)
//! - `[{expression}](#runtimeExpression)`            (runtime expression)
//! - `[` … `]`                                       (array)
//! - `Map[` key `,` value `]`                        (map)
//! - a `|` b `|` …                                   (union)
//!
//! Several shapes are prefixes of others, so the rules below are tried in a
//! fixed order and the first one that applies wins. The last rule never
//! guesses: a cell it cannot split into a union is an error.
use tracing::trace;

use super::naming;
use super::render::render_all;
use crate::ast::{Node, NodeKind};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::ir::TypeExpr;

/// Parse a type cell. `Ok(None)` means the cell is blank: no declared type.
pub fn parse_type_cell(cell: &[Node], config: &CompilerConfig) -> Result<Option<TypeExpr>, CompileError> {
    let tokens = tokenize(cell);
    if tokens.is_empty() {
        return Ok(None);
    }
    let parser = TypeParser {
        config,
        cell: render_all(cell)?.trim().to_owned(),
    };
    parser.parse(&tokens).map(Some)
}

// -------------------------------- Tokens --------------------------------- //

#[derive(Clone, Copy, Debug)]
enum Token<'a> {
    /// Trimmed text run, or one of the punctuation marks `[ ] | ,` on its own.
    Text(&'a str),
    Code(&'a str),
    Link(&'a Node),
    LinkRef(&'a Node),
    /// Anything else (emphasis, images, …); never part of a valid shape.
    Other,
}

impl Token<'_> {
    fn is(&self, text: &str) -> bool {
        matches!(self, Token::Text(t) if *t == text)
    }
}

const PUNCTUATION: [char; 4] = ['[', ']', '|', ','];

fn tokenize(nodes: &[Node]) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    for node in nodes {
        match &node.kind {
            NodeKind::Text(value) => split_text(value, &mut out),
            NodeKind::InlineCode(value) => out.push(Token::Code(value)),
            NodeKind::Link { .. } => out.push(Token::Link(node)),
            NodeKind::LinkReference { .. } => out.push(Token::LinkRef(node)),
            NodeKind::Html(_) | NodeKind::Break => {}
            _ => out.push(Token::Other),
        }
    }
    out
}

fn split_text<'a>(value: &'a str, out: &mut Vec<Token<'a>>) {
    let mut start = 0;
    for (i, c) in value.char_indices() {
        if PUNCTUATION.contains(&c) {
            push_run(&value[start..i], out);
            out.push(Token::Text(&value[i..i + c.len_utf8()]));
            start = i + c.len_utf8();
        }
    }
    push_run(&value[start..], out);
}

fn push_run<'a>(run: &'a str, out: &mut Vec<Token<'a>>) {
    let run = run.trim();
    if !run.is_empty() {
        out.push(Token::Text(run));
    }
}

/// Index of the `]` closing the `[` at `open`.
fn matching_close(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.is("[") {
            depth += 1;
        } else if token.is("]") {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split at every `sep` token outside brackets.
fn split_top_level<'t, 'a>(tokens: &'t [Token<'a>], sep: &str) -> Vec<&'t [Token<'a>]> {
    let mut groups = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.is("[") {
            depth += 1;
        } else if token.is("]") {
            depth -= 1;
        } else if depth == 0 && token.is(sep) {
            groups.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    groups.push(&tokens[start..]);
    groups
}

// -------------------------------- Parser --------------------------------- //

type Outcome = Option<Result<TypeExpr, CompileError>>;

struct Rule {
    name: &'static str,
    apply: fn(&TypeParser<'_>, &[Token<'_>]) -> Outcome,
}

/// Priority order matters: single-token forms before bracket/map forms,
/// bracket arrays before union splitting (`[A | B]` is an array of a union).
const RULES: &[Rule] = &[
    Rule { name: "any", apply: any },
    Rule { name: "literal", apply: literal },
    Rule { name: "link-reference-array", apply: link_reference_array },
    Rule { name: "runtime-expression", apply: runtime_expression },
    Rule { name: "reference", apply: reference },
    Rule { name: "bracket-array", apply: bracket_array },
    Rule { name: "map", apply: map },
    Rule { name: "union", apply: union },
];

struct TypeParser<'c> {
    config: &'c CompilerConfig,
    /// Whole cell text, for diagnostics.
    cell: String,
}

impl TypeParser<'_> {
    fn parse(&self, tokens: &[Token<'_>]) -> Result<TypeExpr, CompileError> {
        if tokens.is_empty() {
            return Err(self.unparsable());
        }
        for rule in RULES {
            if let Some(result) = (rule.apply)(self, tokens) {
                trace!(rule = rule.name, cell = %self.cell, "type rule matched");
                return result;
            }
        }
        Err(self.unparsable())
    }

    fn unparsable(&self) -> CompileError {
        CompileError::UnparsableTypeExpression { cell: self.cell.clone() }
    }

    fn malformed_map(&self) -> CompileError {
        CompileError::MalformedMapType { cell: self.cell.clone() }
    }
}

// --------------------------------- Rules ---------------------------------- //

fn any(p: &TypeParser<'_>, tokens: &[Token<'_>]) -> Outcome {
    match tokens {
        [Token::Text(t)] if *t == p.config.any_keyword => Some(Ok(TypeExpr::Any)),
        _ => None,
    }
}

fn literal(_: &TypeParser<'_>, tokens: &[Token<'_>]) -> Outcome {
    match tokens {
        [Token::Code(name)] => Some(Ok(TypeExpr::Literal((*name).to_owned()))),
        _ => None,
    }
}

// `[[Server Object](#serverObject)]` where the outer brackets were taken
// for a reference-style link.
fn link_reference_array(p: &TypeParser<'_>, tokens: &[Token<'_>]) -> Outcome {
    match tokens {
        [Token::LinkRef(node)] if !node.children.is_empty() => {
            Some(p.parse(&tokenize(&node.children)).map(TypeExpr::array))
        }
        _ => None,
    }
}

fn runtime_expression(p: &TypeParser<'_>, tokens: &[Token<'_>]) -> Outcome {
    match tokens {
        [Token::Link(node)] => match node.children.as_slice() {
            [only] if only.as_text() == Some(p.config.runtime_expression_placeholder.as_str()) => {
                Some(Ok(TypeExpr::RuntimeExpression))
            }
            _ => None,
        },
        _ => None,
    }
}

fn reference(p: &TypeParser<'_>, tokens: &[Token<'_>]) -> Outcome {
    match tokens {
        [Token::Link(node)] => Some(render_all(&node.children).map(|text| {
            TypeExpr::Reference(naming::type_name(&p.config.type_prefix, &text))
        })),
        _ => None,
    }
}

fn bracket_array(p: &TypeParser<'_>, tokens: &[Token<'_>]) -> Outcome {
    let last = tokens.len() - 1;
    if last == 0 || !tokens[0].is("[") || matching_close(tokens, 0) != Some(last) {
        return None;
    }
    Some(p.parse(&tokens[1..last]).map(TypeExpr::array))
}

fn map(p: &TypeParser<'_>, tokens: &[Token<'_>]) -> Outcome {
    let rest = match tokens {
        [Token::Text(t), rest @ ..] if t.starts_with(p.config.map_keyword.as_str()) => rest,
        _ => return None,
    };
    let body: Vec<Token<'_>> = match rest {
        [Token::LinkRef(node)] => tokenize(&node.children),
        [first, ..] if first.is("[") => match matching_close(rest, 0) {
            Some(close) if close == rest.len() - 1 => rest[1..close].to_vec(),
            // `Map[…] | …`: the map is only one union arm
            Some(_) => return None,
            None => return Some(Err(p.malformed_map())),
        },
        _ => return Some(Err(p.malformed_map())),
    };

    let (key, value) = match split_top_level(&body, ",").as_slice() {
        [key, rest @ ..] if !rest.is_empty() => (key.to_vec(), body[key.len() + 1..].to_vec()),
        // no separating comma: the key is the first token
        [only] if only.len() > 1 => (only[..1].to_vec(), only[1..].to_vec()),
        _ => return Some(Err(p.malformed_map())),
    };
    if key.is_empty() || value.is_empty() {
        return Some(Err(p.malformed_map()));
    }

    Some(p.parse(&key).and_then(|key| Ok(TypeExpr::map(key, p.parse(&value)?))))
}

fn union(p: &TypeParser<'_>, tokens: &[Token<'_>]) -> Outcome {
    let groups: Vec<_> = split_top_level(tokens, "|")
        .into_iter()
        .filter(|group| !group.is_empty())
        .collect();
    if groups.len() < 2 {
        return Some(Err(p.unparsable()));
    }
    let arms = groups
        .into_iter()
        .map(|group| p.parse(group))
        .collect::<Result<Vec<_>, _>>();
    Some(arms.map(TypeExpr::union))
}

// ------------------------------- Tests ------------------------------------ //
