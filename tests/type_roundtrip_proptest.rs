//! Property tests: a type written in its markdown shape reads back unchanged.

use proptest::prelude::*;
use schemadoc::compile::parse_type_cell;
use schemadoc::{CompilerConfig, TypeExpr};

fn config(prefix: &str, placeholder: &str) -> CompilerConfig {
    CompilerConfig {
        type_prefix: prefix.into(),
        runtime_expression_placeholder: placeholder.into(),
        ..CompilerConfig::default()
    }
}

fn config_strategy() -> impl Strategy<Value = CompilerConfig> {
    prop::sample::select(vec![
        CompilerConfig::default(),
        config("Oas", "{expression}"),
        config("Api", "{expr}"),
    ])
}

fn literal_strategy() -> impl Strategy<Value = TypeExpr> {
    "[a-z][a-z0-9]{0,7}".prop_map(TypeExpr::Literal)
}

/// Reference names as the compiler produces them: the prefix, then Pascal-cased words.
fn reference_strategy(prefix: String) -> impl Strategy<Value = TypeExpr> {
    prop::collection::vec("[A-Z][a-z]{1,5}", 1..4)
        .prop_map(move |words| TypeExpr::Reference(format!("{prefix}{}", words.concat())))
}

fn type_strategy(prefix: String) -> impl Strategy<Value = TypeExpr> {
    let leaf = prop_oneof![
        Just(TypeExpr::Any),
        Just(TypeExpr::RuntimeExpression),
        literal_strategy(),
        reference_strategy(prefix),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeExpr::array),
            (inner.clone(), inner.clone()).prop_map(|(key, value)| TypeExpr::map(key, value)),
            prop::collection::vec(inner, 2..4).prop_map(TypeExpr::union),
        ]
    })
}

fn config_and_type() -> impl Strategy<Value = (CompilerConfig, TypeExpr)> {
    config_strategy().prop_flat_map(|config| {
        let prefix = config.type_prefix.clone();
        (Just(config), type_strategy(prefix))
    })
}

fn read_back(src: &str, config: &CompilerConfig) -> Option<TypeExpr> {
    let root = schemadoc::ast::markdown::parse(src).unwrap();
    let cell = root.children.into_iter().next().map(|p| p.children).unwrap_or_default();
    parse_type_cell(&cell, config).unwrap()
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn markdown_shape_round_trips((config, ty) in config_and_type()) {
            let src = ty.markdown(&config).to_string();
            prop_assert_eq!(read_back(&src, &config), Some(ty), "source: {}", src);
        }

        #[test]
        fn nested_unions_are_spliced(arms in prop::collection::vec(literal_strategy(), 3..6)) {
            let (head, tail) = arms.split_at(2);
            let mut nested = vec![TypeExpr::union(head.to_vec())];
            nested.extend(tail.iter().cloned());
            prop_assert_eq!(TypeExpr::union(nested), TypeExpr::Union(arms.clone()));
        }
    }
}

#[test]
fn prefixed_reference_reads_back_once() {
    let config = config("Oas", "{expression}");
    let parsed = read_back("[Tag Object](#tagObject)", &config);
    assert_eq!(parsed, Some(TypeExpr::Reference("OasTagObject".into())));

    let shown = parsed.unwrap().markdown(&config).to_string();
    assert_eq!(shown, "[OasTagObject](#OasTagObject)");
    assert_eq!(read_back(&shown, &config), Some(TypeExpr::Reference("OasTagObject".into())));
}

#[test]
fn custom_placeholder_is_rendered() {
    let config = config("", "{expr}");
    let shown = TypeExpr::RuntimeExpression.markdown(&config).to_string();
    assert_eq!(shown, "[{expr}](#runtimeExpression)");
    assert_eq!(read_back(&shown, &config), Some(TypeExpr::RuntimeExpression));
}
