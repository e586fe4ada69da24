use convert_case::{Case, Casing};
use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("static regex"));

/// `"Field Name"` → `"fieldName"`.
pub fn camel_case(s: &str) -> String {
    s.to_case(Case::Camel)
}

/// `"Info Object"` → `"InfoObject"`.
pub fn pascal_case(s: &str) -> String {
    s.to_case(Case::Pascal)
}

/// Field-pattern cell → placeholder identifier: drop every non-word
/// character, then camel-case what is left (`"^x-"` → `"x"`).
pub fn pattern_identifier(s: &str) -> String {
    camel_case(&NON_WORD.replace_all(s, ""))
}

/// Heading or link text → descriptor name, with the configured prefix.
/// Text that already carries the prefix (a displayed `Reference`) keeps it once.
pub fn type_name(prefix: &str, text: &str) -> String {
    let name = pascal_case(text);
    if !prefix.is_empty() && name.starts_with(prefix) {
        name
    } else {
        format!("{prefix}{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_cases_column_headers() {
        assert_eq!(camel_case("Field Name"), "fieldName");
        assert_eq!(camel_case("Field Pattern"), "fieldPattern");
        assert_eq!(camel_case("Type"), "type");
        assert_eq!(camel_case("HTTP Status Code"), "httpStatusCode");
    }

    #[test]
    fn pascal_cases_object_names() {
        assert_eq!(pascal_case("Info Object"), "InfoObject");
        assert_eq!(pascal_case("InfoObject"), "InfoObject");
        assert_eq!(pascal_case("Path Item Object"), "PathItemObject");
        assert_eq!(pascal_case("server variable object"), "ServerVariableObject");
        assert_eq!(pascal_case("HTTP Status Code"), "HttpStatusCode");
    }

    #[test]
    fn pattern_identifiers_are_safe() {
        assert_eq!(pattern_identifier("^x-"), "x");
        assert_eq!(pattern_identifier("{expression}"), "expression");
        assert_eq!(pattern_identifier("/{path}"), "path");
        assert_eq!(pattern_identifier("HTTP Status Code"), "httpStatusCode");
    }

    #[test]
    fn type_names_take_prefix() {
        assert_eq!(type_name("", "Tag Object"), "TagObject");
        assert_eq!(type_name("Oas", "Tag Object"), "OasTagObject");
    }

    #[test]
    fn prefixed_names_are_not_prefixed_twice() {
        assert_eq!(type_name("Oas", "OasTagObject"), "OasTagObject");
        assert_eq!(type_name("Oas", &type_name("Oas", "Tag Object")), "OasTagObject");
    }
}
