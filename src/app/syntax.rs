use egui_code_editor::Syntax;
use std::collections::BTreeSet;

/// JSON highlighter: literals as keywords, no comments
pub fn json_syntax() -> Syntax {
    Syntax::new("JSON").with_keywords(BTreeSet::from(["true", "false", "null"]))
}

/// YAML highlighter
pub fn yaml_syntax() -> Syntax {
    Syntax::new("YAML")
        .with_comment("#")
        .with_keywords(BTreeSet::from([
            "true", "false", "null", "yes", "no", "on", "off",
        ]))
}

/// TOML highlighter
pub fn toml_syntax() -> Syntax {
    Syntax::new("TOML")
        .with_comment("#")
        .with_keywords(BTreeSet::from(["true", "false"]))
}

/// JavaScript / TypeScript highlighter
pub fn javascript_syntax() -> Syntax {
    Syntax::new("JavaScript")
        .with_comment("//")
        .with_comment_multiline(["/*", "*/"])
        .with_keywords(BTreeSet::from([
            "async", "await", "break", "case", "catch", "class", "const", "continue",
            "default", "delete", "do", "else", "export", "extends", "finally", "for",
            "function", "if", "import", "in", "instanceof", "interface", "let", "new",
            "of", "return", "switch", "throw", "try", "type", "typeof", "var", "while",
            "yield",
        ]))
        .with_types(BTreeSet::from([
            "Array", "Boolean", "Map", "Number", "Object", "Promise", "Set", "String",
            "any", "boolean", "number", "string", "void",
        ]))
        .with_special(BTreeSet::from([
            "false", "null", "this", "true", "undefined",
        ]))
}

/// Plain text: only `#` comments are coloured
pub fn plain_syntax() -> Syntax {
    Syntax::simple("#")
}

/// Pick a highlighter from the file extension of `path`.
pub fn syntax_for_path(path: &str) -> Syntax {
    let extension = path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "rs" => Syntax::rust(),
        "py" => Syntax::python(),
        "sh" | "bash" | "zsh" => Syntax::shell(),
        "sql" => Syntax::sql(),
        "lua" => Syntax::lua(),
        "json" => json_syntax(),
        "yaml" | "yml" => yaml_syntax(),
        "toml" => toml_syntax(),
        "js" | "jsx" | "ts" | "tsx" | "mjs" => javascript_syntax(),
        "go" | "c" | "h" | "cpp" | "java" => Syntax::simple("//"),
        _ => plain_syntax(),
    }
}
