//! Best-effort TypeScript to JavaScript stripping.
//!
//! Component sources are authored in TypeScript. For projects configured for
//! plain JavaScript the materializer runs them through `strip_types`, a
//! line-oriented set of regex rewrites that removes the type syntax the
//! registry's components actually use:
//!
//! - `import type …` / `export type { … }` statements and `type` specifiers
//!   inside mixed imports
//! - `interface` blocks and `type X = …` aliases (single- or multi-line)
//! - annotations on variables, function and arrow parameters, and return types
//! - generic arguments on React hooks, `createContext` and `forwardRef`
//! - `as` casts, `as const`, `satisfies` and non-null assertions
//!
//! This is not a parser. Nested generics beyond two levels, multi-line
//! parameter lists (other than a closing `}: Props)`), object-literal
//! lookalikes and type syntax inside strings are outside what it handles and
//! may leave artifacts or be altered.

use std::sync::OnceLock;

use regex::Regex;

/// One type "atom": a dotted name with optional (two-level) generics and
/// array suffixes, or a string literal.
const ATOM: &str = r#"(?:[A-Za-z_$][\w$.]*(?:<[^<>]*(?:<[^<>]*>[^<>]*)*>)?(?:\[\])*|'[^']*'|"[^"]*")"#;

struct Patterns {
    type_import: Regex,
    type_export: Regex,
    interface: Regex,
    type_alias: Regex,
    statement_end: Regex,
    spec_leading: Regex,
    spec_trailing: Regex,
    spec_only: Regex,
    empty_named_import: Regex,
    empty_braces_after_default: Regex,
    generic_call: Regex,
    function_generics: Regex,
    variable_annotation: Regex,
    variable_declaration: Regex,
    return_type: Regex,
    param: Regex,
    destructure_close: Regex,
    as_cast: Regex,
    satisfies: Regex,
    non_null: Regex,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("type-stripping patterns are static and valid")
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let ty = format!(r"{ATOM}(?:\s*\|\s*{ATOM})*");
        Patterns {
            type_import: compile(r"^\s*import\s+type\s"),
            type_export: compile(r"^\s*export\s+type\s*\{"),
            interface: compile(
                r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?interface\s+[\w$]+",
            ),
            type_alias: compile(
                r"^\s*(?:export\s+)?(?:declare\s+)?type\s+[\w$]+\s*(?:<[^>]*>)?\s*=",
            ),
            statement_end: compile(r#"(?:from\s*['"][^'"]*['"]\s*;?|;)\s*$"#),
            spec_leading: compile(r"\btype\s+[\w$]+(?:\s+as\s+[\w$]+)?\s*,\s*"),
            spec_trailing: compile(r"\s*,\s*type\s+[\w$]+(?:\s+as\s+[\w$]+)?"),
            spec_only: compile(r"\{\s*type\s+[\w$]+(?:\s+as\s+[\w$]+)?\s*\}"),
            empty_named_import: compile(
                r#"^\s*import\s*\{\s*\}\s*from\s*['"][^'"]*['"]\s*;?\s*$"#,
            ),
            empty_braces_after_default: compile(r",\s*\{\s*\}\s*from"),
            generic_call: compile(
                r"\b((?:React\.)?(?:useState|useRef|useReducer|useContext|useCallback|useMemo|createContext|forwardRef))<[^()]*?>\(",
            ),
            function_generics: compile(r"\bfunction\s+([\w$]+)\s*<[^()]*?>\s*\("),
            variable_annotation: compile(
                r"\b(const|let|var)\s+([\w$]+)\s*:\s*(?:=>|[^=;])+?\s*=([^>=])",
            ),
            variable_declaration: compile(r"\b(let|var)\s+([\w$]+)\s*:\s*[^=;]+;"),
            return_type: compile(&format!(r"\)\s*:\s*{ty}\s*(\{{|=>)")),
            param: compile(&format!(r"([\w$]+|\}}|\])(\??)\s*:\s*{ty}(\s*[,)=])")),
            destructure_close: compile(&format!(r"^(\s*\}})\s*:\s*{ty}(\s*\))")),
            as_cast: compile(
                r"\s+as\s+(?:const\b|unknown\b|any\b|string\b|number\b|boolean\b|[A-Z][\w$.]*(?:<[^<>]*>)?(?:\[\])*)",
            ),
            satisfies: compile(r"\s+satisfies\s+[A-Z][\w$.]*(?:<[^<>]*>)?"),
            non_null: compile(r"([\w$)\]])!([.)\];,])"),
        }
    })
}

/// Strip TypeScript syntax from `source`, producing JavaScript.
pub fn strip_types(source: &str) -> String {
    let p = patterns();
    let lines: Vec<&str> = source.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim_start();

        if p.type_import.is_match(line) || p.type_export.is_match(line) {
            i = skip_statement(&lines, i);
            continue;
        }
        if p.interface.is_match(line) || p.type_alias.is_match(line) {
            i = skip_declaration(&lines, i);
            continue;
        }
        if trimmed.starts_with("import ") || trimmed.starts_with("import{") {
            if let Some(cleaned) = strip_import_specifiers(line) {
                out.push(cleaned);
            }
        } else if trimmed.starts_with("export {") || trimmed.starts_with("export{") {
            out.push(line.to_string());
        } else {
            out.push(strip_annotations(line));
        }
        i += 1;
    }

    let mut result = out.join("\n");
    if source.ends_with('\n') {
        result.push('\n');
    }
    result
}

/// Skip an import/export statement that may span lines. Returns the index of
/// the first line after it.
fn skip_statement(lines: &[&str], start: usize) -> usize {
    let p = patterns();
    let mut depth = 0i32;
    for (offset, line) in lines[start..].iter().enumerate() {
        depth += brace_delta(line);
        if p.statement_end.is_match(line) || (depth <= 0 && line.contains('}')) {
            return start + offset + 1;
        }
    }
    lines.len()
}

/// Skip an `interface` or `type` declaration. Returns the index of the first
/// line after it.
fn skip_declaration(lines: &[&str], start: usize) -> usize {
    let p = patterns();
    let mut depth = 0i32;
    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        depth += brace_delta(line);
        i += 1;
        if depth > 0 {
            continue;
        }

        let next_continues = lines
            .get(i)
            .map(|next| {
                let next = next.trim_start();
                next.starts_with('|') || next.starts_with('&')
            })
            .unwrap_or(false);
        if next_continues {
            continue;
        }

        let end = line.trim_end();
        if end.ends_with(';') || end.ends_with('}') {
            return i;
        }
        if end.ends_with('=') || end.ends_with('|') || end.ends_with('&') {
            continue;
        }
        // `interface Props` with the brace on the next line
        if p.interface.is_match(line) && !line.contains('{') {
            continue;
        }
        return i;
    }
    i
}

fn brace_delta(line: &str) -> i32 {
    line.chars().fold(0, |acc, c| match c {
        '{' | '(' => acc + 1,
        '}' | ')' => acc - 1,
        _ => acc,
    })
}

/// Drop `type` specifiers from a value import. Returns `None` when nothing
/// is left to import.
fn strip_import_specifiers(line: &str) -> Option<String> {
    let p = patterns();
    let s = p.spec_leading.replace_all(line, "");
    let s = p.spec_trailing.replace_all(&s, "");
    let s = p.spec_only.replace_all(&s, "{}");
    if p.empty_named_import.is_match(&s) {
        return None;
    }
    Some(p.empty_braces_after_default.replace(&s, " from").into_owned())
}

fn strip_annotations(line: &str) -> String {
    let p = patterns();
    let s = p.generic_call.replace_all(line, "${1}(");
    let s = p.function_generics.replace_all(&s, "function ${1}(");
    let s = p.variable_annotation.replace_all(&s, "${1} ${2} =${3}");
    let s = p.variable_declaration.replace_all(&s, "${1} ${2};");
    let s = p.return_type.replace_all(&s, ") ${1}");
    let s = p.destructure_close.replace_all(&s, "${1}${2}");
    let s = strip_parameters(&s);
    let s = p.as_cast.replace_all(&s, "");
    let s = p.satisfies.replace_all(&s, "");
    p.non_null.replace_all(&s, "${1}${2}").into_owned()
}

/// Remove annotations inside the parameter list of the first function
/// declaration or arrow function on the line.
fn strip_parameters(line: &str) -> String {
    let span = if let Some(arrow) = line.find("=>") {
        line[..arrow]
            .rfind(')')
            .and_then(|close| matching_open(line, close).map(|open| (open, close)))
    } else if let Some(func) = line.find("function") {
        line[func..]
            .find('(')
            .map(|rel| func + rel)
            .and_then(|open| matching_close(line, open).map(|close| (open, close)))
    } else {
        None
    };

    match span {
        Some((open, close)) => {
            let params = patterns()
                .param
                .replace_all(&line[open..=close], "${1}${3}");
            format!("{}{}{}", &line[..open], params, &line[close + 1..])
        }
        None => line.to_string(),
    }
}

fn matching_open(s: &str, close: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    for i in (0..=close).rev() {
        match bytes[i] {
            b')' => depth += 1,
            b'(' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn matching_close(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
