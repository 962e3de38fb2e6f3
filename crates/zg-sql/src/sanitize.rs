//! Pre-parse cleanup of templated and vendor-specific SQL.
//!
//! Flow definitions embed NiFi expression language (`${VAR}`,
//! `${VAR:substring(0,2)}`) and bare `$VAR` variables inside table names.
//! These become `zgvar_<name>` identifiers so the text parses, and
//! [`restore_placeholders`] turns them back into `$<name>` afterwards.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Identifier prefix standing in for `$` while parsing.
pub const PLACEHOLDER_PREFIX: &str = "zgvar_";

/// Words that may legitimately precede a placeholder.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "from", "join", "into", "set", "update", "select", "insert", "on", "table", "by", "values",
    "inner", "outer", "left", "right", "cross", "full", "delete", "create", "alter", "drop",
    "where", "having", "group", "order", "limit", "union", "except", "intersect", "as", "merge",
    "upsert", "using", "and", "or", "not", "in", "between", "like", "is", "case", "when", "then",
    "else", "end",
];

/// Whether `word` is one of the clause keywords above (case-insensitive).
pub(crate) fn is_structural_keyword(word: &str) -> bool {
    STRUCTURAL_KEYWORDS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(word))
}

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid regex"))
        }
    };
}

static_regex!(block_comment_re, r"(?s)/\*.*?\*/");
static_regex!(line_comment_re, r"(?m)--.*$");
static_regex!(nifi_el_re, r"\$\{([^{}]+)\}");
static_regex!(brace_re, r"[{}]");
static_regex!(insert_statement_re, r"(?i)\$INSERT_STATEMENT");
static_regex!(upsert_re, r"(?i)\bUPSERT\s+INTO\b");
static_regex!(select_top_re, r"(?i)\bSELECT\s+TOP\s+\d+\b");
static_regex!(
    operator_var_re,
    r#"(?i)(\b\w+(?:\.\w+)*)\s+(zgvar_\w+)\s+(CAST\b|SELECT\b|\(|'|"|\d)"#
);
static_regex!(partition_re, r"(?i)\bPARTITION\s*\([^)]*\)");
static_regex!(compute_stats_re, r"(?i)\bCOMPUTE\s+STATS\b[^;]*;?");
static_regex!(invalidate_re, r"(?i)\bINVALIDATE\s+METADATA\b[^;]*;?");
static_regex!(spaced_ge_re, r">\s+=");
static_regex!(spaced_le_re, r"<\s+=");
static_regex!(spaced_ne_re, r"!\s+=");

/// `${ENTORNO:substring(0,2)}` → `zgvar_ENTORNO`
fn el_to_placeholder(caps: &Captures<'_>) -> String {
    let content = &caps[1];
    let var = content
        .split(|c: char| c == ':' || c.is_whitespace())
        .next()
        .unwrap_or("");
    let var: String = var
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{PLACEHOLDER_PREFIX}{var}")
}

/// `col zgvar_filtro CAST(...)` → `col = CAST(...)`
fn fix_operator_vars(sql: &str) -> String {
    operator_var_re()
        .replace_all(sql, |caps: &Captures<'_>| {
            let preceding = &caps[1];
            if is_structural_keyword(preceding) {
                caps[0].to_string()
            } else {
                format!("{} = {}", preceding, &caps[3])
            }
        })
        .into_owned()
}

/// Make a SQL fragment parseable.
///
/// Comments are stripped, NiFi EL and `$VAR` become placeholders (nested EL
/// is resolved inside-out), `UPSERT INTO` becomes `INSERT INTO`, `SELECT TOP n`
/// loses its `TOP n`, placeholders used as operators become `=`, Hive
/// `PARTITION (...)` and Impala `COMPUTE STATS` / `INVALIDATE METADATA` are
/// removed, and spaced comparison operators are collapsed.
pub fn sanitize(sql: &str) -> String {
    let mut s = block_comment_re().replace_all(sql, " ").into_owned();
    s = line_comment_re().replace_all(&s, "").into_owned();

    loop {
        let next = nifi_el_re().replace_all(&s, el_to_placeholder).into_owned();
        if next == s {
            break;
        }
        s = next;
    }
    s = brace_re().replace_all(&s, "").into_owned();

    s = insert_statement_re().replace_all(&s, " ").into_owned();
    s = s.replace('$', PLACEHOLDER_PREFIX);

    s = upsert_re().replace_all(&s, "INSERT INTO").into_owned();
    s = select_top_re().replace_all(&s, "SELECT").into_owned();
    s = fix_operator_vars(&s);
    s = partition_re().replace_all(&s, "").into_owned();
    s = compute_stats_re().replace_all(&s, "").into_owned();
    s = invalidate_re().replace_all(&s, "").into_owned();

    s = spaced_ge_re().replace_all(&s, ">=").into_owned();
    s = spaced_le_re().replace_all(&s, "<=").into_owned();
    spaced_ne_re().replace_all(&s, "!=").into_owned()
}

/// Turn placeholders back into `$name` form (input is expected lower-case).
pub fn restore_placeholders(name: &str) -> String {
    name.replace(PLACEHOLDER_PREFIX, "$")
}

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod tests;
