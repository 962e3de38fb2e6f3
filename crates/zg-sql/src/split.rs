//! Quote-aware statement splitting.

/// Split a SQL block on `;` outside of quotes and backticks.
///
/// Empty statements are dropped; each piece is trimmed.
pub fn split_statements(sql: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in sql.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                ';' => {
                    pieces.push(&sql[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    pieces.push(&sql[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple() {
        assert_eq!(
            split_statements("SELECT 1; SELECT 2;"),
            vec!["SELECT 1", "SELECT 2"]
        );
    }

    #[test]
    fn test_semicolon_in_string_kept() {
        assert_eq!(
            split_statements("SELECT ';' AS sep FROM t; DELETE FROM u"),
            vec!["SELECT ';' AS sep FROM t", "DELETE FROM u"]
        );
    }

    #[test]
    fn test_doubled_quote_escape() {
        assert_eq!(
            split_statements("SELECT 'it''s;' FROM t;SELECT 2"),
            vec!["SELECT 'it''s;' FROM t", "SELECT 2"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(split_statements(" ;; \n").is_empty());
    }
}
