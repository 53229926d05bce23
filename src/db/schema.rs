use sqlx::SqlitePool;

pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");
pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Code,
    Text(char),
    LineComment,
}

/// Splits a script on top-level `;`. Quoted text and identifiers are kept
/// intact (SQL doubles a quote to escape it, so toggling handles `''`), and
/// `--` comments are dropped up to the end of their line.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = Lexeme::Code;
    let mut chars = sql.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            Lexeme::LineComment => {
                if ch == '\n' {
                    state = Lexeme::Code;
                    current.push(ch);
                }
                continue;
            }
            Lexeme::Text(quote) => {
                if ch == quote {
                    state = Lexeme::Code;
                }
            }
            Lexeme::Code => match ch {
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    state = Lexeme::LineComment;
                    continue;
                }
                '\'' | '"' => state = Lexeme::Text(ch),
                ';' => {
                    push_statement(&mut statements, &current);
                    current.clear();
                    continue;
                }
                _ => {}
            },
        }
        current.push(ch);
    }

    push_statement(&mut statements, &current);
    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}

pub async fn schema_version(pool: &SqlitePool) -> Option<String> {
    sqlx::query_scalar(r#"SELECT "value" FROM "_db_metadata" WHERE "key" = 'schema_version'"#)
        .fetch_optional(pool)
        .await
        .unwrap_or(None)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    if schema_version(pool).await.is_some() {
        return Ok(false);
    }

    for sql in split_sql_statements(SCHEMA_SQL) {
        sqlx::query(&sql).execute(pool).await?;
    }

    sqlx::query(r#"INSERT OR REPLACE INTO "_db_metadata" ("key", "value") VALUES ('schema_version', ?)"#)
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_quotes() {
        let sql = r#"INSERT INTO "t" ("v") VALUES ('a;b'), ('it''s; fine'); SELECT "x;y";"#;
        let statements = split_sql_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].ends_with("('it''s; fine')"));
        assert_eq!(statements[1], r#"SELECT "x;y""#);
    }

    #[test]
    fn test_split_drops_line_comments() {
        let sql = "-- header; not a statement\nSELECT 1; -- trailing;\n-- only a comment\n";
        assert_eq!(split_sql_statements(sql), vec!["SELECT 1".to_string()]);

        let quoted = "SELECT '--kept' AS v; SELECT 2 - -1;";
        assert_eq!(
            split_sql_statements(quoted),
            vec!["SELECT '--kept' AS v".to_string(), "SELECT 2 - -1".to_string()]
        );
    }

    #[test]
    fn test_schema_splits_into_tables() {
        let statements = split_sql_statements(SCHEMA_SQL);
        assert!(statements.iter().all(|s| !s.contains("--")));
        let tables = statements
            .iter()
            .filter(|s| s.starts_with("CREATE TABLE"))
            .count();
        assert_eq!(tables, 5);
    }
}
