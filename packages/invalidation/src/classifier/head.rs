use regex::Regex;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer};
use std::sync::OnceLock;

static LEADING_TRIVIA: OnceLock<Regex> = OnceLock::new();

/// Words that end the part of a statement naming the object kind.
const HEAD_TERMINATORS: &[&str] = &["as", "on", "returns"];
const QUOTED_WORD_PLACEHOLDER: &str = "\"";

/// Drops whitespace and comments preceding the first keyword.
pub(crate) fn strip_leading_trivia(sql: &str) -> &str {
    let trivia = LEADING_TRIVIA.get_or_init(|| {
        Regex::new(r"^(?:\s+|--[^\n]*(?:\n|$)|(?s:/\*.*?\*/))*")
            .expect("leading trivia pattern")
    });
    match trivia.find(sql) {
        Some(found) => &sql[found.end()..],
        None => sql,
    }
}

/// Lowercase, space-padded words of the statement head.
///
/// The head runs up to the first `(`, `;`, `AS`, `ON` or `RETURNS`, so
/// keywords in column lists, bodies and `ON` targets are never seen.
/// Quoted identifiers are replaced by a placeholder and can't match a keyword.
/// Keyword checks use `" table "`-style needles against this string.
pub(crate) fn statement_head(statement: &str) -> String {
    let words = match tokenized_head(statement) {
        Some(words) => words,
        None => whitespace_head(statement),
    };
    format!(" {} ", words.join(" "))
}

fn tokenized_head(statement: &str) -> Option<Vec<String>> {
    let dialect = PostgreSqlDialect {};
    let tokens = Tokenizer::new(&dialect, statement).tokenize().ok()?;
    let mut words = Vec::new();
    for token in tokens {
        match token {
            Token::Word(word) if word.quote_style.is_some() => {
                words.push(QUOTED_WORD_PLACEHOLDER.to_string());
            }
            Token::Word(word) => {
                let lowered = word.value.to_lowercase();
                if HEAD_TERMINATORS.contains(&lowered.as_str()) {
                    break;
                }
                words.push(lowered);
            }
            Token::LParen | Token::SemiColon | Token::EOF => break,
            _ => {}
        }
    }
    Some(words)
}

/// Used when the tokenizer rejects the text, e.g. an unterminated literal.
fn whitespace_head(statement: &str) -> Vec<String> {
    let lowered = statement.to_lowercase();
    let cut = lowered.find(['(', ';']).unwrap_or(lowered.len());
    lowered[..cut]
        .split_whitespace()
        .take_while(|word| !HEAD_TERMINATORS.contains(word))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{statement_head, strip_leading_trivia};

    #[test]
    fn strips_line_and_block_comments() {
        let sql = "  -- add users\n/* owner: ops */\n  CREATE TABLE users (id int)";
        assert_eq!(strip_leading_trivia(sql), "CREATE TABLE users (id int)");
    }

    #[test]
    fn leaves_statement_without_trivia_untouched() {
        assert_eq!(strip_leading_trivia("DROP VIEW v"), "DROP VIEW v");
    }

    #[test]
    fn head_stops_before_column_list() {
        assert_eq!(
            statement_head("CREATE TABLE Users (id int, trigger_name text)"),
            " create table users "
        );
    }

    #[test]
    fn head_stops_before_function_signature_and_body() {
        let head = statement_head(
            "CREATE OR REPLACE FUNCTION public.f() RETURNS TABLE (id int) AS $$ select 1 $$",
        );
        assert!(head.contains(" function "));
        assert!(!head.contains(" table "));
    }

    #[test]
    fn head_stops_at_on_clause() {
        let head = statement_head(
            "CREATE TRIGGER t AFTER INSERT ON users FOR EACH ROW EXECUTE FUNCTION f()",
        );
        assert_eq!(head, " create trigger t after insert ");
    }

    #[test]
    fn quoted_keywords_are_not_keywords() {
        let head = statement_head("CREATE POLICY \"table\" ON t USING (true)");
        assert!(!head.contains(" table "));
        assert!(head.contains(" policy "));
    }

    #[test]
    fn unterminated_literal_falls_back_to_whitespace_split() {
        let head = statement_head("CREATE TABLE users'; DROP TABLE users; -- (id INT)");
        assert!(head.starts_with(" create table users'"));
    }
}
