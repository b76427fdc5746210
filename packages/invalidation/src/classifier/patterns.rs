use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::identifiers::{qualified_name_pattern, unquote_identifier, IDENTIFIER};

static TABLE_PATTERN: OnceLock<Regex> = OnceLock::new();
static ROW_LEVEL_SECURITY_TABLE_PATTERN: OnceLock<Regex> = OnceLock::new();
static ROW_LEVEL_SECURITY_MENTION_PATTERN: OnceLock<Regex> = OnceLock::new();
static ROW_LEVEL_SECURITY_CLAUSE_PATTERN: OnceLock<Regex> = OnceLock::new();
static VIEW_PATTERN: OnceLock<Regex> = OnceLock::new();
static ROUTINE_PATTERN: OnceLock<Regex> = OnceLock::new();
static TRIGGER_PATTERN: OnceLock<Regex> = OnceLock::new();
static POLICY_PATTERN: OnceLock<Regex> = OnceLock::new();
static INDEX_ON_TABLE_PATTERN: OnceLock<Regex> = OnceLock::new();
static INDEX_BY_NAME_PATTERN: OnceLock<Regex> = OnceLock::new();
static EXTENSION_PATTERN: OnceLock<Regex> = OnceLock::new();

const DDL_VERB: &str = r"(?:create|alter|drop)\s+";
const IF_EXISTS: &str = r"(?:if\s+(?:not\s+)?exists\s+)?";
const ONLY: &str = r"(?:only\s+)?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QualifiedName {
    pub schema: Option<String>,
    pub name: String,
}

/// An object that belongs to a table: trigger, policy or index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableScopedMatch {
    pub entity_name: Option<String>,
    pub table: QualifiedName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoutineKind {
    Function,
    Procedure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowLevelSecurityToggle {
    Enable,
    Disable,
    Force,
    NoForce,
}

fn compile(slot: &'static OnceLock<Regex>, build: impl FnOnce() -> String) -> &'static Regex {
    slot.get_or_init(|| {
        let pattern = build();
        Regex::new(&format!("(?is){pattern}")).expect("statement extraction pattern")
    })
}

fn table_pattern() -> &'static Regex {
    compile(&TABLE_PATTERN, || {
        format!(
            r"^{DDL_VERB}(?:or\s+replace\s+)?(?:(?:global|local)\s+)?(?:(?:temporary|temp|unlogged|foreign)\s+)?table\s+{IF_EXISTS}{ONLY}{}",
            qualified_name_pattern("table")
        )
    })
}

fn row_level_security_table_pattern() -> &'static Regex {
    compile(&ROW_LEVEL_SECURITY_TABLE_PATTERN, || {
        format!(
            r"^alter\s+table\s+(?:if\s+exists\s+)?{ONLY}{}",
            qualified_name_pattern("table")
        )
    })
}

fn row_level_security_mention_pattern() -> &'static Regex {
    compile(&ROW_LEVEL_SECURITY_MENTION_PATTERN, || {
        r"\brow\s+level\s+security\b".to_string()
    })
}

fn row_level_security_clause_pattern() -> &'static Regex {
    compile(&ROW_LEVEL_SECURITY_CLAUSE_PATTERN, || {
        r"\b(?P<toggle>enable|disable|no\s+force|force)\s+row\s+level\s+security\b".to_string()
    })
}

fn view_pattern() -> &'static Regex {
    compile(&VIEW_PATTERN, || {
        format!(
            r"^{DDL_VERB}(?:or\s+replace\s+)?(?:(?:temporary|temp)\s+)?(?:recursive\s+)?(?:(?P<materialized>materialized)\s+)?view\s+{IF_EXISTS}{}",
            qualified_name_pattern("view")
        )
    })
}

fn routine_pattern() -> &'static Regex {
    compile(&ROUTINE_PATTERN, || {
        format!(
            r"^{DDL_VERB}(?:or\s+replace\s+)?(?P<kind>function|procedure)\s+(?:if\s+exists\s+)?{}",
            qualified_name_pattern("routine")
        )
    })
}

fn trigger_pattern() -> &'static Regex {
    compile(&TRIGGER_PATTERN, || {
        format!(
            r"^{DDL_VERB}(?:or\s+replace\s+)?(?:constraint\s+)?trigger\s+(?:if\s+exists\s+)?(?P<entity>{IDENTIFIER})\s.*?\bon\s+{ONLY}{}",
            qualified_name_pattern("table")
        )
    })
}

fn policy_pattern() -> &'static Regex {
    compile(&POLICY_PATTERN, || {
        format!(
            r"^{DDL_VERB}policy\s+(?:if\s+exists\s+)?(?P<entity>{IDENTIFIER})\s+on\s+{ONLY}{}",
            qualified_name_pattern("table")
        )
    })
}

fn index_on_table_pattern() -> &'static Regex {
    compile(&INDEX_ON_TABLE_PATTERN, || {
        format!(
            r"^{DDL_VERB}(?:unique\s+)?index\s+(?:concurrently\s+)?{IF_EXISTS}(?:(?P<entity>{IDENTIFIER})\s+)?on\s+{ONLY}{}",
            qualified_name_pattern("table")
        )
    })
}

fn index_by_name_pattern() -> &'static Regex {
    compile(&INDEX_BY_NAME_PATTERN, || {
        format!(
            r"^(?:alter|drop)\s+index\s+(?:concurrently\s+)?(?:if\s+exists\s+)?{}",
            qualified_name_pattern("index")
        )
    })
}

fn extension_pattern() -> &'static Regex {
    compile(&EXTENSION_PATTERN, || {
        format!(
            r"^{DDL_VERB}extension\s+{IF_EXISTS}(?P<entity>{IDENTIFIER})(?:.*?\bschema\s+(?P<schema>{IDENTIFIER}))?"
        )
    })
}

fn identifier(captures: &Captures<'_>, group: &str) -> Option<String> {
    captures
        .name(group)
        .map(|found| unquote_identifier(found.as_str()))
}

fn qualified(captures: &Captures<'_>, prefix: &str) -> Option<QualifiedName> {
    Some(QualifiedName {
        schema: identifier(captures, &format!("{prefix}_schema")),
        name: identifier(captures, &format!("{prefix}_name"))?,
    })
}

fn table_scoped(pattern: &Regex, statement: &str) -> Option<TableScopedMatch> {
    let captures = pattern.captures(statement)?;
    Some(TableScopedMatch {
        entity_name: identifier(&captures, "entity"),
        table: qualified(&captures, "table")?,
    })
}

pub(crate) fn match_table(statement: &str) -> Option<QualifiedName> {
    let captures = table_pattern().captures(statement)?;
    qualified(&captures, "table")
}

pub(crate) fn match_row_level_security_table(statement: &str) -> Option<QualifiedName> {
    let captures = row_level_security_table_pattern().captures(statement)?;
    qualified(&captures, "table")
}

pub(crate) fn mentions_row_level_security(statement: &str) -> bool {
    row_level_security_mention_pattern().is_match(statement)
}

/// First RLS clause in the statement decides the toggle.
pub(crate) fn match_row_level_security_toggle(statement: &str) -> Option<RowLevelSecurityToggle> {
    let captures = row_level_security_clause_pattern().captures(statement)?;
    let toggle = captures.name("toggle")?.as_str().to_lowercase();
    let words = toggle.split_whitespace().collect::<Vec<_>>();
    match words.as_slice() {
        ["enable"] => Some(RowLevelSecurityToggle::Enable),
        ["disable"] => Some(RowLevelSecurityToggle::Disable),
        ["force"] => Some(RowLevelSecurityToggle::Force),
        ["no", "force"] => Some(RowLevelSecurityToggle::NoForce),
        _ => None,
    }
}

/// Returns the view name and whether `MATERIALIZED` modifies `VIEW`.
pub(crate) fn match_view(statement: &str) -> Option<(bool, QualifiedName)> {
    let captures = view_pattern().captures(statement)?;
    let materialized = captures.name("materialized").is_some();
    Some((materialized, qualified(&captures, "view")?))
}

pub(crate) fn match_routine(statement: &str) -> Option<(RoutineKind, QualifiedName)> {
    let captures = routine_pattern().captures(statement)?;
    let kind = if captures
        .name("kind")?
        .as_str()
        .eq_ignore_ascii_case("procedure")
    {
        RoutineKind::Procedure
    } else {
        RoutineKind::Function
    };
    Some((kind, qualified(&captures, "routine")?))
}

pub(crate) fn match_trigger(statement: &str) -> Option<TableScopedMatch> {
    table_scoped(trigger_pattern(), statement)
}

pub(crate) fn match_policy(statement: &str) -> Option<TableScopedMatch> {
    table_scoped(policy_pattern(), statement)
}

pub(crate) fn match_index_on_table(statement: &str) -> Option<TableScopedMatch> {
    table_scoped(index_on_table_pattern(), statement)
}

pub(crate) fn match_index_by_name(statement: &str) -> Option<QualifiedName> {
    let captures = index_by_name_pattern().captures(statement)?;
    qualified(&captures, "index")
}

pub(crate) fn match_extension(statement: &str) -> Option<QualifiedName> {
    let captures = extension_pattern().captures(statement)?;
    Some(QualifiedName {
        schema: identifier(&captures, "schema"),
        name: identifier(&captures, "entity")?,
    })
}
