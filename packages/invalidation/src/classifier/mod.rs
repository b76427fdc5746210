//! Turns executed SQL into at most one [`InvalidationEvent`].
//!
//! Matching is keyword- and pattern-based on purpose: the database has
//! already accepted the statement, so all this needs is enough structure to
//! pick cache scopes. Anything unrecognised yields `None` ("nothing to
//! invalidate"), never an error.

mod head;
mod identifiers;
mod patterns;

use tracing::debug;

use crate::{Action, EntityType, InvalidationEvent};
use head::{statement_head, strip_leading_trivia};
use patterns::{QualifiedName, RoutineKind, RowLevelSecurityToggle, TableScopedMatch};

/// Entity keyword families, in the order they are tried.
const ENTITY_KEYWORDS: &[(EntityKeyword, &[&str])] = &[
    (EntityKeyword::Table, &[" table "]),
    (EntityKeyword::View, &[" view "]),
    (EntityKeyword::Routine, &[" function ", " procedure "]),
    (EntityKeyword::Trigger, &[" trigger "]),
    (EntityKeyword::Policy, &[" policy "]),
    (EntityKeyword::Index, &[" index "]),
    (EntityKeyword::Extension, &[" extension "]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKeyword {
    Table,
    View,
    Routine,
    Trigger,
    Policy,
    Index,
    Extension,
}

/// Classifies one executed statement. Pure; `tenant_id` is passed through.
pub fn classify(sql: &str, tenant_id: &str) -> Option<InvalidationEvent> {
    let statement = strip_leading_trivia(sql).trim();
    if statement.is_empty() {
        return None;
    }

    if patterns::mentions_row_level_security(statement) {
        return classify_row_level_security(statement, tenant_id);
    }

    let Some(action) = detect_action(statement) else {
        debug!(sql = statement, "statement is not schema-mutating; skipping invalidation");
        return None;
    };

    let head = statement_head(statement);
    let Some(keyword) = detect_entity_keyword(&head) else {
        debug!(sql = statement, "no recognised entity keyword; skipping invalidation");
        return None;
    };

    let event = match keyword {
        EntityKeyword::Table => classify_table(statement, &head, tenant_id, action),
        EntityKeyword::View => classify_view(statement, tenant_id, action),
        EntityKeyword::Routine => classify_routine(statement, tenant_id, action),
        EntityKeyword::Trigger => classify_table_scoped(
            patterns::match_trigger(statement),
            EntityType::Trigger,
            tenant_id,
            action,
        ),
        EntityKeyword::Policy => classify_table_scoped(
            patterns::match_policy(statement),
            EntityType::Policy,
            tenant_id,
            action,
        ),
        EntityKeyword::Index => classify_index(statement, tenant_id, action),
        EntityKeyword::Extension => classify_extension(statement, tenant_id, action),
    };

    if event.is_none() {
        debug!(
            sql = statement,
            keyword = ?keyword,
            "entity keyword matched but extraction failed; discarding event"
        );
    }
    event
}

fn detect_action(statement: &str) -> Option<Action> {
    let lowered = statement.to_lowercase();
    if lowered.starts_with("create") {
        Some(Action::Create)
    } else if lowered.starts_with("alter") {
        Some(Action::Alter)
    } else if lowered.starts_with("drop") {
        Some(Action::Drop)
    } else if lowered.contains("enable") {
        Some(Action::Enable)
    } else if lowered.contains("disable") {
        Some(Action::Disable)
    } else {
        None
    }
}

fn detect_entity_keyword(head: &str) -> Option<EntityKeyword> {
    ENTITY_KEYWORDS
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| head.contains(needle)))
        .map(|(keyword, _)| *keyword)
}

fn classify_row_level_security(statement: &str, tenant_id: &str) -> Option<InvalidationEvent> {
    let table = patterns::match_row_level_security_table(statement)?;
    let action = match patterns::match_row_level_security_toggle(statement)? {
        RowLevelSecurityToggle::Enable => Action::Enable,
        RowLevelSecurityToggle::Disable => Action::Disable,
        RowLevelSecurityToggle::Force | RowLevelSecurityToggle::NoForce => Action::Alter,
    };
    Some(table_event(tenant_id, EntityType::Table, action, table))
}

fn classify_table(
    statement: &str,
    head: &str,
    tenant_id: &str,
    action: Action,
) -> Option<InvalidationEvent> {
    let table = patterns::match_table(statement)?;
    let entity_type = if head.contains(" foreign table ") {
        EntityType::ForeignTable
    } else {
        EntityType::Table
    };
    Some(table_event(tenant_id, entity_type, action, table))
}

fn classify_view(statement: &str, tenant_id: &str, action: Action) -> Option<InvalidationEvent> {
    let (materialized, view) = patterns::match_view(statement)?;
    let entity_type = if materialized {
        EntityType::MaterializedView
    } else {
        EntityType::View
    };
    Some(named_event(tenant_id, entity_type, action, view))
}

fn classify_routine(statement: &str, tenant_id: &str, action: Action) -> Option<InvalidationEvent> {
    let (kind, routine) = patterns::match_routine(statement)?;
    let entity_type = match kind {
        RoutineKind::Function => EntityType::Function,
        RoutineKind::Procedure => EntityType::Procedure,
    };
    Some(named_event(tenant_id, entity_type, action, routine))
}

fn classify_table_scoped(
    found: Option<TableScopedMatch>,
    entity_type: EntityType,
    tenant_id: &str,
    action: Action,
) -> Option<InvalidationEvent> {
    let found = found?;
    let entity_name = found.entity_name?;
    let mut event = InvalidationEvent::new(tenant_id, entity_type, action)
        .with_table(found.table.name)
        .with_entity_name(entity_name);
    event.schema = found.table.schema;
    Some(event)
}

fn classify_index(statement: &str, tenant_id: &str, action: Action) -> Option<InvalidationEvent> {
    if let Some(found) = patterns::match_index_on_table(statement) {
        return classify_table_scoped(Some(found), EntityType::Index, tenant_id, action);
    }
    // CREATE INDEX always names its table; only ALTER/DROP may omit it.
    if action == Action::Create {
        return None;
    }
    let index = patterns::match_index_by_name(statement)?;
    Some(named_event(tenant_id, EntityType::Index, action, index))
}

fn classify_extension(
    statement: &str,
    tenant_id: &str,
    action: Action,
) -> Option<InvalidationEvent> {
    let extension = patterns::match_extension(statement)?;
    Some(named_event(tenant_id, EntityType::Extension, action, extension))
}

fn table_event(
    tenant_id: &str,
    entity_type: EntityType,
    action: Action,
    table: QualifiedName,
) -> InvalidationEvent {
    let mut event = InvalidationEvent::new(tenant_id, entity_type, action)
        .with_table(table.name.clone())
        .with_entity_name(table.name);
    event.schema = table.schema;
    event
}

fn named_event(
    tenant_id: &str,
    entity_type: EntityType,
    action: Action,
    name: QualifiedName,
) -> InvalidationEvent {
    let mut event =
        InvalidationEvent::new(tenant_id, entity_type, action).with_entity_name(name.name);
    event.schema = name.schema;
    event
}
