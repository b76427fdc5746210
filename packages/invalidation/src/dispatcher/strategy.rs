use crate::keys;
use crate::{CacheKey, EntityType, InvalidateOptions, InvalidationEvent};

/// One key range to drop from the cache store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidationScope {
    pub key: CacheKey,
    pub options: InvalidateOptions,
}

impl InvalidationScope {
    pub fn exact(key: CacheKey) -> Self {
        Self {
            key,
            options: InvalidateOptions::exact(),
        }
    }

    pub fn prefix(key: CacheKey) -> Self {
        Self {
            key,
            options: InvalidateOptions::prefix(),
        }
    }
}

#[derive(Default)]
struct ScopePlan {
    scopes: Vec<InvalidationScope>,
}

impl ScopePlan {
    fn push(&mut self, scope: InvalidationScope) {
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
    }
}

/// Ordered, de-duplicated scopes for one event: primary scopes first, then
/// table cascades, then the entity-type summary for relation kinds.
pub(crate) fn plan_scopes(event: &InvalidationEvent, default_schema: &str) -> Vec<InvalidationScope> {
    let tenant = event.tenant_id.as_str();
    let schema = event.schema_or(default_schema);
    let table = event.table.as_deref();
    let mut plan = ScopePlan::default();

    match event.entity_type {
        EntityType::Table => {
            plan.push(InvalidationScope::exact(keys::table_list(tenant, schema, true)));
            plan.push(InvalidationScope::exact(keys::table_list(tenant, schema, false)));
            if let Some(table) = table {
                plan.push(InvalidationScope::prefix(keys::table_detail(tenant, schema, table)));
            }
        }
        EntityType::View => {
            plan.push(InvalidationScope::prefix(keys::view_list(
                tenant,
                event.schema.as_deref(),
            )));
        }
        EntityType::MaterializedView => {
            plan.push(InvalidationScope::prefix(keys::materialized_view_list(
                tenant,
                event.schema.as_deref(),
            )));
        }
        EntityType::ForeignTable => {
            plan.push(InvalidationScope::prefix(keys::foreign_table_list(
                tenant,
                event.schema.as_deref(),
            )));
        }
        EntityType::Policy => {
            plan.push(InvalidationScope::prefix(keys::policy_list(tenant, schema)));
            if let Some(table) = table {
                plan.push(InvalidationScope::prefix(keys::table_detail(tenant, schema, table)));
            }
        }
        EntityType::Function | EntityType::Procedure => {
            plan.push(InvalidationScope::prefix(keys::function_list(tenant)));
        }
        EntityType::Trigger => {
            plan.push(InvalidationScope::prefix(keys::trigger_list(tenant)));
            if let Some(table) = table {
                plan.push(InvalidationScope::prefix(keys::table_triggers(tenant, schema, table)));
            }
        }
        EntityType::Index => {
            plan.push(InvalidationScope::prefix(keys::index_list(tenant, schema)));
            if let Some(table) = table {
                plan.push(InvalidationScope::prefix(keys::table_indexes(tenant, schema, table)));
            }
        }
        EntityType::Extension => {
            plan.push(InvalidationScope::prefix(keys::extension_list(tenant)));
        }
    }

    if event.entity_type.appears_in_summary() {
        plan.push(InvalidationScope::prefix(keys::entity_type_summary(tenant)));
    }

    plan.scopes
}

#[cfg(test)]
mod tests {
    use super::{plan_scopes, InvalidationScope};
    use crate::keys;
    use crate::{Action, EntityType, InvalidationEvent};

    fn event(entity_type: EntityType) -> InvalidationEvent {
        InvalidationEvent::new("t", entity_type, Action::Alter)
    }

    #[test]
    fn table_plan_covers_both_list_variants_detail_and_summary() {
        let scopes = plan_scopes(&event(EntityType::Table).with_table("users"), "public");
        assert_eq!(
            scopes,
            vec![
                InvalidationScope::exact(keys::table_list("t", "public", true)),
                InvalidationScope::exact(keys::table_list("t", "public", false)),
                InvalidationScope::prefix(keys::table_detail("t", "public", "users")),
                InvalidationScope::prefix(keys::entity_type_summary("t")),
            ]
        );
    }

    #[test]
    fn table_plan_without_table_skips_detail() {
        let scopes = plan_scopes(&event(EntityType::Table), "public");
        assert_eq!(scopes.len(), 3);
    }

    #[test]
    fn view_plan_is_tenant_wide_without_schema() {
        assert_eq!(
            plan_scopes(&event(EntityType::View), "public"),
            vec![
                InvalidationScope::prefix(keys::view_list("t", None)),
                InvalidationScope::prefix(keys::entity_type_summary("t")),
            ]
        );
        assert_eq!(
            plan_scopes(&event(EntityType::MaterializedView).with_schema("reporting"), "public")[0],
            InvalidationScope::prefix(keys::materialized_view_list("t", Some("reporting")))
        );
    }

    #[test]
    fn policy_plan_uses_default_schema_and_owning_table() {
        let scopes = plan_scopes(&event(EntityType::Policy).with_table("documents"), "app");
        assert_eq!(
            scopes,
            vec![
                InvalidationScope::prefix(keys::policy_list("t", "app")),
                InvalidationScope::prefix(keys::table_detail("t", "app", "documents")),
            ]
        );
    }

    #[test]
    fn trigger_plan_adds_table_sub_scope_only_with_table() {
        let with_table = plan_scopes(&event(EntityType::Trigger).with_table("users"), "public");
        assert_eq!(
            with_table,
            vec![
                InvalidationScope::prefix(keys::trigger_list("t")),
                InvalidationScope::prefix(keys::table_triggers("t", "public", "users")),
            ]
        );
        let without_table = plan_scopes(&event(EntityType::Trigger), "public");
        assert_eq!(without_table, vec![InvalidationScope::prefix(keys::trigger_list("t"))]);
    }

    #[test]
    fn routine_and_extension_plans_are_tenant_wide() {
        for entity_type in [EntityType::Function, EntityType::Procedure] {
            assert_eq!(
                plan_scopes(&event(entity_type).with_schema("app"), "public"),
                vec![InvalidationScope::prefix(keys::function_list("t"))]
            );
        }
        assert_eq!(
            plan_scopes(&event(EntityType::Extension), "public"),
            vec![InvalidationScope::prefix(keys::extension_list("t"))]
        );
    }

    #[test]
    fn only_relation_kinds_cascade_to_summary() {
        let summary = InvalidationScope::prefix(keys::entity_type_summary("t"));
        for entity_type in EntityType::all() {
            let scopes = plan_scopes(&event(*entity_type).with_table("x"), "public");
            assert_eq!(
                scopes.contains(&summary),
                entity_type.appears_in_summary(),
                "{}",
                entity_type.as_str()
            );
        }
    }

    #[test]
    fn plans_never_repeat_a_scope() {
        for entity_type in EntityType::all() {
            let scopes = plan_scopes(&event(*entity_type).with_table("x"), "public");
            for (position, scope) in scopes.iter().enumerate() {
                assert!(!scopes[position + 1..].contains(scope));
            }
        }
    }
}
