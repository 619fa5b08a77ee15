use std::cell::RefCell;

use assert_matches::assert_matches;

use kira_group_compare::comparison::{
    ComparisonStore, GROUP_ORDER, SELECTED_GROUPS, default_selected_groups,
};
use kira_group_compare::domain::{
    ALTERED_GROUP_NAME, ComparisonSession, Group, OverlapStrategy, SessionGroup, SessionId,
    UNALTERED_GROUP_NAME,
};
use kira_group_compare::error::CompareError;
use kira_group_compare::params::{ParamStore, ParamStoreExt, ParamUpdate, QueryParams};
use kira_group_compare::reactive::Remote;
use kira_group_compare::session::SessionClient;

fn groups(names: &[&str]) -> Vec<Group> {
    names.iter().map(|name| Group::new(*name)).collect()
}

fn loaded_store(names: &[&str]) -> ComparisonStore<QueryParams> {
    let mut store = ComparisonStore::new(QueryParams::new());
    store.set_base_groups(Remote::Complete(groups(names)));
    store
}

fn ordered_names(store: &mut ComparisonStore<QueryParams>) -> Vec<String> {
    store
        .ordered_groups()
        .require("groups")
        .unwrap()
        .iter()
        .map(|group| group.name.clone())
        .collect()
}

#[test]
fn overlap_strategy_defaults_to_exclude() {
    let mut store = ComparisonStore::new(QueryParams::new());
    assert_eq!(store.overlap_strategy(), OverlapStrategy::Exclude);

    store.set_overlap_strategy(OverlapStrategy::Include).unwrap();
    assert_eq!(store.overlap_strategy(), OverlapStrategy::Include);
    assert_eq!(
        store.params().get("comparison_overlapStrategy").as_deref(),
        Some("Include")
    );
}

#[test]
fn overlap_strategy_outside_enum_is_returned_as_is() {
    let params = QueryParams::from_query_string("comparison_overlapStrategy=Weighted");
    let store = ComparisonStore::new(params);
    assert_eq!(
        store.overlap_strategy(),
        OverlapStrategy::Other("Weighted".to_string())
    );
}

#[test]
fn default_selection_is_altered_then_unaltered() {
    let store = ComparisonStore::new(QueryParams::new());
    assert_eq!(
        store.selected_group_names(),
        vec![ALTERED_GROUP_NAME.to_string(), UNALTERED_GROUP_NAME.to_string()]
    );
    assert!(store.is_group_selected(ALTERED_GROUP_NAME));
    assert!(!store.is_group_selected("Other"));
}

#[test]
fn malformed_selection_falls_back_to_default() {
    let mut params = QueryParams::new();
    params
        .update(ParamUpdate::new().set("comparison_selectedGroups", "[\"A\","))
        .unwrap();
    let store = ComparisonStore::new(params);
    assert_eq!(store.selected_group_names(), default_selected_groups());
}

#[test]
fn persisted_empty_selection_is_respected() {
    let mut store = ComparisonStore::new(QueryParams::new());
    store.deselect_all_groups().unwrap();
    assert!(store.selected_group_names().is_empty());
    assert_eq!(
        store.params().get("comparison_selectedGroups").as_deref(),
        Some("[]")
    );
}

#[test]
fn toggle_twice_restores_selection() {
    let mut store = ComparisonStore::new(QueryParams::new());
    let before = store.selected_group_names();

    store.toggle_group_selected("KRAS mutant").unwrap();
    assert_eq!(
        store.selected_group_names().last().map(String::as_str),
        Some("KRAS mutant")
    );
    store.toggle_group_selected("KRAS mutant").unwrap();
    assert_eq!(store.selected_group_names(), before);

    store.toggle_group_selected(ALTERED_GROUP_NAME).unwrap();
    store.toggle_group_selected(ALTERED_GROUP_NAME).unwrap();
    assert_eq!(
        store.selected_group_names(),
        vec![UNALTERED_GROUP_NAME.to_string(), ALTERED_GROUP_NAME.to_string()]
    );
}

#[test]
fn toggle_removes_a_single_duplicate() {
    let mut params = QueryParams::new();
    params
        .write(&SELECTED_GROUPS, &vec!["A".to_string(), "A".to_string()])
        .unwrap();
    let mut store = ComparisonStore::new(params);
    store.toggle_group_selected("A").unwrap();
    assert_eq!(store.selected_group_names(), vec!["A".to_string()]);
}

#[test]
fn select_all_selects_every_group() {
    let mut store = loaded_store(&["A", "B", "C"]);
    store.select_all_groups().unwrap();
    for name in ["A", "B", "C"] {
        assert!(store.is_group_selected(name));
    }
    assert!(!store.is_group_selected(ALTERED_GROUP_NAME));
}

#[test]
fn select_all_before_groups_load_is_not_ready() {
    let mut store = ComparisonStore::new(QueryParams::new());
    let err = store.select_all_groups().unwrap_err();
    assert_matches!(err, CompareError::NotReady(_));
    assert_eq!(store.params().get("comparison_selectedGroups"), None);
}

#[test]
fn upstream_failure_surfaces_on_select_all() {
    let mut store = ComparisonStore::new(QueryParams::new());
    store.set_base_groups(Remote::Error("timeout".to_string()));
    assert_matches!(
        store.select_all_groups(),
        Err(CompareError::UpstreamFailed { .. })
    );
}

#[test]
fn natural_order_without_persisted_order() {
    let mut store = loaded_store(&["C", "A", "B"]);
    assert_eq!(ordered_names(&mut store), vec!["C", "A", "B"]);
}

#[test]
fn persisted_order_is_stable_with_unknown_names_last() {
    let mut store = loaded_store(&["A", "B", "C", "D", "E"]);
    store
        .params_mut()
        .write(&GROUP_ORDER, &vec!["D".to_string(), "ghost".to_string(), "B".to_string()])
        .unwrap();
    assert_eq!(ordered_names(&mut store), vec!["D", "B", "A", "C", "E"]);
}

#[test]
fn move_seeds_order_from_natural_order() {
    let mut store = loaded_store(&["A", "B", "C", "D"]);
    store.update_group_order(0, 2).unwrap();
    assert_eq!(
        store.group_order(),
        Some(vec!["B".to_string(), "C".to_string(), "A".to_string(), "D".to_string()])
    );
    assert_eq!(ordered_names(&mut store), vec!["B", "C", "A", "D"]);
}

#[test]
fn move_applies_to_existing_order() {
    let mut store = loaded_store(&["A", "B", "C", "D"]);
    store.update_group_order(0, 2).unwrap();
    store.update_group_order(3, 0).unwrap();
    assert_eq!(ordered_names(&mut store), vec!["D", "B", "C", "A"]);
}

#[test]
fn malformed_order_falls_back_and_is_reseeded() {
    let params = QueryParams::from_query_string("comparison_groupOrder=[broken");
    let mut store = ComparisonStore::new(params);
    store.set_base_groups(Remote::Complete(groups(&["A", "B", "C"])));

    assert_eq!(store.group_order(), None);
    assert_eq!(ordered_names(&mut store), vec!["A", "B", "C"]);

    store.update_group_order(0, 1).unwrap();
    assert_eq!(
        store.params().get("comparison_groupOrder").as_deref(),
        Some(r#"["B","A","C"]"#)
    );
    assert_matches!(
        store.params().read(&GROUP_ORDER),
        Ok(Some(order)) if order == vec!["B".to_string(), "A".to_string(), "C".to_string()]
    );
    assert_eq!(ordered_names(&mut store), vec!["B", "A", "C"]);
}

#[test]
fn move_out_of_range_is_rejected() {
    let mut store = loaded_store(&["A", "B"]);
    assert_matches!(
        store.update_group_order(2, 0),
        Err(CompareError::OutOfRange { index: 2, len: 2 })
    );
    assert_matches!(
        store.update_group_order(0, 5),
        Err(CompareError::OutOfRange { index: 5, len: 2 })
    );
    assert_eq!(store.group_order(), None);
}

#[test]
fn move_before_groups_load_is_not_ready() {
    let mut store = ComparisonStore::new(QueryParams::new());
    assert_matches!(
        store.update_group_order(0, 1),
        Err(CompareError::NotReady(_))
    );
}

#[test]
fn ordered_groups_recompute_only_on_dependency_change() {
    let mut store = loaded_store(&["A", "B", "C"]);
    ordered_names(&mut store);
    ordered_names(&mut store);
    assert_eq!(store.ordered_group_computations(), 1);

    store.toggle_group_selected("A").unwrap();
    store.set_overlap_strategy(OverlapStrategy::Include).unwrap();
    ordered_names(&mut store);
    assert_eq!(store.ordered_group_computations(), 1);

    store.update_group_order(2, 0).unwrap();
    assert_eq!(ordered_names(&mut store), vec!["C", "A", "B"]);
    assert_eq!(store.ordered_group_computations(), 2);

    store.set_base_groups(Remote::Complete(groups(&["C", "B", "A", "D"])));
    assert_eq!(ordered_names(&mut store), vec!["C", "A", "B", "D"]);
    assert_eq!(store.ordered_group_computations(), 3);
}

#[test]
fn external_param_change_invalidates_order() {
    let mut store = loaded_store(&["A", "B"]);
    assert_eq!(ordered_names(&mut store), vec!["A", "B"]);

    store
        .params_mut()
        .update(ParamUpdate::new().set("comparison_groupOrder", "[\"B\",\"A\"]"))
        .unwrap();
    assert_eq!(ordered_names(&mut store), vec!["B", "A"]);

    store
        .params_mut()
        .update(ParamUpdate::new().remove("comparison_groupOrder"))
        .unwrap();
    assert_eq!(ordered_names(&mut store), vec!["A", "B"]);
}

#[test]
fn ordered_groups_return_to_pending() {
    let mut store = loaded_store(&["A"]);
    assert!(store.ordered_groups().is_complete());
    store.set_base_groups(Remote::Pending);
    assert!(store.ordered_groups().is_pending());
}

#[test]
fn deletable_only_for_user_created_groups() {
    let mut store = loaded_store(&["A", "Mine"]);
    assert!(!store.is_group_deletable(&Group::new("Mine")));

    store.set_session(Remote::Complete(ComparisonSession {
        id: None,
        groups: vec![SessionGroup {
            name: "Mine".to_string(),
            members: serde_json::Value::Null,
        }],
        origin: vec!["study_1".to_string()],
    }));
    assert!(store.is_group_deletable(&Group::new("Mine")));
    assert!(!store.is_group_deletable(&Group::new("A")));
}

struct RecordingClient {
    saved: RefCell<Vec<ComparisonSession>>,
}

impl SessionClient for RecordingClient {
    fn add_comparison_session(
        &self,
        session: &ComparisonSession,
    ) -> Result<SessionId, CompareError> {
        self.saved.borrow_mut().push(session.clone());
        Ok(SessionId::from("abc123".to_string()))
    }
}

struct FailingClient;

impl SessionClient for FailingClient {
    fn add_comparison_session(
        &self,
        _session: &ComparisonSession,
    ) -> Result<SessionId, CompareError> {
        Err(CompareError::Session("unavailable".to_string()))
    }
}

#[test]
fn save_session_records_created_id() {
    let mut store = ComparisonStore::new(QueryParams::new());
    let client = RecordingClient {
        saved: RefCell::new(Vec::new()),
    };
    let id = store
        .save_session(&client, &ComparisonSession::default())
        .unwrap();
    assert_eq!(id.as_str(), "abc123");
    assert_eq!(client.saved.borrow().len(), 1);
    assert_eq!(
        store.params().get("comparison_createdGroupsSessionId").as_deref(),
        Some("abc123")
    );
    assert_eq!(store.created_session_id(), Some(id));
}

#[test]
fn failed_session_save_leaves_params_untouched() {
    let mut store = ComparisonStore::new(QueryParams::new());
    assert_matches!(
        store.save_session(&FailingClient, &ComparisonSession::default()),
        Err(CompareError::Session(_))
    );
    assert!(store.params().is_empty());
}
