//! Selection and display order of comparison groups.
//!
//! All user choices live in a [`ParamStore`] so they survive reloads and can
//! be shared as a link. The group list itself comes from upstream providers
//! and is never modified here, only ordered, selected and deselected.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{
    ALTERED_GROUP_NAME, ComparisonSession, Group, OverlapStrategy, SessionId,
    UNALTERED_GROUP_NAME,
};
use crate::error::CompareError;
use crate::params::{Json, ParamKey, ParamStore, ParamStoreExt, Text};
use crate::reactive::{CellId, DependencyGraph, Memo, Remote};
use crate::session::SessionClient;

pub const OVERLAP_STRATEGY: ParamKey<Text<OverlapStrategy>> =
    ParamKey::new("comparison_overlapStrategy");
pub const SELECTED_GROUPS: ParamKey<Json<Vec<String>>> =
    ParamKey::new("comparison_selectedGroups");
pub const GROUP_ORDER: ParamKey<Json<Vec<String>>> = ParamKey::new("comparison_groupOrder");
pub const CREATED_SESSION_ID: ParamKey<Text<SessionId>> =
    ParamKey::new("comparison_createdGroupsSessionId");

const BASE_GROUPS: CellId = CellId::new("base_groups");
const SESSION: CellId = CellId::new("session");
const GROUP_ORDER_PARAM: CellId = CellId::new("group_order_param");
const ORDERED_GROUPS: CellId = CellId::new("ordered_groups");
const USER_CREATED_GROUPS: CellId = CellId::new("user_created_groups");

const GROUPS_LABEL: &str = "comparison groups";

pub fn default_selected_groups() -> Vec<String> {
    vec![
        ALTERED_GROUP_NAME.to_string(),
        UNALTERED_GROUP_NAME.to_string(),
    ]
}

pub struct ComparisonStore<P: ParamStore> {
    params: P,
    base_groups: Remote<Vec<Group>>,
    session: Remote<ComparisonSession>,
    observed_order_raw: Option<String>,
    observed_order: Option<Vec<String>>,
    graph: DependencyGraph,
    ordered_groups: Memo<Remote<Vec<Group>>>,
    user_created_groups: Memo<Remote<BTreeSet<String>>>,
}

impl<P: ParamStore> ComparisonStore<P> {
    /// Both upstream inputs start out pending.
    pub fn new(params: P) -> Self {
        let mut graph = DependencyGraph::new();
        graph.declare(ORDERED_GROUPS, &[BASE_GROUPS, GROUP_ORDER_PARAM]);
        graph.declare(USER_CREATED_GROUPS, &[SESSION]);
        Self {
            params,
            base_groups: Remote::Pending,
            session: Remote::Pending,
            observed_order_raw: None,
            observed_order: None,
            graph,
            ordered_groups: Memo::new(),
            user_created_groups: Memo::new(),
        }
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    /// Direct access to the backing store. Changes made here are picked up on
    /// the next read, like an edited URL.
    pub fn params_mut(&mut self) -> &mut P {
        &mut self.params
    }

    pub fn into_params(self) -> P {
        self.params
    }

    pub fn set_base_groups(&mut self, groups: Remote<Vec<Group>>) {
        self.base_groups = groups;
        self.graph.invalidate(BASE_GROUPS);
    }

    pub fn set_session(&mut self, session: Remote<ComparisonSession>) {
        self.session = session;
        self.graph.invalidate(SESSION);
    }

    pub fn overlap_strategy(&self) -> OverlapStrategy {
        self.params.read_soft(&OVERLAP_STRATEGY).unwrap_or_default()
    }

    pub fn set_overlap_strategy(&mut self, strategy: OverlapStrategy) -> Result<(), CompareError> {
        self.params.write(&OVERLAP_STRATEGY, &strategy)
    }

    /// The persisted display order, if the user ever reordered groups.
    pub fn group_order(&self) -> Option<Vec<String>> {
        self.params.read_soft(&GROUP_ORDER)
    }

    pub fn created_session_id(&self) -> Option<SessionId> {
        self.params.read_soft(&CREATED_SESSION_ID)
    }

    /// Upstream groups, stably sorted by the persisted order. Names missing
    /// from the order keep their relative position after all ordered names.
    pub fn ordered_groups(&mut self) -> Remote<&[Group]> {
        self.refresh_group_order();
        let dirty = self.graph.is_dirty(ORDERED_GROUPS);
        let base = &self.base_groups;
        let order = self.observed_order.as_deref();
        let value = self
            .ordered_groups
            .get_or_compute(dirty, || apply_group_order(base, order));
        self.graph.mark_clean(ORDERED_GROUPS);
        value.as_ref().map(|groups| groups.as_slice())
    }

    /// How many times the ordered group list has been derived.
    pub fn ordered_group_computations(&self) -> u64 {
        self.ordered_groups.computations()
    }

    /// Names of the groups the user created in the current session.
    pub fn user_created_groups(&mut self) -> Remote<&BTreeSet<String>> {
        let dirty = self.graph.is_dirty(USER_CREATED_GROUPS);
        let session = &self.session;
        let value = self.user_created_groups.get_or_compute(dirty, || {
            session.as_ref().map(|session| {
                session
                    .groups
                    .iter()
                    .map(|group| group.name.clone())
                    .collect()
            })
        });
        self.graph.mark_clean(USER_CREATED_GROUPS);
        value.as_ref()
    }

    pub fn is_group_deletable(&mut self, group: &Group) -> bool {
        match self.user_created_groups() {
            Remote::Complete(names) => names.contains(&group.name),
            _ => false,
        }
    }

    pub fn selected_group_names(&self) -> Vec<String> {
        self.params
            .read_soft(&SELECTED_GROUPS)
            .unwrap_or_else(default_selected_groups)
    }

    pub fn is_group_selected(&self, name: &str) -> bool {
        self.selected_group_names().iter().any(|selected| selected == name)
    }

    /// Removes one occurrence of `name` if selected, appends it otherwise.
    pub fn toggle_group_selected(&mut self, name: &str) -> Result<(), CompareError> {
        let mut names = self.selected_group_names();
        match names.iter().position(|selected| selected == name) {
            Some(index) => {
                names.remove(index);
            }
            None => names.push(name.to_string()),
        }
        self.update_selected_groups(names)
    }

    pub fn select_all_groups(&mut self) -> Result<(), CompareError> {
        let names = self
            .ordered_groups()
            .require(GROUPS_LABEL)?
            .iter()
            .map(|group| group.name.clone())
            .collect();
        self.update_selected_groups(names)
    }

    pub fn deselect_all_groups(&mut self) -> Result<(), CompareError> {
        self.update_selected_groups(Vec::new())
    }

    /// Moves the group at `old_index` to `new_index`. Without a persisted
    /// order the current group order is used as the starting point.
    pub fn update_group_order(
        &mut self,
        old_index: usize,
        new_index: usize,
    ) -> Result<(), CompareError> {
        let mut order = match self.group_order() {
            Some(order) => order,
            None => self
                .ordered_groups()
                .require(GROUPS_LABEL)?
                .iter()
                .map(|group| group.name.clone())
                .collect(),
        };
        let len = order.len();
        if old_index >= len {
            return Err(CompareError::OutOfRange {
                index: old_index,
                len,
            });
        }
        if new_index >= len {
            return Err(CompareError::OutOfRange {
                index: new_index,
                len,
            });
        }
        let moved = order.remove(old_index);
        order.insert(new_index, moved);
        tracing::debug!(old_index, new_index, "group order updated");
        self.params.write(&GROUP_ORDER, &order)
    }

    /// Stores `session` through `client` and records the assigned id.
    pub fn save_session<C: SessionClient + ?Sized>(
        &mut self,
        client: &C,
        session: &ComparisonSession,
    ) -> Result<SessionId, CompareError> {
        let id = client.add_comparison_session(session)?;
        self.params.write(&CREATED_SESSION_ID, &id)?;
        tracing::info!(%id, "comparison session saved");
        Ok(id)
    }

    fn update_selected_groups(&mut self, names: Vec<String>) -> Result<(), CompareError> {
        tracing::debug!(selected = names.len(), "group selection updated");
        self.params.write(&SELECTED_GROUPS, &names)
    }

    fn refresh_group_order(&mut self) {
        let raw = self.params.get(GROUP_ORDER.name());
        if raw != self.observed_order_raw {
            self.observed_order = self.params.read_soft(&GROUP_ORDER);
            self.observed_order_raw = raw;
            self.graph.invalidate(GROUP_ORDER_PARAM);
        }
    }
}

fn apply_group_order(base: &Remote<Vec<Group>>, order: Option<&[String]>) -> Remote<Vec<Group>> {
    base.as_ref().map(|groups| {
        let Some(order) = order else {
            return groups.clone();
        };
        // a repeated name keeps its last position
        let positions: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();
        let mut sorted = groups.clone();
        sorted.sort_by_key(|group| {
            positions
                .get(group.name.as_str())
                .copied()
                .unwrap_or(usize::MAX)
        });
        tracing::debug!(groups = sorted.len(), "derived ordered comparison groups");
        sorted
    })
}
