//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Action, StateKey};

/// Sparse Q-table mapping state -> action -> estimated value
///
/// Entries appear lazily, at 0.0, the first time a (state, action) pair is
/// seen, and are never removed except by replacing the whole table. It
/// serializes as `{ state_key: { "sr,sc->dr,dc": value } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QTable {
    values: HashMap<StateKey, HashMap<Action, f64>>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value for a pair, if it has been seen
    pub fn get(&self, state: &StateKey, action: Action) -> Option<f64> {
        self.values.get(state)?.get(&action).copied()
    }

    /// Stored value for a pair, treating unseen pairs as 0.0
    pub fn value(&self, state: &StateKey, action: Action) -> f64 {
        self.get(state, action).unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Lazily create 0.0 entries for any of `actions` not yet recorded.
    pub fn ensure_actions(&mut self, state: &StateKey, actions: &[Action]) {
        if !self.values.contains_key(state) {
            self.values.insert(state.clone(), HashMap::new());
        }
        let Some(entries) = self.values.get_mut(state) else {
            return;
        };
        for &action in actions {
            entries.entry(action).or_insert(0.0);
        }
    }

    /// Actions recorded for a state
    pub fn actions(&self, state: &StateKey) -> Option<&HashMap<Action, f64>> {
        self.values.get(state)
    }

    /// Maximum over all recorded actions of a state.
    ///
    /// `None` when the state is unknown or has no recorded actions. Only
    /// previously explored actions count; current legality is not consulted.
    pub fn max_value(&self, state: &StateKey) -> Option<f64> {
        self.values
            .get(state)?
            .values()
            .copied()
            .reduce(f64::max)
    }

    /// Every candidate whose value equals the maximum over `candidates`.
    ///
    /// Order follows `candidates`, so ties can be broken by the caller.
    pub fn best_actions(&self, state: &StateKey, candidates: &[Action]) -> Vec<Action> {
        let best = candidates
            .iter()
            .map(|&action| self.value(state, action))
            .fold(f64::NEG_INFINITY, f64::max);
        candidates
            .iter()
            .copied()
            .filter(|&action| self.value(state, action) == best)
            .collect()
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The bootstrap term is 0 when `done` or when `next_state` has no
    /// recorded actions. Returns the new value.
    #[allow(clippy::too_many_arguments)]
    pub fn q_learning_update(
        &mut self,
        state: &StateKey,
        action: Action,
        reward: f64,
        next_state: &StateKey,
        done: bool,
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let max_next_q = if done {
            0.0
        } else {
            self.max_value(next_state).unwrap_or(0.0)
        };
        let current_q = self.value(state, action);
        let td_target = reward + discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + learning_rate * td_error;
        self.set(state.clone(), action, new_q);
        new_q
    }

    /// Number of states with at least one entry
    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    /// Total number of (state, action) entries
    pub fn size(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (state, action, value) triples in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, Action, f64)> + '_ {
        self.values.iter().flat_map(|(state, actions)| {
            actions
                .iter()
                .map(move |(&action, &value)| (state, action, value))
        })
    }
}
