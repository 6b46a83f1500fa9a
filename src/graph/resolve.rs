//! Automatic cross-module connectivity.

use tracing::debug;

use super::forest::Forest;
use super::pin::Pin;
use super::types::{ModuleId, PinId};
use crate::constraint::{evaluate, ParamMatch};

/// Check whether a take pin accepts a give pin.
///
/// Every parameter present on both pins is evaluated with the take side's
/// terms against the give side's values. The pins connect when at least one
/// shared parameter is satisfied and none is contradicted.
pub fn pins_connectable(take: &Pin, give: &Pin) -> bool {
    let mut satisfied = false;
    for (param, take_spec) in &take.parameters {
        let Some(give_spec) = give.parameters.get(param) else {
            continue;
        };
        match evaluate(&take_spec.constraints, &give_spec.values) {
            ParamMatch::Satisfied => satisfied = true,
            ParamMatch::Contradiction => return false,
            ParamMatch::Unconstrained => {}
        }
    }
    satisfied
}

impl Forest {
    /// Modules taking part in the connectivity pass: each root followed by
    /// its direct children.
    pub fn connectivity_set(&self) -> Vec<ModuleId> {
        let mut set = Vec::new();
        for &root in self.roots() {
            set.push(root);
            set.extend(self.module(root).children.iter().copied());
        }
        set
    }

    /// Run the global connectivity pass.
    ///
    /// For every ordered pair of distinct modules in
    /// [`connectivity_set`](Self::connectivity_set), each take pin of the
    /// first is tested against each give pin of the second. Matches are
    /// recorded on both pins. Returns the number of new connections; running
    /// the pass again on the same forest adds none.
    pub fn resolve_connections(&mut self) -> usize {
        let set = self.connectivity_set();
        let mut found: Vec<(PinId, PinId)> = Vec::new();

        for &a in &set {
            for &b in &set {
                if a != b {
                    found.extend(self.matching_pairs(a, b));
                }
            }
        }

        let mut added = 0;
        for (take, give) in found {
            let new = self.pin_mut(take).connections.insert(give);
            self.pin_mut(give).connections.insert(take);
            if new {
                debug!(
                    take = %self.pin_label(take),
                    give = %self.pin_label(give),
                    "connected"
                );
                added += 1;
            }
        }
        added
    }

    fn matching_pairs(&self, taker: ModuleId, giver: ModuleId) -> Vec<(PinId, PinId)> {
        let taker = self.module(taker);
        let giver = self.module(giver);
        let mut pairs = Vec::new();
        for &take in taker.take_pins.values() {
            for &give in giver.give_pins.values() {
                let (take_pin, give_pin) = (self.pin(take), self.pin(give));
                // promoted pins can bring a module's own pins into another map
                if take_pin.owner == give_pin.owner {
                    continue;
                }
                if pins_connectable(take_pin, give_pin) {
                    pairs.push((take, give));
                }
            }
        }
        pairs
    }
}
