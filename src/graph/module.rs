//! Module model.

use std::collections::BTreeMap;

use super::types::{Direction, ModuleId, PinId};
use crate::constraint::ValueConstraintSpec;
use crate::descriptor::Descriptor;

/// Per-type parameter defaults: type name -> parameter name -> spec.
pub type ConstraintTable = BTreeMap<String, BTreeMap<String, ValueConstraintSpec>>;

/// A hardware or software unit in the forest.
#[derive(Debug, Clone)]
pub struct Module {
    /// This module's own identifier
    pub id: ModuleId,
    pub name: String,
    /// Slash/colon-joined location, unique within its tree
    pub path: String,
    /// Enclosing module, `None` for a root
    pub parent: Option<ModuleId>,
    /// Nested modules in declaration order
    pub children: Vec<ModuleId>,
    /// Consumer pins, including pins promoted from descendants
    pub take_pins: BTreeMap<String, PinId>,
    /// Producer pins, including pins promoted from descendants
    pub give_pins: BTreeMap<String, PinId>,
    /// Unrecognized descriptor keys, kept verbatim
    pub attributes: Vec<(String, Descriptor)>,
    /// Defaults merged into pins of each type declared here
    pub constraints: ConstraintTable,
    /// Explicit same-module links, stored in both directions
    pub links: BTreeMap<PinId, PinId>,
}

impl Module {
    /// Create an empty module.
    pub fn new(
        id: ModuleId,
        name: impl Into<String>,
        path: impl Into<String>,
        parent: Option<ModuleId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            parent,
            children: Vec::new(),
            take_pins: BTreeMap::new(),
            give_pins: BTreeMap::new(),
            attributes: Vec::new(),
            constraints: ConstraintTable::new(),
            links: BTreeMap::new(),
        }
    }

    /// Check if this is a root module.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The take or give map for a direction.
    pub fn pins(&self, direction: Direction) -> &BTreeMap<String, PinId> {
        match direction {
            Direction::Take => &self.take_pins,
            Direction::Give => &self.give_pins,
        }
    }

    pub(crate) fn pins_mut(&mut self, direction: Direction) -> &mut BTreeMap<String, PinId> {
        match direction {
            Direction::Take => &mut self.take_pins,
            Direction::Give => &mut self.give_pins,
        }
    }

    /// Look up a take pin by name.
    pub fn take_pin(&self, name: &str) -> Option<PinId> {
        self.take_pins.get(name).copied()
    }

    /// Look up a give pin by name.
    pub fn give_pin(&self, name: &str) -> Option<PinId> {
        self.give_pins.get(name).copied()
    }

    /// Get an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&Descriptor> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Partner of a pin in the explicit link table.
    pub fn linked(&self, pin: PinId) -> Option<PinId> {
        self.links.get(&pin).copied()
    }
}
