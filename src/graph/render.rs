//! Text rendering of a module tree.

use std::fmt;

use super::forest::Forest;
use super::types::{Direction, ModuleId};

/// Displays a module and its descendants.
pub struct ModuleDisplay<'a> {
    forest: &'a Forest,
    id: ModuleId,
}

impl Forest {
    /// Recursive text view of a module.
    pub fn display(&self, id: ModuleId) -> ModuleDisplay<'_> {
        ModuleDisplay { forest: self, id }
    }
}

impl fmt::Display for ModuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_module(f, self.forest, self.id, 0)
    }
}

fn write_module(f: &mut fmt::Formatter<'_>, forest: &Forest, id: ModuleId, depth: usize) -> fmt::Result {
    let module = forest.module(id);
    let pad = "  ".repeat(depth);

    writeln!(f, "{}module {} [{}]", pad, module.name, module.path)?;

    if !module.attributes.is_empty() {
        writeln!(f, "{}  attributes:", pad)?;
        for (key, value) in &module.attributes {
            writeln!(f, "{}    {}: {}", pad, key, value)?;
        }
    }

    if !module.constraints.is_empty() {
        writeln!(f, "{}  constraints:", pad)?;
        for (type_name, params) in &module.constraints {
            for (param, spec) in params {
                writeln!(f, "{}    {}.{}: {}", pad, type_name, param, spec)?;
            }
        }
    }

    for (label, direction) in [("takes", Direction::Take), ("gives", Direction::Give)] {
        let pins = module.pins(direction);
        if pins.is_empty() {
            continue;
        }
        writeln!(f, "{}  {}:", pad, label)?;
        for (name, &pin_id) in pins {
            let pin = forest.pin(pin_id);
            let params: Vec<String> = pin
                .parameters
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect();
            write!(f, "{}    {} ({})", pad, name, params.join("; "))?;
            if pin.owner != id {
                write!(f, " from {}", forest.module(pin.owner).path)?;
            }
            writeln!(f)?;
            for &other in &pin.connections {
                writeln!(f, "{}      -> {}", pad, forest.pin_label(other))?;
            }
        }
    }

    let links: Vec<_> = module
        .links
        .iter()
        .filter(|(a, _)| forest.pin(**a).direction == Direction::Take)
        .collect();
    if !links.is_empty() {
        writeln!(f, "{}  links:", pad)?;
        for (take, give) in links {
            writeln!(
                f,
                "{}    {} <-> {}",
                pad,
                forest.pin(*take).name,
                forest.pin(*give).name
            )?;
        }
    }

    for &child in &module.children {
        write_module(f, forest, child, depth + 1)?;
    }
    Ok(())
}
