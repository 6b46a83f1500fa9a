//! Explicit same-module links.

use tracing::debug;

use super::forest::Forest;
use super::types::{Direction, ModuleId, PinId};
use crate::descriptor::Descriptor;
use crate::error::{ModwireError, Result};

/// A link-block entry pairing a take pin with a give pin by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub take: String,
    pub give: String,
}

/// Parse a module-level link block.
///
/// Accepts a mapping of take name to one or more give names, or a sequence
/// of such mappings.
pub(crate) fn parse_link_block(path: &str, block: &Descriptor) -> Result<Vec<LinkRequest>> {
    let mut requests = Vec::new();
    match block {
        Descriptor::Null => {}
        Descriptor::Map(entries) => collect_pairs(path, entries, &mut requests)?,
        Descriptor::Seq(items) => {
            for item in items {
                let entries = item.as_map().ok_or_else(|| {
                    ModwireError::invalid_descriptor(
                        path,
                        format!("link entries must be mappings, got {}", item.kind_name()),
                    )
                })?;
                collect_pairs(path, entries, &mut requests)?;
            }
        }
        other => {
            return Err(ModwireError::invalid_descriptor(
                path,
                format!("link block must be a mapping or sequence, got {}", other.kind_name()),
            ))
        }
    }
    Ok(requests)
}

fn collect_pairs(
    path: &str,
    entries: &[(String, Descriptor)],
    requests: &mut Vec<LinkRequest>,
) -> Result<()> {
    for (take, gives) in entries {
        let gives = gives
            .to_tokens()
            .map_err(|e| ModwireError::invalid_descriptor(path, e.to_string()))?;
        requests.extend(gives.into_iter().map(|give| LinkRequest {
            take: take.clone(),
            give,
        }));
    }
    Ok(())
}

/// Resolve a module's explicit link requests into its `links` table.
///
/// Requests come from the link block and from the `link` keys of pins owned
/// by the module. Targets are looked up in the module's maps, which include
/// pins promoted into it. A missing target is reported and skipped.
pub(crate) fn resolve_explicit_links(forest: &mut Forest, id: ModuleId, block: &[LinkRequest]) {
    let module = forest.module(id);
    let mut pairs: Vec<(PinId, PinId)> = Vec::new();
    let mut problems = Vec::new();

    for direction in [Direction::Give, Direction::Take] {
        let wanted = direction.opposite();
        for (name, &pin_id) in module.pins(direction) {
            let pin = forest.pin(pin_id);
            if pin.owner != id {
                continue;
            }
            for target in &pin.explicit_links {
                match module.pins(wanted).get(target) {
                    Some(&other) => pairs.push((pin_id, other)),
                    None => problems.push(ModwireError::unresolved_link(
                        &module.path,
                        name,
                        target,
                        wanted,
                    )),
                }
            }
        }
    }

    for request in block {
        let take = module.take_pin(&request.take);
        let give = module.give_pin(&request.give);
        if take.is_none() {
            problems.push(ModwireError::unresolved_link(
                &module.path,
                &request.give,
                &request.take,
                Direction::Take,
            ));
        }
        if give.is_none() {
            problems.push(ModwireError::unresolved_link(
                &module.path,
                &request.take,
                &request.give,
                Direction::Give,
            ));
        }
        if let (Some(take), Some(give)) = (take, give) {
            pairs.push((take, give));
        }
    }

    for problem in problems {
        forest.report(problem);
    }
    for (a, b) in pairs {
        link(forest, id, a, b);
    }
}

/// Record a symmetric link unless either side already has another partner.
fn link(forest: &mut Forest, id: ModuleId, a: PinId, b: PinId) {
    if a == b {
        return;
    }
    let module = forest.module(id);
    for (pin, partner) in [(a, b), (b, a)] {
        if let Some(existing) = module.linked(pin) {
            if existing != partner {
                let problem = ModwireError::AlreadyLinked {
                    module: module.path.clone(),
                    pin: forest.pin(pin).name.clone(),
                    existing: forest.pin(existing).name.clone(),
                    requested: forest.pin(partner).name.clone(),
                };
                forest.report(problem);
                return;
            }
        }
    }

    debug!(
        module = %module.path,
        a = %forest.pin(a).name,
        b = %forest.pin(b).name,
        "linked pins"
    );
    let links = &mut forest.module_mut(id).links;
    links.insert(a, b);
    links.insert(b, a);
}
