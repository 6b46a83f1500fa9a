//! Recursive descriptor parser producing the module tree.

use tracing::debug;

use super::forest::Forest;
use super::links::{parse_link_block, resolve_explicit_links, LinkRequest};
use super::module::Module;
use super::pin::build_pin;
use super::types::{Direction, ModuleId, PinId, Scope};
use crate::constraint::parse_spec;
use crate::descriptor::{classify_key, Descriptor, DescriptorKeyKind, INDEX_KEY, TYPE_KEY};
use crate::error::{ModwireError, Result};

/// State carried down one top-level build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ParseContext {
    /// Nesting depth below the top-level descriptor
    pub depth: usize,
}

impl ParseContext {
    fn descend(self) -> Self {
        Self {
            depth: self.depth + 1,
        }
    }
}

/// Builds modules and pins into a [`Forest`].
pub(crate) struct Builder<'a> {
    forest: &'a mut Forest,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(forest: &'a mut Forest) -> Self {
        Self { forest }
    }

    /// Build a module and all of its descendants.
    ///
    /// The module's `name` and constraints block are read before any other
    /// key, so pins see the module's defaults and scope checks see its name
    /// regardless of key order. Explicit links are resolved once the
    /// module's pins and children are complete.
    pub(crate) fn build_module(
        &mut self,
        parent: Option<ModuleId>,
        path: String,
        default_name: &str,
        descriptor: &Descriptor,
        ctx: ParseContext,
    ) -> Result<ModuleId> {
        let limit = self.forest.config().max_depth;
        if ctx.depth > limit {
            return Err(ModwireError::DepthLimitExceeded { path, limit });
        }

        let entries = descriptor.as_map().ok_or_else(|| {
            ModwireError::invalid_descriptor(
                &path,
                format!("module descriptor must be a mapping, got {}", descriptor.kind_name()),
            )
        })?;

        let mut name = default_name.to_string();
        for (key, value) in entries {
            if classify_key(key) == DescriptorKeyKind::Name {
                name = value.scalar_token().ok_or_else(|| {
                    ModwireError::invalid_descriptor(
                        &path,
                        format!("module name must be a scalar, got {}", value.kind_name()),
                    )
                })?;
            }
        }

        debug!(%path, %name, depth = ctx.depth, "building module");
        let id = self
            .forest
            .push_module(Module::new(ModuleId(0), name, path, parent));

        for (key, value) in entries {
            if classify_key(key) == DescriptorKeyKind::Constraints && !self.is_module_shaped(value) {
                self.parse_constraints(id, value)?;
            }
        }

        let mut pending_links: Vec<LinkRequest> = Vec::new();
        for (key, value) in entries {
            let kind = classify_key(key);
            if kind == DescriptorKeyKind::Name {
                continue;
            }
            if self.is_module_shaped(value) {
                self.build_child(id, key, value, ctx)?;
                continue;
            }
            match kind {
                DescriptorKeyKind::Take => self.parse_pin_block(id, Direction::Take, value, ctx)?,
                DescriptorKeyKind::Give => self.parse_pin_block(id, Direction::Give, value, ctx)?,
                DescriptorKeyKind::Constraints => {}
                DescriptorKeyKind::Links => {
                    let path = &self.forest.module(id).path;
                    pending_links.extend(parse_link_block(path, value)?);
                }
                DescriptorKeyKind::Type if self.is_marker(value) => {}
                _ => self
                    .forest
                    .module_mut(id)
                    .attributes
                    .push((key.clone(), value.clone())),
            }
        }

        resolve_explicit_links(self.forest, id, &pending_links);
        Ok(id)
    }

    fn build_child(
        &mut self,
        parent: ModuleId,
        key: &str,
        descriptor: &Descriptor,
        ctx: ParseContext,
    ) -> Result<ModuleId> {
        let path = format!("{}:{}", self.forest.module(parent).path, key);
        self.build_module(Some(parent), path, key, descriptor, ctx.descend())
    }

    fn is_marker(&self, value: &Descriptor) -> bool {
        value
            .as_str()
            .map(|s| s.eq_ignore_ascii_case(&self.forest.config().module_marker))
            .unwrap_or(false)
    }

    /// A mapping whose `type` is the module marker.
    fn is_module_shaped(&self, value: &Descriptor) -> bool {
        value.as_map().map_or(false, |entries| {
            entries
                .iter()
                .any(|(k, v)| classify_key(k) == DescriptorKeyKind::Type && self.is_marker(v))
        })
    }

    fn parse_constraints(&mut self, id: ModuleId, block: &Descriptor) -> Result<()> {
        let path = self.forest.module(id).path.clone();
        let types = match block {
            Descriptor::Null => return Ok(()),
            Descriptor::Map(entries) => entries,
            other => {
                return Err(ModwireError::invalid_descriptor(
                    &path,
                    format!("constraints block must be a mapping, got {}", other.kind_name()),
                ))
            }
        };

        for (type_name, params) in types {
            let params = match params {
                Descriptor::Null => continue,
                Descriptor::Map(entries) => entries,
                other => {
                    return Err(ModwireError::invalid_descriptor(
                        &path,
                        format!(
                            "constraints for '{}' must be a mapping, got {}",
                            type_name,
                            other.kind_name()
                        ),
                    ))
                }
            };
            for (param, raw) in params {
                let param = match classify_key(param) {
                    DescriptorKeyKind::Type => TYPE_KEY.to_string(),
                    DescriptorKeyKind::Index => INDEX_KEY.to_string(),
                    _ => param.clone(),
                };
                let spec = raw
                    .to_tokens()
                    .and_then(|tokens| parse_spec(tokens))
                    .map_err(|source| ModwireError::InvalidConstraint {
                        module: path.clone(),
                        type_name: type_name.clone(),
                        param: param.clone(),
                        source,
                    })?;
                self.forest
                    .module_mut(id)
                    .constraints
                    .entry(type_name.clone())
                    .or_default()
                    .entry(param)
                    .or_default()
                    .merge(&spec);
            }
        }
        Ok(())
    }

    /// Parse a take or give block.
    ///
    /// A block is a mapping of pin name to pin descriptor, a sequence of pin
    /// names or pin descriptors carrying their own `name`, or a string of pin
    /// names.
    /// Module-shaped entries become child modules.
    fn parse_pin_block(
        &mut self,
        owner: ModuleId,
        direction: Direction,
        block: &Descriptor,
        ctx: ParseContext,
    ) -> Result<()> {
        match block {
            Descriptor::Null => {}
            Descriptor::Map(entries) => {
                for (key, value) in entries {
                    if self.is_module_shaped(value) {
                        self.build_child(owner, key, value, ctx)?;
                    } else {
                        self.add_pin(owner, direction, Some(key), value)?;
                    }
                }
            }
            Descriptor::Seq(items) => {
                for item in items {
                    if self.is_module_shaped(item) {
                        let key = item
                            .get(crate::descriptor::NAME_KEY)
                            .and_then(Descriptor::scalar_token)
                            .ok_or_else(|| {
                                ModwireError::invalid_descriptor(
                                    &self.forest.module(owner).path,
                                    "module listed in a pin block needs a name",
                                )
                            })?;
                        self.build_child(owner, &key, item, ctx)?;
                    } else if let Descriptor::Str(name) = item {
                        // a bare name, as in the string form of the block
                        self.add_pin(owner, direction, Some(name.as_str()), &Descriptor::Null)?;
                    } else {
                        self.add_pin(owner, direction, None, item)?;
                    }
                }
            }
            Descriptor::Str(names) => {
                for name in names.split(' ').filter(|n| !n.is_empty()) {
                    self.add_pin(owner, direction, Some(name), &Descriptor::Null)?;
                }
            }
            other => {
                return Err(ModwireError::invalid_descriptor(
                    &self.forest.module(owner).path,
                    format!("{} block must be a mapping or sequence, got {}", direction, other.kind_name()),
                ))
            }
        }
        Ok(())
    }

    fn add_pin(
        &mut self,
        owner: ModuleId,
        direction: Direction,
        name_hint: Option<&str>,
        descriptor: &Descriptor,
    ) -> Result<PinId> {
        let module = self.forest.module(owner);
        let pin = build_pin(name_hint, direction, module, descriptor)?;
        if let Some(existing) = module.pins(direction).get(&pin.name).copied() {
            if self.forest.pin(existing).owner == owner {
                return Err(ModwireError::DuplicatePin {
                    module: module.path.clone(),
                    pin: pin.name,
                    direction,
                });
            }
            // a pin declared here shadows one promoted from below
            let conflict = ModwireError::ScopeConflict {
                module: module.path.clone(),
                pin: pin.name.clone(),
                direction,
            };
            self.forest.report(conflict);
        }

        let name = pin.name.clone();
        let scope = pin.scope.clone();
        let id = self.forest.push_pin(pin);
        self.forest
            .module_mut(owner)
            .pins_mut(direction)
            .insert(name.clone(), id);

        if let Some(scope) = scope {
            self.promote(owner, id, &name, direction, &scope);
        }
        Ok(id)
    }

    /// File a scoped pin into every ancestor its scope admits.
    fn promote(
        &mut self,
        owner: ModuleId,
        pin: PinId,
        name: &str,
        direction: Direction,
        scope: &Scope,
    ) {
        let mut current = self.forest.module(owner).parent;
        while let Some(ancestor_id) = current {
            let ancestor = self.forest.module(ancestor_id);
            current = ancestor.parent;

            if !scope.admits(&ancestor.name, !ancestor.is_root()) {
                continue;
            }
            if ancestor.pins(direction).contains_key(name) {
                let conflict = ModwireError::ScopeConflict {
                    module: ancestor.path.clone(),
                    pin: name.to_string(),
                    direction,
                };
                self.forest.report(conflict);
                continue;
            }

            debug!(pin = %name, into = %ancestor.path, "promoting scoped pin");
            self.forest
                .module_mut(ancestor_id)
                .pins_mut(direction)
                .insert(name.to_string(), pin);
        }
    }
}
