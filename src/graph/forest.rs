//! Arena holding every module and pin of one build.

use tracing::warn;

use super::builder::{Builder, ParseContext};
use super::module::Module;
use super::pin::Pin;
use super::types::{ModuleId, PinId};
use crate::config::BuildConfig;
use crate::descriptor::Descriptor;
use crate::error::{ModwireError, Result};

/// All modules and pins built from one set of top-level descriptors.
///
/// Modules and pins refer to each other through [`ModuleId`] and [`PinId`];
/// a pin promoted by scope is the same [`PinId`] in every map it appears in.
#[derive(Debug, Default)]
pub struct Forest {
    modules: Vec<Module>,
    pins: Vec<Pin>,
    roots: Vec<ModuleId>,
    diagnostics: Vec<ModwireError>,
    config: BuildConfig,
}

impl Forest {
    /// Create an empty forest with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty forest with the given configuration.
    pub fn with_config(config: BuildConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Build one top-level descriptor into a new root module.
    ///
    /// Explicit links are resolved per module as the tree is built. Automatic
    /// connections are not; call [`Forest::resolve_connections`] once every
    /// top-level descriptor of the forest has been added. On error the
    /// forest is left as it was before the call.
    pub fn add_module(&mut self, path: &str, descriptor: &Descriptor) -> Result<ModuleId> {
        let checkpoint = (self.modules.len(), self.pins.len(), self.diagnostics.len());
        let default_name = path.rsplit(|c: char| c == '/' || c == ':').next().unwrap_or(path);

        let result = Builder::new(self).build_module(
            None,
            path.to_string(),
            default_name,
            descriptor,
            ParseContext::default(),
        );

        match result {
            Ok(id) => {
                self.roots.push(id);
                Ok(id)
            }
            Err(e) => {
                self.modules.truncate(checkpoint.0);
                self.pins.truncate(checkpoint.1);
                self.diagnostics.truncate(checkpoint.2);
                Err(e)
            }
        }
    }

    /// Get a module by ID.
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0]
    }

    /// Get a pin by ID.
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.0]
    }

    /// Parentless modules, in the order they were added.
    pub fn roots(&self) -> &[ModuleId] {
        &self.roots
    }

    /// All modules in construction order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// All pins in construction order.
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Recoverable problems reported while building.
    pub fn diagnostics(&self) -> &[ModwireError] {
        &self.diagnostics
    }

    /// The configuration this forest is built with.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Find a module by its path.
    pub fn find_module(&self, path: &str) -> Option<ModuleId> {
        self.modules
            .iter()
            .find(|m| m.path == path)
            .map(|m| m.id)
    }

    /// Human-readable `path.name` label of a pin.
    pub fn pin_label(&self, id: PinId) -> String {
        let pin = self.pin(id);
        format!("{}.{}", self.module(pin.owner).path, pin.name)
    }

    /// Total number of take/give connections.
    pub fn connection_count(&self) -> usize {
        self.pins
            .iter()
            .filter(|p| p.direction == super::Direction::Take)
            .map(|p| p.connections.len())
            .sum()
    }

    pub(crate) fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.0]
    }

    pub(crate) fn pin_mut(&mut self, id: PinId) -> &mut Pin {
        &mut self.pins[id.0]
    }

    /// Allocate a module and attach it to its parent.
    pub(crate) fn push_module(&mut self, mut module: Module) -> ModuleId {
        let id = ModuleId(self.modules.len());
        module.id = id;
        if let Some(parent) = module.parent {
            self.modules[parent.0].children.push(id);
        }
        self.modules.push(module);
        id
    }

    pub(crate) fn push_pin(&mut self, pin: Pin) -> PinId {
        let id = PinId(self.pins.len());
        self.pins.push(pin);
        id
    }

    /// Log a recoverable problem and keep it for the caller.
    pub(crate) fn report(&mut self, error: ModwireError) {
        warn!("{}", error);
        self.diagnostics.push(error);
    }
}
