//! Module graph construction and connectivity resolution.
//!
//! A [`Forest`] is an arena holding every [`Module`] and [`Pin`] built from
//! one set of top-level descriptors. Building happens in two steps:
//!
//! 1. Each top-level descriptor is parsed recursively into a module tree.
//!    Pins are built as they are met, pick up their owning module's
//!    constraint defaults, and are promoted into ancestors according to
//!    their scope. Explicit links are resolved per module as soon as that
//!    module is complete.
//! 2. Once every descriptor has been added, one connectivity pass pairs take
//!    pins with compatible give pins across the roots and their direct
//!    children.
//!
//! [`build_forest`] runs both steps.

mod builder;
mod forest;
mod links;
mod module;
mod pin;
mod render;
mod resolve;
mod types;

#[cfg(test)]
mod tests;

pub use forest::Forest;
pub use links::LinkRequest;
pub use module::{ConstraintTable, Module};
pub use pin::{build_pin, derive_type, Pin};
pub use render::ModuleDisplay;
pub use resolve::pins_connectable;
pub use types::*;

use crate::config::BuildConfig;
use crate::descriptor::Descriptor;
use crate::error::Result;

/// Build a single top-level descriptor and resolve its connections.
pub fn build_module(path: &str, descriptor: &Descriptor) -> Result<Forest> {
    build_forest([(path, descriptor)], BuildConfig::default())
}

/// Build every top-level descriptor of one forest, then resolve connections
/// once.
///
/// A fatal error in any descriptor aborts the whole build.
pub fn build_forest<'d, P: AsRef<str>>(
    descriptors: impl IntoIterator<Item = (P, &'d Descriptor)>,
    config: BuildConfig,
) -> Result<Forest> {
    let mut forest = Forest::with_config(config);
    for (path, descriptor) in descriptors {
        forest.add_module(path.as_ref(), descriptor)?;
    }
    forest.resolve_connections();
    Ok(forest)
}
