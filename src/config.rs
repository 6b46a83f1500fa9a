//! Build configuration.

/// Descriptor file names looked for during repository discovery.
pub const DEFAULT_DESCRIPTOR_NAMES: &[&str] = &["module.yaml", "module.yml", "module.json"];

/// Value of the `type` key that marks a mapping as a nested module.
pub const DEFAULT_MODULE_MARKER: &str = "module";

/// Deepest module nesting accepted in one descriptor.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for building a forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// `type` value identifying nested modules (compared ignoring ASCII case)
    pub module_marker: String,
    /// Maximum module nesting depth below a top-level descriptor
    pub max_depth: usize,
}

impl BuildConfig {
    /// Override the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            module_marker: DEFAULT_MODULE_MARKER.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
