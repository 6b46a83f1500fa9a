//! Classification of descriptor keys.

/// Key that names a module or overrides a pin name.
pub const NAME_KEY: &str = "name";
/// Key carrying a pin type, or the module marker on a module.
pub const TYPE_KEY: &str = "type";
/// Canonical parameter name for pin indices.
pub const INDEX_KEY: &str = "index";
/// Key holding opaque reciprocal data on a pin.
pub const RECIPROCAL_KEY: &str = "reciprocal";
/// Key restricting a pin's upward visibility.
pub const SCOPE_KEY: &str = "scope";

pub const TAKE_KEYS: &[&str] = &["takes", "take", "consume", "consumes"];
pub const GIVE_KEYS: &[&str] = &["gives", "give", "produce", "produces"];
pub const CONSTRAINT_KEYS: &[&str] = &["constraints", "dependency", "dependencies"];
pub const LINK_KEYS: &[&str] = &["link", "links"];

/// What a descriptor key means, independent of where it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKeyKind {
    Name,
    Type,
    Index,
    Take,
    Give,
    Constraints,
    Links,
    Reciprocal,
    Scope,
    /// A key mentioning `link` that is not a link key itself (ignored on pins)
    LegacyLink,
    /// Anything else: an attribute, a parameter, or a child module
    Unclassified,
}

/// Classify a key by its synonym set. Matching ignores ASCII case.
pub fn classify_key(key: &str) -> DescriptorKeyKind {
    let lower = key.to_ascii_lowercase();
    let key = lower.as_str();

    let in_set = |set: &[&str]| set.contains(&key);

    if key == NAME_KEY {
        DescriptorKeyKind::Name
    } else if key == TYPE_KEY {
        DescriptorKeyKind::Type
    } else if key == INDEX_KEY {
        DescriptorKeyKind::Index
    } else if in_set(TAKE_KEYS) {
        DescriptorKeyKind::Take
    } else if in_set(GIVE_KEYS) {
        DescriptorKeyKind::Give
    } else if in_set(CONSTRAINT_KEYS) {
        DescriptorKeyKind::Constraints
    } else if in_set(LINK_KEYS) {
        DescriptorKeyKind::Links
    } else if key == RECIPROCAL_KEY {
        DescriptorKeyKind::Reciprocal
    } else if key == SCOPE_KEY {
        DescriptorKeyKind::Scope
    } else if key.contains("link") {
        DescriptorKeyKind::LegacyLink
    } else {
        DescriptorKeyKind::Unclassified
    }
}
