//! Pin model and construction.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::module::Module;
use super::types::{Direction, ModuleId, PinId, Scope};
use crate::constraint::{parse_spec, ConstraintTerm, ValueConstraintSpec};
use crate::descriptor::{classify_key, Descriptor, DescriptorKeyKind, INDEX_KEY, TYPE_KEY};
use crate::error::{ModwireError, Result};

/// A typed take or give endpoint.
#[derive(Debug, Clone)]
pub struct Pin {
    /// Pin name, unique within its owner's take or give map
    pub name: String,
    /// Consumer or producer
    pub direction: Direction,
    /// Module the pin was declared in
    pub owner: ModuleId,
    /// Parameters by name; always contains `type`
    pub parameters: BTreeMap<String, ValueConstraintSpec>,
    /// Opaque pass-through data
    pub reciprocal: Option<Descriptor>,
    /// Same-module pins this pin asks to be linked to
    pub explicit_links: Vec<String>,
    /// Upward visibility, if any
    pub scope: Option<Scope>,
    /// Pins discovered by the connectivity pass
    pub connections: BTreeSet<PinId>,
}

impl Pin {
    /// Get a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ValueConstraintSpec> {
        self.parameters.get(name)
    }

    /// Values of the `type` parameter.
    pub fn type_values(&self) -> &[String] {
        self.parameters
            .get(TYPE_KEY)
            .map(|spec| spec.values.as_slice())
            .unwrap_or(&[])
    }

    /// First value of the `index` parameter, if it fits a `u64`.
    pub fn index(&self) -> Option<u64> {
        self.parameters
            .get(INDEX_KEY)?
            .values
            .first()?
            .parse()
            .ok()
    }
}

/// Split a pin name into its type and trailing index.
///
/// `gpio_3` gives `("gpio", Some("3"))`, `spi_cs_0` gives `("spi_cs", Some("0"))`,
/// `led` gives `("led", None)`. The index is kept as canonical decimal text
/// (`gpio_007` gives `"7"`) so suffixes of any length survive. Returns `None`
/// when no non-empty type remains.
pub fn derive_type(name: &str) -> Option<(String, Option<String>)> {
    let derived = match name.rsplit_once('_') {
        Some((prefix, last)) if !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()) => {
            let trimmed = last.trim_start_matches('0');
            let index = if trimmed.is_empty() { "0" } else { trimmed };
            (prefix.to_string(), Some(index.to_string()))
        }
        _ => (name.to_string(), None),
    };
    if derived.0.is_empty() {
        None
    } else {
        Some(derived)
    }
}

/// Build a pin from its descriptor.
///
/// `name_hint` is the key the pin was declared under, if any. A bare string
/// descriptor is a link target; a mapping declares parameters. The owner's
/// per-type constraint defaults are merged into the result.
pub fn build_pin(
    name_hint: Option<&str>,
    direction: Direction,
    owner: &Module,
    descriptor: &Descriptor,
) -> Result<Pin> {
    let mut name = name_hint.map(str::to_string);
    let mut reciprocal = None;
    let mut explicit_links = Vec::new();
    let mut scope = None;
    let mut raw_params: Vec<(&str, &Descriptor)> = Vec::new();

    match descriptor {
        Descriptor::Null => {}
        Descriptor::Str(target) => explicit_links.push(target.clone()),
        Descriptor::Map(entries) => {
            for (key, value) in entries {
                match classify_key(key) {
                    DescriptorKeyKind::Name => {
                        let overridden = value.scalar_token().ok_or_else(|| {
                            ModwireError::invalid_descriptor(
                                &owner.path,
                                format!("pin name must be a scalar, got {}", value.kind_name()),
                            )
                        })?;
                        name = Some(overridden);
                    }
                    DescriptorKeyKind::Reciprocal => reciprocal = Some(value.clone()),
                    DescriptorKeyKind::Links => {
                        explicit_links.extend(tokens_of(owner, value)?);
                    }
                    DescriptorKeyKind::Scope => {
                        scope = Some(Scope::from_tokens(tokens_of(owner, value)?));
                    }
                    DescriptorKeyKind::LegacyLink => {
                        debug!(key = %key, module = %owner.path, "ignoring legacy link key");
                    }
                    DescriptorKeyKind::Type => raw_params.push((TYPE_KEY, value)),
                    DescriptorKeyKind::Index => raw_params.push((INDEX_KEY, value)),
                    _ => raw_params.push((key.as_str(), value)),
                }
            }
        }
        other => {
            return Err(ModwireError::invalid_descriptor(
                &owner.path,
                format!("pin descriptor must be a mapping or string, got {}", other.kind_name()),
            ))
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ModwireError::MissingPinName {
            module: owner.path.clone(),
        })?;

    let mut parameters: BTreeMap<String, ValueConstraintSpec> = BTreeMap::new();
    for (param, value) in raw_params {
        let spec = value
            .to_tokens()
            .and_then(|tokens| parse_spec(tokens))
            .map_err(|source| ModwireError::InvalidParameter {
                module: owner.path.clone(),
                pin: name.clone(),
                param: param.to_string(),
                source,
            })?;
        parameters.entry(param.to_string()).or_default().merge(&spec);
    }

    if !parameters.contains_key(TYPE_KEY) {
        let (type_name, index) = derive_type(&name).ok_or_else(|| ModwireError::MissingPinType {
            module: owner.path.clone(),
            pin: name.clone(),
        })?;
        parameters.insert(
            TYPE_KEY.to_string(),
            ValueConstraintSpec::from_values([type_name]),
        );
        if let Some(index) = index {
            parameters
                .entry(INDEX_KEY.to_string())
                .or_insert_with(|| ValueConstraintSpec::from_values([index]));
        }
    }

    let missing_type = || ModwireError::MissingPinType {
        module: owner.path.clone(),
        pin: name.clone(),
    };
    let type_spec = parameters
        .get_mut(TYPE_KEY)
        .filter(|spec| !spec.is_empty())
        .ok_or_else(missing_type)?;

    // a constraint-only type names its values through its equality terms,
    // falling back to the name
    if type_spec.values.is_empty() {
        let required: Vec<String> = type_spec
            .constraints
            .iter()
            .filter_map(|term| match term {
                ConstraintTerm::Equals(value) => Some(value.clone()),
                _ => None,
            })
            .collect();
        type_spec.values = if required.is_empty() {
            let (type_name, _) = derive_type(&name).ok_or_else(missing_type)?;
            vec![type_name]
        } else {
            required
        };
    }

    // type is the default matching key
    if type_spec.constraints.is_empty() {
        let injected: Vec<_> = type_spec
            .values
            .iter()
            .cloned()
            .map(ConstraintTerm::Equals)
            .collect();
        type_spec.constraints = injected;
    }

    let type_values = type_spec.values.clone();
    for type_name in &type_values {
        if let Some(defaults) = owner.constraints.get(type_name) {
            for (param, spec) in defaults {
                parameters.entry(param.clone()).or_default().merge(spec);
            }
        }
    }

    debug!(
        module = %owner.path,
        pin = %name,
        %direction,
        types = ?type_values,
        "built pin"
    );

    Ok(Pin {
        name,
        direction,
        owner: owner.id,
        parameters,
        reciprocal,
        explicit_links,
        scope,
        connections: BTreeSet::new(),
    })
}

fn tokens_of(owner: &Module, value: &Descriptor) -> Result<Vec<String>> {
    value
        .to_tokens()
        .map_err(|e| ModwireError::invalid_descriptor(&owner.path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::parse_spec_str;
    use crate::error::GrammarError;

    fn owner() -> Module {
        Module::new(ModuleId(0), "board", "hw/board", None)
    }

    #[test]
    fn test_derive_type() {
        let derived = |ty: &str, index: Option<&str>| Some((ty.to_string(), index.map(str::to_string)));
        assert_eq!(derive_type("gpio_3"), derived("gpio", Some("3")));
        assert_eq!(derive_type("spi_cs_0"), derived("spi_cs", Some("0")));
        assert_eq!(derive_type("gpio_007"), derived("gpio", Some("7")));
        assert_eq!(derive_type("gpio_000"), derived("gpio", Some("0")));
        assert_eq!(derive_type("led"), derived("led", None));
        assert_eq!(derive_type("gpio_a"), derived("gpio_a", None));
        assert_eq!(derive_type("gpio_+3"), derived("gpio_+3", None));
        assert_eq!(derive_type("_3"), None);
        assert_eq!(derive_type(""), None);
    }

    #[test]
    fn test_derive_type_round_trip() {
        let huge = "99999999999999999999999";
        let max = u64::MAX.to_string();
        for ty in ["gpio", "uart", "spi_cs", "a", "i2c_bus_sda"] {
            for n in ["0", "1", "7", "42", "1000", max.as_str(), huge] {
                let name = format!("{}_{}", ty, n);
                assert_eq!(
                    derive_type(&name),
                    Some((ty.to_string(), Some(n.to_string()))),
                    "{name}"
                );
            }
        }
    }

    #[test]
    fn test_long_index_is_kept() {
        let pin = build_pin(
            Some("gpio_99999999999999999999999"),
            Direction::Give,
            &owner(),
            &Descriptor::Null,
        )
        .unwrap();
        assert_eq!(pin.type_values(), ["gpio"]);
        assert_eq!(
            pin.parameter("index").unwrap().values,
            vec!["99999999999999999999999"]
        );
        // too wide for the numeric accessor
        assert_eq!(pin.index(), None);
    }

    #[test]
    fn test_name_derived_type_and_index() {
        let pin = build_pin(Some("gpio_3"), Direction::Take, &owner(), &Descriptor::Null).unwrap();
        assert_eq!(pin.type_values(), ["gpio"]);
        assert_eq!(pin.index(), Some(3));
        assert_eq!(
            pin.parameter("type").unwrap().constraints,
            vec![ConstraintTerm::Equals("gpio".to_string())]
        );
        assert!(pin.parameter("index").unwrap().constraints.is_empty());
    }

    #[test]
    fn test_explicit_index_wins() {
        let desc = Descriptor::map([("index", Descriptor::Int(9))]);
        let pin = build_pin(Some("gpio_3"), Direction::Give, &owner(), &desc).unwrap();
        assert_eq!(pin.index(), Some(9));
    }

    #[test]
    fn test_explicit_type() {
        let desc = Descriptor::map([("type", Descriptor::str("uart"))]);
        let pin = build_pin(Some("debug_0"), Direction::Give, &owner(), &desc).unwrap();
        assert_eq!(pin.type_values(), ["uart"]);
        // index only comes with a derived type
        assert!(pin.parameter("index").is_none());
    }

    #[test]
    fn test_explicit_type_constraint_not_overridden() {
        let desc = Descriptor::map([("type", Descriptor::str("gpio ~pwm"))]);
        let pin = build_pin(Some("io"), Direction::Take, &owner(), &desc).unwrap();
        assert_eq!(
            pin.parameter("type").unwrap().constraints,
            vec![ConstraintTerm::NotEquals("pwm".to_string())]
        );
    }

    #[test]
    fn test_constraint_only_type_takes_required_value() {
        let mut module = owner();
        let mut gpio = BTreeMap::new();
        gpio.insert("voltage".to_string(), parse_spec_str("=3.3").unwrap());
        module.constraints.insert("gpio".to_string(), gpio);

        let desc = Descriptor::map([("type", Descriptor::str("=gpio"))]);
        let pin = build_pin(Some("io"), Direction::Take, &module, &desc).unwrap();
        assert_eq!(pin.type_values(), ["gpio"]);
        assert_eq!(
            pin.parameter("type").unwrap().constraints,
            vec![ConstraintTerm::Equals("gpio".to_string())]
        );
        assert!(pin.parameter("voltage").is_some());
    }

    #[test]
    fn test_negated_only_type_falls_back_to_name() {
        let desc = Descriptor::map([("type", Descriptor::str("~pwm"))]);
        let pin = build_pin(Some("gpio_2"), Direction::Take, &owner(), &desc).unwrap();
        assert_eq!(pin.type_values(), ["gpio"]);

        let err = build_pin(Some("_2"), Direction::Take, &owner(), &desc).unwrap_err();
        assert!(matches!(err, ModwireError::MissingPinType { .. }));
    }

    #[test]
    fn test_name_override() {
        let desc = Descriptor::map([("name", Descriptor::str("uart_1"))]);
        let pin = build_pin(Some("debug"), Direction::Give, &owner(), &desc).unwrap();
        assert_eq!(pin.name, "uart_1");
        assert_eq!(pin.type_values(), ["uart"]);
    }

    #[test]
    fn test_string_descriptor_is_link() {
        let pin = build_pin(Some("led_0"), Direction::Give, &owner(), &Descriptor::str("gpio_3"))
            .unwrap();
        assert_eq!(pin.explicit_links, vec!["gpio_3"]);
        assert_eq!(pin.parameters.len(), 2); // type + index
    }

    #[test]
    fn test_string_descriptor_without_name_fails() {
        let err = build_pin(None, Direction::Give, &owner(), &Descriptor::str("gpio_3")).unwrap_err();
        assert!(matches!(err, ModwireError::MissingPinName { .. }));
    }

    #[test]
    fn test_missing_type() {
        let err = build_pin(Some("_5"), Direction::Take, &owner(), &Descriptor::Null).unwrap_err();
        assert!(matches!(err, ModwireError::MissingPinType { .. }));
    }

    #[test]
    fn test_link_scope_reciprocal_and_legacy_keys() {
        let desc = Descriptor::map([
            ("links", Descriptor::str("a b")),
            ("scope", Descriptor::str("board root")),
            ("reciprocal", Descriptor::map([("pull", Descriptor::str("up"))])),
            ("linked_to", Descriptor::str("ignored")),
            ("voltage", Descriptor::str("3.3")),
        ]);
        let pin = build_pin(Some("gpio_1"), Direction::Give, &owner(), &desc).unwrap();
        assert_eq!(pin.explicit_links, vec!["a", "b"]);
        let scope = pin.scope.as_ref().unwrap();
        assert!(scope.root);
        assert!(scope.ancestors.contains("board"));
        assert!(pin.reciprocal.is_some());
        assert!(pin.parameter("linked_to").is_none());
        assert_eq!(pin.parameter("voltage").unwrap().values, vec!["3.3"]);
    }

    #[test]
    fn test_grammar_error_is_fatal() {
        let desc = Descriptor::map([("voltage", Descriptor::str("=1.."))]);
        let err = build_pin(Some("gpio_1"), Direction::Take, &owner(), &desc).unwrap_err();
        match err {
            ModwireError::InvalidParameter { pin, param, source, .. } => {
                assert_eq!(pin, "gpio_1");
                assert_eq!(param, "voltage");
                assert!(matches!(source, GrammarError::EmptyRangeBound { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_module_constraints_merged() {
        let mut module = owner();
        let mut gpio = BTreeMap::new();
        gpio.insert("voltage".to_string(), parse_spec_str("=3.3").unwrap());
        gpio.insert("drive".to_string(), parse_spec_str("push").unwrap());
        module.constraints.insert("gpio".to_string(), gpio);

        let desc = Descriptor::map([("drive", Descriptor::str("open"))]);
        let pin = build_pin(Some("gpio_2"), Direction::Take, &module, &desc).unwrap();
        assert_eq!(
            pin.parameter("voltage").unwrap().constraints,
            vec![ConstraintTerm::Equals("3.3".to_string())]
        );
        // additive, never overwrites
        assert_eq!(pin.parameter("drive").unwrap().values, vec!["open", "push"]);

        let other = build_pin(Some("uart_0"), Direction::Take, &module, &Descriptor::Null).unwrap();
        assert!(other.parameter("voltage").is_none());
    }
}
