//! End-to-end scenarios over whole forests.

use super::*;
use crate::descriptor::from_str;
use crate::error::ModwireError;

fn decode(yaml: &str) -> Descriptor {
    from_str(yaml, "test").unwrap()
}

fn forest_of(descriptors: &[(&str, &str)]) -> Forest {
    let decoded: Vec<(&str, Descriptor)> = descriptors
        .iter()
        .map(|(path, yaml)| (*path, decode(yaml)))
        .collect();
    build_forest(decoded.iter().map(|(p, d)| (*p, d)), BuildConfig::default()).unwrap()
}

fn take(forest: &Forest, path: &str, name: &str) -> PinId {
    let id = forest.find_module(path).unwrap();
    forest.module(id).take_pin(name).unwrap()
}

fn give(forest: &Forest, path: &str, name: &str) -> PinId {
    let id = forest.find_module(path).unwrap();
    forest.module(id).give_pin(name).unwrap()
}

fn connected(forest: &Forest, t: PinId, g: PinId) -> bool {
    forest.pin(t).connections.contains(&g)
}

fn assert_connections_symmetric(forest: &Forest) {
    for (i, pin) in forest.pins().iter().enumerate() {
        for other in &pin.connections {
            assert!(
                forest.pin(*other).connections.contains(&PinId(i)),
                "{} -> {} is one-sided",
                forest.pin_label(PinId(i)),
                forest.pin_label(*other)
            );
        }
    }
}

#[test]
fn test_two_roots_matching_names() {
    let forest = forest_of(&[
        ("A", "takes:\n  gpio_3: {}\n"),
        ("B", "gives:\n  gpio_3: {}\n"),
    ]);
    let t = take(&forest, "A", "gpio_3");
    let g = give(&forest, "B", "gpio_3");

    for pin in [t, g] {
        assert_eq!(forest.pin(pin).type_values(), ["gpio"]);
        assert_eq!(forest.pin(pin).index(), Some(3));
    }
    assert!(connected(&forest, t, g));
    assert!(connected(&forest, g, t));
    assert_eq!(forest.connection_count(), 1);
}

#[test]
fn test_module_constraint_scenario() {
    let forest = forest_of(&[(
        "board",
        r#"
consumer:
  type: module
  constraints:
    gpio:
      voltage: "=3.3"
  takes:
    gpio_0: {}
dual:
  type: module
  gives:
    gpio_0:
      voltage: "3.3 5"
five_volt:
  type: module
  gives:
    gpio_0:
      voltage: "5"
"#,
    )]);

    let t = take(&forest, "board:consumer", "gpio_0");
    let voltage = forest.pin(t).parameter("voltage").unwrap();
    assert_eq!(
        voltage.constraints,
        vec![crate::constraint::ConstraintTerm::Equals("3.3".to_string())]
    );

    assert!(connected(&forest, t, give(&forest, "board:dual", "gpio_0")));
    assert!(!connected(&forest, t, give(&forest, "board:five_volt", "gpio_0")));
}

#[test]
fn test_type_constraint_scenario() {
    let forest = forest_of(&[
        ("cpu", "takes:\n  io:\n    type: \"=gpio\"\n"),
        ("pads", "gives:\n  p1:\n    type: \"gpio pwm\"\n  p2:\n    type: uart\n"),
    ]);
    let t = take(&forest, "cpu", "io");
    assert!(connected(&forest, t, give(&forest, "pads", "p1")));
    assert!(!connected(&forest, t, give(&forest, "pads", "p2")));
}

#[test]
fn test_explicit_link_scenario() {
    let forest = forest_of(&[(
        "mod",
        r#"
takes:
  my_take_pin: {}
gives:
  out_0:
    link: my_take_pin
  out_1:
    link: missing_pin
  out_2: {}
"#,
    )]);
    let m = forest.module(forest.roots()[0]);
    let t = m.take_pin("my_take_pin").unwrap();
    let g = m.give_pin("out_0").unwrap();
    assert_eq!(m.linked(g), Some(t));
    assert_eq!(m.linked(t), Some(g));
    assert!(m.linked(m.give_pin("out_1").unwrap()).is_none());

    // the rest of the module was still built
    assert!(m.give_pin("out_2").is_some());
    let reported: Vec<_> = forest
        .diagnostics()
        .iter()
        .filter(|d| matches!(d, ModwireError::UnresolvedLink { .. }))
        .collect();
    assert_eq!(reported.len(), 1);
    assert!(reported[0].is_recoverable());
}

#[test]
fn test_scope_root_promotes_shared_pin() {
    let forest = forest_of(&[
        (
            "board",
            r#"
name: board
cpu:
  type: module
  core:
    type: module
    irq:
      type: module
      gives:
        irq_5:
          scope: root
"#,
        ),
        ("handler", "takes:\n  irq_5: {}\n"),
    ]);

    let board = forest.module(forest.find_module("board").unwrap());
    let deep = give(&forest, "board:cpu:core:irq", "irq_5");
    assert_eq!(board.give_pin("irq_5"), Some(deep));
    // intermediate ancestors are not named in the scope
    assert!(forest
        .module(forest.find_module("board:cpu").unwrap())
        .give_pin("irq_5")
        .is_none());

    // connecting through the promoted entry records it on the original pin
    let t = take(&forest, "handler", "irq_5");
    assert!(connected(&forest, t, deep));
    assert!(forest.pin(deep).connections.contains(&t));
}

#[test]
fn test_pass_is_not_recursive() {
    let forest = forest_of(&[
        (
            "top",
            "mid:\n  type: module\n  leaf:\n    type: module\n    gives:\n      spi_0: {}\n",
        ),
        ("other", "takes:\n  spi_0: {}\n"),
    ]);
    let t = take(&forest, "other", "spi_0");
    assert!(forest.pin(t).connections.is_empty());
}

#[test]
fn test_children_of_one_root_connect() {
    let forest = forest_of(&[(
        "sys",
        r#"
mcu:
  type: module
  takes:
    uart_0: {}
radio:
  type: module
  gives:
    uart_1:
      baud: "9600"
"#,
    )]);
    let t = take(&forest, "sys:mcu", "uart_0");
    let g = give(&forest, "sys:radio", "uart_1");
    assert!(connected(&forest, t, g));
}

#[test]
fn test_same_module_pins_do_not_connect() {
    let forest = forest_of(&[("loop", "takes:\n  gpio_0: {}\ngives:\n  gpio_0: {}\n")]);
    let t = take(&forest, "loop", "gpio_0");
    assert!(forest.pin(t).connections.is_empty());
}

#[test]
fn test_promoted_pin_does_not_connect_to_its_owner() {
    let forest = forest_of(&[(
        "sys",
        r#"
chip:
  type: module
  takes:
    irq_0: {}
  gives:
    irq_1:
      scope: root
"#,
    )]);
    let t = take(&forest, "sys:chip", "irq_0");
    let g = give(&forest, "sys:chip", "irq_1");
    // the promoted entry is visible at the root
    assert_eq!(forest.module(forest.roots()[0]).give_pin("irq_1"), Some(g));
    assert!(forest.pin(t).connections.is_empty());
    assert!(forest.pin(g).connections.is_empty());
    assert_eq!(forest.connection_count(), 0);
}

#[test]
fn test_promoted_pin_connects_to_sibling() {
    let forest = forest_of(&[(
        "sys",
        r#"
chip:
  type: module
  gives:
    irq_1:
      scope: root
cpu:
  type: module
  takes:
    irq_0: {}
"#,
    )]);
    let t = take(&forest, "sys:cpu", "irq_0");
    let g = give(&forest, "sys:chip", "irq_1");
    assert!(connected(&forest, t, g));
    assert_connections_symmetric(&forest);
}

#[test]
fn test_connections_symmetric_and_idempotent() {
    let descriptors = [
        ("a", "takes:\n  gpio_0: {}\n  gpio_1: {}\ngives:\n  uart_0: {}\n"),
        ("b", "gives:\n  gpio_5: {}\ntakes:\n  uart_1: {}\n"),
        ("c", "gives:\n  gpio_6: {}\n"),
    ];
    let mut forest = forest_of(&descriptors);
    assert_connections_symmetric(&forest);

    let before: Vec<_> = forest.pins().iter().map(|p| p.connections.clone()).collect();
    let count = forest.connection_count();
    assert_eq!(count, 5);

    assert_eq!(forest.resolve_connections(), 0);
    let after: Vec<_> = forest.pins().iter().map(|p| p.connections.clone()).collect();
    assert_eq!(before, after);
    assert_eq!(forest.connection_count(), count);
}

#[test]
fn test_links_never_self_referential() {
    let forest = forest_of(&[(
        "m",
        r#"
takes:
  a:
    links: "x y"
  b: x
gives:
  x:
    link: a
  y: {}
links:
  - b: y
"#,
    )]);
    for module in forest.modules() {
        for (a, b) in &module.links {
            assert_ne!(a, b);
            assert_eq!(module.links.get(b), Some(a));
        }
    }
}

#[test]
fn test_fatal_error_aborts_forest() {
    let good = decode("takes:\n  gpio_0: {}\n");
    let bad = decode("gives:\n  gpio_0:\n    voltage: \"=3..1\"\n");
    let err = build_forest([("good", &good), ("bad", &bad)], BuildConfig::default()).unwrap_err();
    assert!(matches!(err, ModwireError::InvalidParameter { .. }));
}

#[test]
fn test_build_module_single_root() {
    let d = decode("name: solo\nchild:\n  type: module\n  gives:\n    clk_0: {}\ntakes:\n  clk_1: {}\n");
    let forest = build_module("solo", &d).unwrap();
    assert_eq!(forest.roots().len(), 1);
    let t = take(&forest, "solo", "clk_1");
    let g = give(&forest, "solo:child", "clk_0");
    assert!(connected(&forest, t, g));
}
