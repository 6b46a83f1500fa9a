//! Generic descriptor trees.
//!
//! A module descriptor is decoded from structured text into a [`Descriptor`]:
//! a tree of ordered string-keyed maps, sequences, and scalars. The graph
//! builder only ever sees this tree, never the text format.
//!
//! # Example
//!
//! ```text
//! name: board
//! gives:
//!   gpio_3: {}
//!   uart_0:
//!     baud: "9600 115200"
//! constraints:
//!   gpio:
//!     voltage: "=3.3"
//! mcu:
//!   type: module
//!   takes:
//!     gpio_3:
//!       link: led
//! ```

mod keys;

pub use keys::{
    classify_key, DescriptorKeyKind, CONSTRAINT_KEYS, GIVE_KEYS, INDEX_KEY, LINK_KEYS, NAME_KEY,
    RECIPROCAL_KEY, SCOPE_KEY, TAKE_KEYS, TYPE_KEY,
};

use std::fmt;

use crate::error::{GrammarError, ModwireError, Result};

/// A decoded descriptor value.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// Explicit null or an empty YAML value
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Descriptor>),
    /// Mapping with keys kept in document order
    Map(Vec<(String, Descriptor)>),
}

impl Descriptor {
    /// Build a mapping from key/value pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Descriptor)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Mapping entries, if this is a mapping.
    pub fn as_map(&self) -> Option<&[(String, Descriptor)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// String contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a mapping entry by exact key.
    pub fn get(&self, key: &str) -> Option<&Descriptor> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Check if this is a scalar (string, number, or boolean).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::Str(_)
        )
    }

    /// Render a scalar as a single raw token.
    pub fn scalar_token(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Flatten into raw tokens for the constraint grammar.
    ///
    /// A string is split on ASCII spaces; a sequence is taken item by item
    /// without further splitting; other scalars become one token.
    pub fn to_tokens(&self) -> std::result::Result<Vec<String>, GrammarError> {
        match self {
            Self::Null => Ok(Vec::new()),
            Self::Str(s) => Ok(s
                .split(' ')
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()),
            Self::Seq(items) => items
                .iter()
                .map(|item| {
                    item.scalar_token()
                        .ok_or_else(|| GrammarError::UnsupportedValue {
                            message: format!("nested {} inside a value list", item.kind_name()),
                        })
                })
                .collect(),
            Self::Map(_) => Err(GrammarError::UnsupportedValue {
                message: "a mapping cannot be used as a value".to_string(),
            }),
            scalar => Ok(scalar.scalar_token().into_iter().collect()),
        }
    }

    /// Short name of the value shape, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "mapping",
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "~"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => write!(f, "{}", s),
            Self::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl TryFrom<serde_yaml::Value> for Descriptor {
    type Error = String;

    fn try_from(value: serde_yaml::Value) -> std::result::Result<Self, Self::Error> {
        use serde_yaml::Value;

        Ok(match value {
            Value::Null => Descriptor::Null,
            Value::Bool(b) => Descriptor::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Descriptor::Int(i)
                } else if let Some(x) = n.as_f64() {
                    Descriptor::Float(x)
                } else {
                    return Err(format!("unrepresentable number {}", n));
                }
            }
            Value::String(s) => Descriptor::Str(s),
            Value::Sequence(items) => Descriptor::Seq(
                items
                    .into_iter()
                    .map(Descriptor::try_from)
                    .collect::<std::result::Result<_, _>>()?,
            ),
            Value::Mapping(mapping) => {
                let mut entries = Vec::with_capacity(mapping.len());
                for (k, v) in mapping {
                    let key = match Descriptor::try_from(k)? {
                        Descriptor::Null => return Err("null mapping key".to_string()),
                        key if key.is_scalar() => key.to_string(),
                        key => return Err(format!("{} used as a mapping key", key.kind_name())),
                    };
                    entries.push((key, Descriptor::try_from(v)?));
                }
                Descriptor::Map(entries)
            }
            // Tags carry no meaning for descriptors; keep the tagged value
            Value::Tagged(tagged) => Descriptor::try_from(tagged.value)?,
        })
    }
}

/// Decode a descriptor from YAML (or JSON) text.
///
/// `origin` names the source in error messages.
pub fn from_str(input: &str, origin: &str) -> Result<Descriptor> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(input).map_err(|e| ModwireError::DescriptorDecode {
            path: origin.to_string(),
            source: e,
        })?;
    Descriptor::try_from(value).map_err(|message| ModwireError::invalid_descriptor(origin, message))
}

/// Read and decode a descriptor file.
pub fn load_file(path: &std::path::Path) -> Result<Descriptor> {
    let content = std::fs::read_to_string(path).map_err(|e| ModwireError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    from_str(&content, &path.display().to_string())
}
