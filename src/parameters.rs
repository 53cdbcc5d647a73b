//! Parameter bindings passed through to the stylesheet.
//!
//! Bindings arrive from the host as an ordered name/value sequence. The
//! reserved name `input` carries the XML input document itself and is never
//! forwarded to the engine; everything else becomes a positional
//! `name=value` argument, in source order.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Reserved binding name whose value is the XML input document.
pub const INPUT_BINDING_NAME: &str = "input";

/// A single named value forwarded to the stylesheet.
///
/// Values are plain strings at this boundary. Richer host values must be
/// stringified by the caller before the binding is constructed (numbers in
/// decimal, booleans as `true`/`false`).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ParameterBinding {
    pub name: String,
    pub value: String,
}

impl ParameterBinding {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether this binding carries the input document rather than an
    /// engine parameter.
    pub fn is_input(&self) -> bool {
        self.name == INPUT_BINDING_NAME
    }
}

impl Display for ParameterBinding {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}={}", self.name, self.value)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.contains('=')
        || name.chars().any(char::is_whitespace)
    {
        return Err(Error::InvalidParameterName(name.to_string()));
    }

    Ok(())
}

/// Splits the raw host variable sequence into the input document text and
/// the remaining engine parameters, preserving parameter order.
///
/// When the host supplies `input` more than once the last occurrence wins.
pub fn partition_bindings(bindings: Vec<ParameterBinding>) -> (Option<String>, Vec<ParameterBinding>) {
    let mut document = None;
    let mut parameters = Vec::new();

    for binding in bindings {
        if binding.is_input() {
            document = Some(binding.value);
        } else {
            parameters.push(binding);
        }
    }

    (document, parameters)
}

/// Serializes bindings into the `name=value` entries of the argument
/// vector, in source order.
///
/// Bindings named `input` are skipped. Empty serialized entries are
/// filtered out before the vector is returned.
///
/// # Errors
///
/// Returns [`Error::InvalidParameterName`] if a name is empty or contains
/// whitespace or `=`.
pub fn build_parameter_args(bindings: &[ParameterBinding]) -> Result<Vec<String>> {
    let mut args = Vec::new();

    for binding in bindings {
        if binding.is_input() {
            continue;
        }

        validate_name(&binding.name)?;
        args.push(binding.to_string());
    }

    Ok(args.into_iter().filter(|entry| !entry.is_empty()).collect())
}
