//! Function definitions loaded from configuration.
//!
//! A host typically keeps its formulas in a config file rather than in
//! code. A spec file is JSON holding either one definition
//!
//! ```json
//! { "expression": "gain * rand()", "inputs": ["gain"], "seed": 4660 }
//! ```
//!
//! or a map of named definitions:
//!
//! ```json
//! { "noise": { "expression": "rand()" }, "clip": { "expression": "min(x, 1)", "inputs": ["x"] } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{CompileError, ConfigError};
use crate::function::Function;
use crate::numeric::Numeric;

/// One expression together with its input list and optional seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionSpec {
    pub expression: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u16>,
}

impl FunctionSpec {
    pub fn new(expression: impl Into<String>, inputs: Vec<String>) -> Self {
        FunctionSpec {
            expression: expression.into(),
            inputs,
            seed: None,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Compile into a function, seeding its generator if a seed is set.
    pub fn build<T: Numeric>(&self) -> Result<Function<T>, CompileError> {
        let mut function = match self.seed {
            Some(seed) => Function::with_seed(seed),
            None => Function::new(),
        };
        function.recompile(&self.expression, &self.inputs)?;
        Ok(function)
    }
}

/// Contents of a spec file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SpecFile {
    Single(FunctionSpec),
    Set(BTreeMap<String, FunctionSpec>),
}

impl SpecFile {
    /// A top-level string `expression` marks a single definition, so its
    /// field errors are reported as such instead of as a failed set.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        if value.get("expression").is_some_and(Value::is_string) {
            Ok(SpecFile::Single(serde_json::from_value(value)?))
        } else {
            Ok(SpecFile::Set(serde_json::from_value(value)?))
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file = SpecFile::from_json(&text)?;
        debug!(path = %path.display(), functions = file.len(), "spec file loaded");
        Ok(file)
    }

    pub fn len(&self) -> usize {
        match self {
            SpecFile::Single(_) => 1,
            SpecFile::Set(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pick a definition. A single-definition file ignores `name`; a set
    /// needs one unless it holds exactly one entry.
    pub fn select(&self, name: Option<&str>) -> Result<&FunctionSpec, ConfigError> {
        match (self, name) {
            (SpecFile::Single(spec), _) => Ok(spec),
            (SpecFile::Set(set), Some(name)) => set
                .get(name)
                .ok_or_else(|| ConfigError::UnknownName(name.to_string())),
            (SpecFile::Set(set), None) => {
                let mut specs = set.values();
                match (specs.next(), specs.next()) {
                    (Some(spec), None) => Ok(spec),
                    _ => Err(ConfigError::Ambiguous(set.len())),
                }
            }
        }
    }

    /// Compile every definition, keyed by name (`""` for a single spec).
    pub fn build_all<T: Numeric>(&self) -> Result<BTreeMap<String, Function<T>>, ConfigError> {
        let mut functions = BTreeMap::new();
        match self {
            SpecFile::Single(spec) => {
                functions.insert(String::new(), spec.build()?);
            }
            SpecFile::Set(set) => {
                for (name, spec) in set {
                    functions.insert(name.clone(), spec.build()?);
                }
            }
        }
        Ok(functions)
    }
}
