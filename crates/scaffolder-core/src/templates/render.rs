//! Template rendering with Tera
//!
//! Templates use Tera syntax (version [`SYNTAX_VERSION`]):
//!
//! - `{{ projectName }}` is replaced by the variable's value. A name the
//!   template does not declare is a render error.
//! - `{% if includeAxios %} ... {% else %} ... {% endif %}` (and `if not`)
//!   keep or drop a section. Optional lines are written as
//!   `{%- if flag %}` / `{%- endif %}` on their own lines so the trimmed
//!   whitespace takes the newline with it.
//! - Vue's own `{{ msg }}` interpolations are wrapped in
//!   `{% raw %} ... {% endraw %}` and come out untouched.
//!
//! Autoescaping is off for every file, `.html` included.

use crate::config::ProjectConfig;
use crate::templates::catalog::Var;
use serde::Serialize;
use std::collections::BTreeMap;
use tera::{Context, Tera};

/// Bumped whenever the template grammar changes
pub const SYNTAX_VERSION: u32 = 2;

/// A substitution value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Flag(bool),
}

/// Closed set of named values available to one template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<&'static str, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the variables a catalog entry declares against the config
    ///
    /// Repeated declarations resolve to the same value and collapse into one.
    pub fn for_entry(vars: &[Var], config: &ProjectConfig) -> Self {
        let mut variables = Self::new();
        for var in vars {
            variables.values.insert(var.key(), var.resolve(config));
        }
        variables
    }

    pub fn insert(&mut self, key: &'static str, value: Value) -> &mut Self {
        self.values.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Tera context holding exactly these variables
    pub fn to_context(&self) -> Context {
        let mut context = Context::new();
        for (key, value) in &self.values {
            context.insert(*key, value);
        }
        context
    }
}

/// Render `template`, registered under `name`, with `vars`
pub fn render(name: &str, template: &str, vars: &Variables) -> Result<String, tera::Error> {
    let mut tera = Tera::default();
    tera.autoescape_on(Vec::new());
    tera.add_raw_template(name, template)?;
    tera.render(name, &vars.to_context())
}
