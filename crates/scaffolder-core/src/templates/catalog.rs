//! The fixed list of files a project is generated from

use crate::config::{Feature, ProjectConfig};
use crate::templates::render::Value;

/// Decides whether an entry is rendered for a given config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Always,
    Feature(Feature),
}

impl Predicate {
    pub fn holds(&self, config: &ProjectConfig) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Feature(feature) => config.includes(*feature),
        }
    }
}

/// A substitution variable a template may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Var {
    /// The display name, as typed by the user
    ProjectName,
    /// The display name reduced to an npm package name
    PackageName,
    /// A feature flag, rendered as `true`/`false` and usable in `{% if %}` blocks
    Flag(Feature),
}

impl Var {
    pub fn key(&self) -> &'static str {
        match self {
            Var::ProjectName => "projectName",
            Var::PackageName => "packageName",
            Var::Flag(feature) => feature.key(),
        }
    }

    pub fn resolve(&self, config: &ProjectConfig) -> Value {
        match self {
            Var::ProjectName => Value::Text(config.name().to_string()),
            Var::PackageName => Value::Text(config.package_name()),
            Var::Flag(feature) => Value::Flag(config.includes(*feature)),
        }
    }
}

/// One potential output: a file, or a directory rendered recursively
#[derive(Debug, Clone, Copy)]
pub struct TemplateEntry {
    /// Path inside the template bundle
    pub source: &'static str,
    /// Path relative to the project directory
    pub destination: &'static str,
    pub when: Predicate,
    pub vars: &'static [Var],
}

impl TemplateEntry {
    pub const fn new(source: &'static str, destination: &'static str) -> Self {
        Self {
            source,
            destination,
            when: Predicate::Always,
            vars: &[],
        }
    }

    pub const fn when(mut self, feature: Feature) -> Self {
        self.when = Predicate::Feature(feature);
        self
    }

    pub const fn vars(mut self, vars: &'static [Var]) -> Self {
        self.vars = vars;
        self
    }

    pub fn applies_to(&self, config: &ProjectConfig) -> bool {
        self.when.holds(config)
    }
}

/// An ordered set of entries plus directories created empty
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub entries: &'static [TemplateEntry],
    pub directories: &'static [&'static str],
}

impl Catalog {
    /// Entries whose predicate holds for `config`, in catalog order
    pub fn applicable<'a>(
        &'a self,
        config: &'a ProjectConfig,
    ) -> impl Iterator<Item = &'a TemplateEntry> + 'a {
        self.entries.iter().filter(move |e| e.applies_to(config))
    }

    /// Entry that writes `destination`, if any
    pub fn entry_for(&self, destination: &str) -> Option<&TemplateEntry> {
        self.entries.iter().find(|e| e.destination == destination)
    }
}

const PACKAGE_VARS: &[Var] = &[
    Var::PackageName,
    Var::Flag(Feature::Axios),
    Var::Flag(Feature::MomentJs),
    Var::Flag(Feature::Jquery),
    Var::Flag(Feature::FontAwesome),
    Var::Flag(Feature::Vue2Animate),
    Var::Flag(Feature::VueRouter),
    Var::Flag(Feature::Vuex),
];

const WEBPACK_VARS: &[Var] = &[
    Var::Flag(Feature::Axios),
    Var::Flag(Feature::Jquery),
    Var::Flag(Feature::FontAwesome),
    Var::Flag(Feature::Vue2Animate),
    Var::Flag(Feature::VueRouter),
];

const APP_VARS: &[Var] = &[Var::Flag(Feature::VueRouter), Var::Flag(Feature::Vuex)];

const INDEX_JS_VARS: &[Var] = &[
    Var::Flag(Feature::VueRouter),
    Var::Flag(Feature::Vuex),
    Var::Flag(Feature::FontAwesome),
    Var::Flag(Feature::Vue2Animate),
];

/// The Vue starter project, in write order
pub const STARTER: Catalog = Catalog {
    entries: &[
        TemplateEntry::new("_package.json", "package.json").vars(PACKAGE_VARS),
        TemplateEntry::new("babelrc", ".babelrc"),
        TemplateEntry::new("postcss.config.js", "postcss.config.js"),
        TemplateEntry::new("webpack.config.js", "webpack.config.js").vars(WEBPACK_VARS),
        TemplateEntry::new("src/router.js", "src/router.js").when(Feature::VueRouter),
        TemplateEntry::new("src/store", "src/store").when(Feature::Vuex),
        TemplateEntry::new("src/components", "src/components"),
        TemplateEntry::new("src/App.vue", "src/App.vue").vars(APP_VARS),
        TemplateEntry::new("src/index.html", "src/index.html").vars(&[Var::ProjectName]),
        TemplateEntry::new("src/index.js", "src/index.js").vars(INDEX_JS_VARS),
    ],
    directories: &["src/assets"],
};
