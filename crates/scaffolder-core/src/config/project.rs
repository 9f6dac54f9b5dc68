//! The configuration record collected from the user

use crate::error::{Result, ScaffoldError};
use clap::ValueEnum;
use std::fmt;

/// Project name used when the user accepts the default
pub const DEFAULT_PROJECT_NAME: &str = "Vue Starter";

/// Which prompt a feature is offered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureGroup {
    /// Framework add-ons (state store, router)
    Additional,
    /// Utility libraries added to the dependency manifest
    Utility,
}

/// Optional features a generated project can include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Feature {
    #[value(name = "vuex")]
    Vuex,
    #[value(name = "router")]
    VueRouter,
    #[value(name = "axios")]
    Axios,
    #[value(name = "moment")]
    MomentJs,
    #[value(name = "jquery")]
    Jquery,
    #[value(name = "animate")]
    Vue2Animate,
    #[value(name = "fontawesome")]
    FontAwesome,
}

impl Feature {
    /// Every feature, in prompt order
    pub const ALL: [Feature; 7] = [
        Feature::Vuex,
        Feature::VueRouter,
        Feature::Axios,
        Feature::MomentJs,
        Feature::Jquery,
        Feature::Vue2Animate,
        Feature::FontAwesome,
    ];

    /// Flag name as it appears in templates
    pub fn key(&self) -> &'static str {
        match self {
            Feature::Vuex => "includeVuex",
            Feature::VueRouter => "includeVueRouter",
            Feature::Axios => "includeAxios",
            Feature::MomentJs => "includeMomentJs",
            Feature::Jquery => "includeJquery",
            Feature::Vue2Animate => "includeVue2Animate",
            Feature::FontAwesome => "includeFontAwesome",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::Vuex => "Vuex",
            Feature::VueRouter => "Vue Router",
            Feature::Axios => "Axios",
            Feature::MomentJs => "Moment js",
            Feature::Jquery => "Jquery",
            Feature::Vue2Animate => "Vue2 Animate",
            Feature::FontAwesome => "FontAwesome 4",
        }
    }

    pub fn group(&self) -> FeatureGroup {
        match self {
            Feature::Vuex | Feature::VueRouter => FeatureGroup::Additional,
            _ => FeatureGroup::Utility,
        }
    }

    /// Whether the feature is pre-selected in the prompts
    pub fn default_enabled(&self) -> bool {
        true
    }

    /// Features offered in the given prompt, in prompt order
    pub fn in_group(group: FeatureGroup) -> impl Iterator<Item = Feature> {
        Self::ALL.into_iter().filter(move |f| f.group() == group)
    }

    /// Parse a feature from its command-line name or its template key
    pub fn parse(name: &str) -> Result<Feature> {
        let trimmed = name.trim();
        if let Ok(feature) = <Feature as ValueEnum>::from_str(trimmed, true) {
            return Ok(feature);
        }
        Self::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ScaffoldError::UnknownFeature {
                name: trimmed.to_string(),
                available: Self::ALL
                    .iter()
                    .filter_map(|f| f.to_possible_value())
                    .map(|v| v.get_name().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One boolean per [`Feature`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub vuex: bool,
    pub vue_router: bool,
    pub axios: bool,
    pub moment_js: bool,
    pub jquery: bool,
    pub vue2_animate: bool,
    pub font_awesome: bool,
}

impl Default for Features {
    fn default() -> Self {
        let mut features = Self::none();
        for feature in Feature::ALL {
            features.set(feature, feature.default_enabled());
        }
        features
    }
}

impl Features {
    /// All features switched off
    pub fn none() -> Self {
        Self {
            vuex: false,
            vue_router: false,
            axios: false,
            moment_js: false,
            jquery: false,
            vue2_animate: false,
            font_awesome: false,
        }
    }

    /// Build from the list of features the user ticked; anything absent is off
    pub fn from_selected(selected: &[Feature]) -> Self {
        let mut features = Self::none();
        for feature in selected {
            features.set(*feature, true);
        }
        features
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Vuex => self.vuex,
            Feature::VueRouter => self.vue_router,
            Feature::Axios => self.axios,
            Feature::MomentJs => self.moment_js,
            Feature::Jquery => self.jquery,
            Feature::Vue2Animate => self.vue2_animate,
            Feature::FontAwesome => self.font_awesome,
        }
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        let slot = match feature {
            Feature::Vuex => &mut self.vuex,
            Feature::VueRouter => &mut self.vue_router,
            Feature::Axios => &mut self.axios,
            Feature::MomentJs => &mut self.moment_js,
            Feature::Jquery => &mut self.jquery,
            Feature::Vue2Animate => &mut self.vue2_animate,
            Feature::FontAwesome => &mut self.font_awesome,
        };
        *slot = enabled;
    }

    /// Copy of `self` with `feature` switched on
    pub fn with(mut self, feature: Feature) -> Self {
        self.set(feature, true);
        self
    }

    /// Copy of `self` with `feature` switched off
    pub fn without(mut self, feature: Feature) -> Self {
        self.set(feature, false);
        self
    }

    /// Enabled features, in prompt order
    pub fn enabled(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| self.is_enabled(*f))
            .collect()
    }
}

/// Resolved user choices that drive generation
///
/// Built once from the answers and only handed out by shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    name: String,
    features: Features,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
            features: Features::default(),
        }
    }
}

impl ProjectConfig {
    /// Validate the answers and build the record. The name is trimmed.
    pub fn new(name: impl AsRef<str>, features: Features) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ScaffoldError::InvalidProjectName);
        }
        Ok(Self {
            name: name.to_string(),
            features,
        })
    }

    /// Display name of the project
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn includes(&self, feature: Feature) -> bool {
        self.features.is_enabled(feature)
    }

    /// npm-compatible package name derived from the display name
    ///
    /// Lowercase ASCII alphanumerics separated by single hyphens; falls back to
    /// `app` when nothing usable remains.
    pub fn package_name(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        if slug.is_empty() {
            "app".to_string()
        } else {
            slug
        }
    }
}
