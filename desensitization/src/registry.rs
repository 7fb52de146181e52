//! Named layout registration.
//!
//! A logging configuration refers to layouts by name (`"type"`). The registry
//! resolves that name to a factory and builds the layout from the rest of the
//! [`LayoutConfig`].

use std::{collections::HashMap, fmt};

use crate::{
    error::{Error, Result},
    layout::{
        DesensitizationLayout, Layout, LayoutConfig, PatternLayout, DESENSITIZATION_LAYOUT,
        PATTERN_LAYOUT,
    },
};

/// Builds a layout from its configuration.
pub type LayoutFactory = Box<dyn Fn(&LayoutConfig) -> Result<Box<dyn Layout>> + Send + Sync>;

/// Layout factories keyed by type name.
///
/// [`LayoutRegistry::default`] knows `"desensitization"` and `"pattern"`.
/// Registries are plain values: build one at startup and pass it to whatever
/// constructs the outputs.
pub struct LayoutRegistry {
    factories: HashMap<String, LayoutFactory>,
}

impl LayoutRegistry {
    /// A registry with no layouts.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn add_layout<F, L>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&LayoutConfig) -> Result<L> + Send + Sync + 'static,
        L: Layout + 'static,
    {
        let boxed: LayoutFactory =
            Box::new(move |config: &LayoutConfig| -> Result<Box<dyn Layout>> {
                Ok(Box::new(factory(config)?))
            });
        self.factories.insert(name.into(), boxed);
        self
    }

    /// Returns `true` if a layout is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Builds the layout named by `config.layout_type`.
    pub fn build(&self, config: &LayoutConfig) -> Result<Box<dyn Layout>> {
        let factory = self
            .factories
            .get(&config.layout_type)
            .ok_or_else(|| Error::UnknownLayout(config.layout_type.clone()))?;
        factory(config)
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .add_layout(DESENSITIZATION_LAYOUT, DesensitizationLayout::new)
            .add_layout(PATTERN_LAYOUT, PatternLayout::from_config);
        registry
    }
}

impl fmt::Debug for LayoutRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("LayoutRegistry")
            .field("layouts", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use serde_json::json;

    use super::LayoutRegistry;
    use crate::{
        event::{Level, LogEvent},
        layout::LayoutConfig,
        Error,
    };

    fn event() -> LogEvent {
        LogEvent::builder()
            .start_time(Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
            .pid(1)
            .level(Level::Warn)
            .category("auth")
            .payload(json!({"password": "a123456"}))
            .build()
            .unwrap()
    }

    #[test]
    fn default_registry_builds_both_layouts() {
        let registry = LayoutRegistry::default();

        let masked = registry
            .build(&LayoutConfig::desensitization(["password"]))
            .unwrap();
        assert!(masked.format(&event()).ends_with(r#"{"password":"a*****6"}"#));

        let plain = registry.build(&LayoutConfig::pattern("%p %m")).unwrap();
        assert_eq!(plain.format(&event()), r#"WARN {"password":"a123456"}"#);
    }

    #[test]
    fn unknown_layout_is_an_error() {
        let registry = LayoutRegistry::default();
        let config = LayoutConfig {
            layout_type: "json".to_string(),
            ..LayoutConfig::default()
        };
        assert!(matches!(
            registry.build(&config),
            Err(Error::UnknownLayout(name)) if name == "json"
        ));
    }

    #[test]
    fn closures_can_be_registered() {
        let mut registry = LayoutRegistry::empty();
        registry.add_layout("upper", |config: &LayoutConfig| -> crate::Result<_> {
            let mask = config.mask;
            Ok(move |event: &LogEvent| format!("{mask}{}", event.category_name.to_uppercase()))
        });
        assert!(registry.contains("upper"));

        let config = LayoutConfig {
            layout_type: "upper".to_string(),
            ..LayoutConfig::default()
        };
        assert_eq!(registry.build(&config).unwrap().format(&event()), "*AUTH");
    }

    #[test]
    fn configuration_errors_surface_at_build_time() {
        let registry = LayoutRegistry::default();
        assert!(matches!(
            registry.build(&LayoutConfig::desensitization([""])),
            Err(Error::InvalidFieldName { .. })
        ));
        assert!(matches!(
            registry.build(&LayoutConfig::pattern("%x")),
            Err(Error::InvalidPattern { .. })
        ));
    }
}
