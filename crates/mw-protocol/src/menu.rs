use serde::{Deserialize, Serialize};

/// A menu item as submitted for dietary analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Display name, e.g. "Chicken Shawarma".
    pub name: String,
    /// Free-text description. Absent and empty are equivalent.
    #[serde(default)]
    pub description: String,
}

impl MenuItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    pub fn with_description(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Anything that looks like a dish: the filter and classifier only need
/// a name and a description.
pub trait Dish {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn cache_key(&self) -> String {
        normalize_name(self.name())
    }
}

impl Dish for MenuItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<T: Dish + ?Sized> Dish for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}

/// Normalize an item name into its cache key: trimmed and lower-cased.
///
/// The description is deliberately not part of the key, so two items that
/// share a name share one analysis.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
