use serde::{Deserialize, Serialize};

/// Structured dietary filter. Every field is optional on the wire and
/// absent means `false`; false fields are not serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietaryPreferences {
    #[serde(default, skip_serializing_if = "is_false")]
    pub only_vegetarian: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub only_vegan: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub only_meat: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub only_chicken: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub only_fish_seafood: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub exclude_meat: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub exclude_chicken: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub exclude_fish_seafood: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub exclude_gluten: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl DietaryPreferences {
    /// Preferences with exactly one field set.
    pub fn only(field: PreferenceField) -> Self {
        let mut prefs = Self::default();
        field.set(&mut prefs, true);
        prefs
    }

    /// True when no field is set, i.e. no filtering applies.
    pub fn is_empty(&self) -> bool {
        self.active_fields().next().is_none()
    }

    /// Whether any inclusion (`only*`) field is set.
    pub fn has_inclusions(&self) -> bool {
        self.active_fields().any(|f| f.is_inclusion())
    }

    /// Fields currently set, in declaration order.
    pub fn active_fields(&self) -> impl Iterator<Item = PreferenceField> + '_ {
        PreferenceField::ALL.into_iter().filter(|f| f.get(self))
    }

    /// Field-wise OR of two preference sets.
    pub fn merge(mut self, other: &DietaryPreferences) -> Self {
        for field in other.active_fields() {
            field.set(&mut self, true);
        }
        self
    }
}

/// One of the nine preference flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceField {
    OnlyVegetarian,
    OnlyVegan,
    OnlyMeat,
    OnlyChicken,
    OnlyFishSeafood,
    ExcludeMeat,
    ExcludeChicken,
    ExcludeFishSeafood,
    ExcludeGluten,
}

impl PreferenceField {
    pub const ALL: [PreferenceField; 9] = [
        PreferenceField::OnlyVegetarian,
        PreferenceField::OnlyVegan,
        PreferenceField::OnlyMeat,
        PreferenceField::OnlyChicken,
        PreferenceField::OnlyFishSeafood,
        PreferenceField::ExcludeMeat,
        PreferenceField::ExcludeChicken,
        PreferenceField::ExcludeFishSeafood,
        PreferenceField::ExcludeGluten,
    ];

    pub fn get(self, prefs: &DietaryPreferences) -> bool {
        match self {
            PreferenceField::OnlyVegetarian => prefs.only_vegetarian,
            PreferenceField::OnlyVegan => prefs.only_vegan,
            PreferenceField::OnlyMeat => prefs.only_meat,
            PreferenceField::OnlyChicken => prefs.only_chicken,
            PreferenceField::OnlyFishSeafood => prefs.only_fish_seafood,
            PreferenceField::ExcludeMeat => prefs.exclude_meat,
            PreferenceField::ExcludeChicken => prefs.exclude_chicken,
            PreferenceField::ExcludeFishSeafood => prefs.exclude_fish_seafood,
            PreferenceField::ExcludeGluten => prefs.exclude_gluten,
        }
    }

    pub fn set(self, prefs: &mut DietaryPreferences, value: bool) {
        let slot = match self {
            PreferenceField::OnlyVegetarian => &mut prefs.only_vegetarian,
            PreferenceField::OnlyVegan => &mut prefs.only_vegan,
            PreferenceField::OnlyMeat => &mut prefs.only_meat,
            PreferenceField::OnlyChicken => &mut prefs.only_chicken,
            PreferenceField::OnlyFishSeafood => &mut prefs.only_fish_seafood,
            PreferenceField::ExcludeMeat => &mut prefs.exclude_meat,
            PreferenceField::ExcludeChicken => &mut prefs.exclude_chicken,
            PreferenceField::ExcludeFishSeafood => &mut prefs.exclude_fish_seafood,
            PreferenceField::ExcludeGluten => &mut prefs.exclude_gluten,
        };
        *slot = value;
    }

    /// Wire name, as used in JSON and in model prompts.
    pub fn key(self) -> &'static str {
        match self {
            PreferenceField::OnlyVegetarian => "onlyVegetarian",
            PreferenceField::OnlyVegan => "onlyVegan",
            PreferenceField::OnlyMeat => "onlyMeat",
            PreferenceField::OnlyChicken => "onlyChicken",
            PreferenceField::OnlyFishSeafood => "onlyFishSeafood",
            PreferenceField::ExcludeMeat => "excludeMeat",
            PreferenceField::ExcludeChicken => "excludeChicken",
            PreferenceField::ExcludeFishSeafood => "excludeFishSeafood",
            PreferenceField::ExcludeGluten => "excludeGluten",
        }
    }

    pub fn is_inclusion(self) -> bool {
        matches!(
            self,
            PreferenceField::OnlyVegetarian
                | PreferenceField::OnlyVegan
                | PreferenceField::OnlyMeat
                | PreferenceField::OnlyChicken
                | PreferenceField::OnlyFishSeafood
        )
    }
}

/// Preset filters that bypass the model entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickFilter {
    Vegetarian,
    Vegan,
    NoMeat,
    MeatOnly,
    ChickenOnly,
    SeafoodOnly,
    GlutenFree,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 7] = [
        QuickFilter::Vegetarian,
        QuickFilter::Vegan,
        QuickFilter::NoMeat,
        QuickFilter::MeatOnly,
        QuickFilter::ChickenOnly,
        QuickFilter::SeafoodOnly,
        QuickFilter::GlutenFree,
    ];

    /// The single preference field this preset controls.
    pub fn field(self) -> PreferenceField {
        match self {
            QuickFilter::Vegetarian => PreferenceField::OnlyVegetarian,
            QuickFilter::Vegan => PreferenceField::OnlyVegan,
            QuickFilter::NoMeat => PreferenceField::ExcludeMeat,
            QuickFilter::MeatOnly => PreferenceField::OnlyMeat,
            QuickFilter::ChickenOnly => PreferenceField::OnlyChicken,
            QuickFilter::SeafoodOnly => PreferenceField::OnlyFishSeafood,
            QuickFilter::GlutenFree => PreferenceField::ExcludeGluten,
        }
    }

    pub fn preferences(self) -> DietaryPreferences {
        DietaryPreferences::only(self.field())
    }
}
