//! Dietary tags shown next to a dish.

use mw_protocol::DietaryAnalysis;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryTag {
    Vegan,
    Vegetarian,
    Meat,
    Chicken,
    Seafood,
    GlutenFree,
}

impl DietaryTag {
    pub fn label(self) -> &'static str {
        match self {
            DietaryTag::Vegan => "Vegan",
            DietaryTag::Vegetarian => "Vegetarian",
            DietaryTag::Meat => "Meat",
            DietaryTag::Chicken => "Chicken",
            DietaryTag::Seafood => "Seafood",
            DietaryTag::GlutenFree => "Gluten Free",
        }
    }
}

/// Tags for an analysis. `Vegan` replaces `Vegetarian` rather than adding to it.
pub fn tags_for(analysis: &DietaryAnalysis) -> Vec<DietaryTag> {
    let mut tags = Vec::new();
    if analysis.is_vegan {
        tags.push(DietaryTag::Vegan);
    } else if analysis.is_vegetarian {
        tags.push(DietaryTag::Vegetarian);
    }
    if analysis.contains_meat {
        tags.push(DietaryTag::Meat);
    }
    if analysis.contains_chicken {
        tags.push(DietaryTag::Chicken);
    }
    if analysis.contains_fish_seafood {
        tags.push(DietaryTag::Seafood);
    }
    if analysis.gluten_free {
        tags.push(DietaryTag::GlutenFree);
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vegan_supersedes_vegetarian() {
        let analysis = DietaryAnalysis {
            is_vegetarian: true,
            is_vegan: true,
            gluten_free: true,
            ..Default::default()
        };
        assert_eq!(
            tags_for(&analysis),
            vec![DietaryTag::Vegan, DietaryTag::GlutenFree]
        );
    }

    #[test]
    fn meat_and_chicken() {
        let analysis = DietaryAnalysis {
            contains_meat: true,
            contains_chicken: true,
            ..Default::default()
        };
        assert_eq!(
            tags_for(&analysis),
            vec![DietaryTag::Meat, DietaryTag::Chicken]
        );
    }

    #[test]
    fn no_flags_no_tags() {
        assert!(tags_for(&DietaryAnalysis::default()).is_empty());
    }

    #[test]
    fn labels_and_ids() {
        assert_eq!(DietaryTag::GlutenFree.label(), "Gluten Free");
        assert_eq!(
            serde_json::to_string(&DietaryTag::GlutenFree).unwrap(),
            r#""gluten-free""#
        );
    }
}
