use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::allergen::entities::Allergen;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub name: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub dietary_classification: DietaryClassification,
    pub meat_types: BTreeSet<MeatType>,
    pub allergens: BTreeSet<Allergen>,
    pub confidence_note: Option<String>,
    pub image_url: Option<String>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            ingredients: Vec::new(),
            dietary_classification: DietaryClassification::Unknown,
            meat_types: BTreeSet::new(),
            allergens: BTreeSet::new(),
            confidence_note: None,
            image_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryClassification {
    Vegetarian,
    NonVegetarian,
    Vegan,
    #[default]
    Unknown,
}

impl DietaryClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryClassification::Vegetarian => "vegetarian",
            DietaryClassification::NonVegetarian => "non-vegetarian",
            DietaryClassification::Vegan => "vegan",
            DietaryClassification::Unknown => "unknown",
        }
    }

    /// Maps whatever label the model produced onto the fixed enumeration.
    /// Anything unrecognised is `Unknown`.
    pub fn from_label(raw: &str) -> Self {
        let label = raw
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");

        match label.as_str() {
            "vegan" | "plant-based" => DietaryClassification::Vegan,
            "vegetarian" | "veg" | "veggie" | "lacto-vegetarian" | "ovo-vegetarian"
            | "lacto-ovo-vegetarian" => DietaryClassification::Vegetarian,
            "non-vegetarian" | "nonvegetarian" | "non-veg" | "nonveg" | "meat"
            | "contains-meat" | "pescatarian" => DietaryClassification::NonVegetarian,
            _ => DietaryClassification::Unknown,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum MeatType {
    Pork,
    Beef,
    Other,
}

impl MeatType {
    const PORK: &'static [&'static str] = &[
        "pork", "pig", "bacon", "ham", "prosciutto", "pancetta", "chorizo", "lard", "salami",
        "guanciale",
    ];
    const BEEF: &'static [&'static str] = &["beef", "steak", "veal", "brisket", "oxtail", "wagyu"];
    const NONE: &'static [&'static str] = &["", "none", "n/a", "na", "no", "null", "nil", "-"];

    /// `None` for tokens that say "no meat".
    pub fn from_token(raw: &str) -> Option<Self> {
        let token = raw.trim().to_lowercase();
        if Self::NONE.contains(&token.as_str()) {
            return None;
        }

        let words: Vec<&str> = token
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        if words.iter().any(|w| Self::PORK.contains(w)) {
            Some(MeatType::Pork)
        } else if words.iter().any(|w| Self::BEEF.contains(w)) {
            Some(MeatType::Beef)
        } else {
            Some(MeatType::Other)
        }
    }
}
