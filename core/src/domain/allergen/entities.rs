use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The fixed allergen vocabulary the model is asked to report against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum Allergen {
    Dairy,
    Eggs,
    Nuts,
    Peanuts,
    Gluten,
    Soy,
    Shellfish,
    Fish,
    Sesame,
}

impl Allergen {
    pub const ALL: [Allergen; 9] = [
        Allergen::Dairy,
        Allergen::Eggs,
        Allergen::Nuts,
        Allergen::Peanuts,
        Allergen::Gluten,
        Allergen::Soy,
        Allergen::Shellfish,
        Allergen::Fish,
        Allergen::Sesame,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Allergen::Dairy => "Dairy",
            Allergen::Eggs => "Eggs",
            Allergen::Nuts => "Nuts",
            Allergen::Peanuts => "Peanuts",
            Allergen::Gluten => "Gluten",
            Allergen::Soy => "Soy",
            Allergen::Shellfish => "Shellfish",
            Allergen::Fish => "Fish",
            Allergen::Sesame => "Sesame",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Allergen::Dairy => "Milk and milk products",
            Allergen::Eggs => "Eggs and egg products",
            Allergen::Nuts => "Tree nuts (almonds, walnuts, cashews, etc.)",
            Allergen::Peanuts => "Peanuts and peanut products",
            Allergen::Gluten => "Wheat, barley, rye",
            Allergen::Soy => "Soybeans and soy products",
            Allergen::Shellfish => "Shrimp, crab, lobster, etc.",
            Allergen::Fish => "Fish and fish products",
            Allergen::Sesame => "Sesame seeds and sesame oil",
        }
    }

    fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Allergen::Dairy => &[
                "dairy", "milk", "lactose", "cheese", "butter", "cream", "yogurt", "yoghurt",
            ],
            Allergen::Eggs => &["eggs", "egg"],
            Allergen::Nuts => &[
                "nuts", "nut", "tree nuts", "tree nut", "almond", "almonds", "walnut", "walnuts",
                "cashew", "cashews", "pistachio", "pistachios", "hazelnut", "hazelnuts", "pecan",
                "pecans",
            ],
            Allergen::Peanuts => &["peanuts", "peanut", "groundnut", "groundnuts"],
            Allergen::Gluten => &["gluten", "wheat", "barley", "rye", "flour"],
            Allergen::Soy => &["soy", "soya", "soybean", "soybeans", "tofu"],
            Allergen::Shellfish => &[
                "shellfish", "crustacean", "crustaceans", "shrimp", "prawn", "prawns", "crab",
                "lobster", "mollusc", "molluscs", "mussels", "clams", "oysters",
            ],
            Allergen::Fish => &["fish", "anchovy", "anchovies", "salmon", "tuna", "cod"],
            Allergen::Sesame => &["sesame", "sesame seeds", "sesame oil", "tahini"],
        }
    }
}

/// Public view of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AllergenInfo {
    pub name: String,
    pub description: String,
}

/// Read-only allergen table, built once at start-up and shared.
#[derive(Debug, Clone)]
pub struct AllergenCatalog {
    entries: Vec<(String, Allergen)>,
}

impl AllergenCatalog {
    pub fn standard() -> Self {
        let entries = Allergen::ALL
            .iter()
            .flat_map(|allergen| {
                allergen
                    .synonyms()
                    .iter()
                    .map(move |synonym| (synonym.to_string(), *allergen))
            })
            .collect();

        Self { entries }
    }

    /// Case-insensitive lookup by name or synonym.
    pub fn resolve(&self, token: &str) -> Option<Allergen> {
        let needle = token
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|(synonym, _)| *synonym == needle)
            .map(|(_, allergen)| *allergen)
    }

    pub fn entries(&self) -> Vec<AllergenInfo> {
        Allergen::ALL
            .iter()
            .map(|allergen| AllergenInfo {
                name: allergen.name().to_string(),
                description: allergen.description().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_names_and_synonyms() {
        let catalog = AllergenCatalog::standard();
        assert_eq!(catalog.resolve("Dairy"), Some(Allergen::Dairy));
        assert_eq!(catalog.resolve(" MILK "), Some(Allergen::Dairy));
        assert_eq!(catalog.resolve("Tree Nuts"), Some(Allergen::Nuts));
        assert_eq!(catalog.resolve("wheat."), Some(Allergen::Gluten));
        assert_eq!(catalog.resolve("shrimp"), Some(Allergen::Shellfish));
        assert_eq!(catalog.resolve("mustard"), None);
        assert_eq!(catalog.resolve("   "), None);
    }

    #[test]
    fn test_entries_follow_catalog_order() {
        let entries = AllergenCatalog::standard().entries();
        assert_eq!(entries.len(), 9);
        assert_eq!(entries[0].name, "Dairy");
        assert_eq!(entries[8].name, "Sesame");
        assert_eq!(entries[8].description, "Sesame seeds and sesame oil");
    }
}
