use serde_json::json;

use crate::domain::allergen::entities::Allergen;

/// Returns the JSON schema the vision model is asked to follow
pub fn get_menu_analysis_schema() -> serde_json::Value {
    let allergens: Vec<&str> = Allergen::ALL.iter().map(|a| a.name()).collect();

    json!({
        "type": "object",
        "properties": {
            "menu_items": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "description": { "type": "string" },
                        "classification": {
                            "type": "string",
                            "enum": ["vegetarian", "non-vegetarian", "vegan", "unknown"]
                        },
                        "meat": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "contains_pork": { "type": "boolean" },
                        "contains_beef": { "type": "boolean" },
                        "ingredients": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "allergens": {
                            "type": "array",
                            "items": { "type": "string", "enum": allergens }
                        },
                        "confidence": { "type": "string" }
                    },
                    "required": ["name", "classification", "ingredients", "allergens"]
                }
            },
            "cuisine_type": { "type": "string" },
            "language": { "type": "string" }
        },
        "required": ["menu_items", "language"]
    })
}

/// The fixed instruction sent with every menu photo.
pub fn menu_analysis_instruction() -> String {
    let allergens = Allergen::ALL
        .iter()
        .map(|a| a.name())
        .collect::<Vec<_>>()
        .join(", ");
    let schema = serde_json::to_string_pretty(&get_menu_analysis_schema()).unwrap_or_default();

    format!(
        "Analyze this restaurant menu image and extract detailed information about each dish, \
in the order the dishes appear on the menu.

For each dish provide:
1. name: the exact name of the dish as written on the menu
2. description: a short description of the dish
3. ingredients: the main ingredients you can identify or infer
4. classification: one of vegetarian, non-vegetarian, vegan or unknown
5. meat: every meat the dish contains (for example chicken, beef, pork, lamb, fish). \
Set contains_pork and contains_beef explicitly.
6. allergens: potential allergens, using only this list: {allergens}
7. confidence: a short note on how certain you are about this dish

Also report the cuisine_type if identifiable and the language the menu is written in.

Respond with JSON only, matching this schema:
{schema}"
    )
}
