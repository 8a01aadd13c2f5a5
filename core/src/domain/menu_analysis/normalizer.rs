//! Turns raw vision-model text into validated [`MenuItem`]s.
//!
//! Parsing never fails: strict JSON is tried first (raw text, fenced block,
//! outermost object or array), then the complete objects of a cut-off item
//! list or line heuristics, and finally an empty, degraded result. Field values are coerced through a fixed set of rules so
//! that missing or odd values land on documented defaults.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{
    allergen::entities::AllergenCatalog,
    menu_analysis::{
        entities::{DietaryClassification, MeatType, MenuItem},
        value_objects::NormalizedMenu,
    },
};

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*•]+|\d+[.)])\s+").expect("valid list marker regex"));

static LABELLED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*{0,2}([\p{L}][\p{L} _/-]{0,40}?)\*{0,2}\s*:\s*(.*)$")
        .expect("valid labelled line regex")
});

/// `"key": value,` as found in pretty-printed JSON.
static QUOTED_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^"([^"]{1,40})"\s*:\s*(.*?),?$"#).expect("valid quoted field regex")
});

static MARKDOWN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s*(.+?)\s*#*$").expect("valid heading regex"));

static BOLD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*:]+?)\*\*$").expect("valid bold heading regex"));

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMenuDocument {
    menu_items: Option<Value>,
    #[serde(rename = "menuItems")]
    menu_items_camel: Option<Value>,
    dishes: Option<Value>,
    items: Option<Value>,
    language: Option<Value>,
    menu_language: Option<Value>,
    cuisine_type: Option<Value>,
    cuisine: Option<Value>,
}

const ITEM_LIST_KEYS: [&str; 4] = ["menu_items", "menuItems", "dishes", "items"];
const ITEM_NAME_KEYS: [&str; 4] = ["name", "dish_name", "dish", "title"];

/// Every key the model has been seen to use for a dish field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMenuItem {
    name: Option<Value>,
    dish_name: Option<Value>,
    dish: Option<Value>,
    title: Option<Value>,
    description: Option<Value>,
    ingredients: Option<Value>,
    classification: Option<Value>,
    dietary_classification: Option<Value>,
    #[serde(rename = "dietaryClassification")]
    dietary_classification_camel: Option<Value>,
    food_type: Option<Value>,
    diet: Option<Value>,
    meat: Option<Value>,
    meat_type: Option<Value>,
    meat_types: Option<Value>,
    #[serde(rename = "meatTypeFlags")]
    meat_type_flags: Option<Value>,
    contains_pork: Option<Value>,
    contains_beef: Option<Value>,
    allergens: Option<Value>,
    confidence_note: Option<Value>,
    confidence: Option<Value>,
    certainty: Option<Value>,
}

#[derive(Debug, Default)]
struct ParsedDocument {
    items: Vec<RawMenuItem>,
    language: Option<String>,
    cuisine_type: Option<String>,
}

pub fn normalize_menu_response(raw: &str, catalog: &AllergenCatalog) -> NormalizedMenu {
    if let Some(document) = parse_structured(raw) {
        return document.into_normalized(catalog, false);
    }

    tracing::warn!(
        length = raw.len(),
        "Vision output is not structured JSON, falling back to text extraction"
    );

    let extracted = extract_from_text(raw);
    let salvaged = salvage_item_list(raw);

    // Whichever recovers more dishes wins; complete JSON objects win ties.
    let document = if !salvaged.is_empty() && salvaged.len() >= extracted.items.len() {
        ParsedDocument {
            items: salvaged,
            ..extracted
        }
    } else {
        extracted
    };

    let normalized = document.into_normalized(catalog, true);
    if normalized.items.is_empty() {
        tracing::warn!("No dishes could be recovered from vision output");
    }

    normalized
}

fn parse_structured(raw: &str) -> Option<ParsedDocument> {
    json_candidates(raw).into_iter().find_map(|candidate| {
        let value: Value = serde_json::from_str(candidate).ok()?;
        document_from_value(value)
    })
}

fn json_candidates(raw: &str) -> Vec<&str> {
    let trimmed = raw.trim();
    let mut candidates = vec![trimmed];
    candidates.extend(fenced_block(trimmed));
    candidates.extend(outer_span(trimmed, '{', '}'));
    candidates.extend(outer_span(trimmed, '[', ']'));
    candidates
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let body = text[start + 3..].trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let end = body.find("```")?;
    Some(body[..end].trim())
}

fn outer_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn document_from_value(value: Value) -> Option<ParsedDocument> {
    match value {
        Value::Array(items) => Some(ParsedDocument {
            items: raw_items(items),
            ..ParsedDocument::default()
        }),
        Value::Object(ref map) => {
            let has_list = ITEM_LIST_KEYS.iter().any(|key| map.contains_key(*key));
            if !has_list {
                // A lone dish object.
                let is_item = ITEM_NAME_KEYS.iter().any(|key| map.contains_key(*key));
                return is_item.then(|| ParsedDocument {
                    items: raw_items(vec![value]),
                    ..ParsedDocument::default()
                });
            }

            let document: RawMenuDocument = serde_json::from_value(value).ok()?;
            let language = first_text(&[&document.language, &document.menu_language]);
            let cuisine_type = first_text(&[&document.cuisine_type, &document.cuisine]);

            let listed = [
                document.menu_items,
                document.menu_items_camel,
                document.dishes,
                document.items,
            ]
            .into_iter()
            .flatten()
            .next();

            let items = match listed {
                Some(Value::Array(items)) => raw_items(items),
                Some(item @ Value::Object(_)) => raw_items(vec![item]),
                // Present but null.
                None => Vec::new(),
                Some(_) => return None,
            };

            Some(ParsedDocument {
                items,
                language,
                cuisine_type,
            })
        }
        _ => None,
    }
}

fn raw_items(values: Vec<Value>) -> Vec<RawMenuItem> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match value {
            Value::Object(_) => match serde_json::from_value::<RawMenuItem>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping unreadable menu item");
                    None
                }
            },
            Value::String(name) => Some(RawMenuItem::named(name)),
            other => {
                tracing::warn!(index, value = %other, "Skipping non-object menu item");
                None
            }
        })
        .collect()
}

impl ParsedDocument {
    fn into_normalized(self, catalog: &AllergenCatalog, degraded: bool) -> NormalizedMenu {
        let total = self.items.len();
        let items: Vec<MenuItem> = self
            .items
            .into_iter()
            .filter_map(|item| item.into_menu_item(catalog))
            .collect();

        if items.len() < total {
            tracing::debug!(
                discarded = total - items.len(),
                "Discarded menu items without a name"
            );
        }

        NormalizedMenu {
            items,
            language: self.language,
            cuisine_type: self.cuisine_type,
            degraded,
        }
    }
}

impl RawMenuItem {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(Value::String(name.into())),
            ..Self::default()
        }
    }

    fn into_menu_item(self, catalog: &AllergenCatalog) -> Option<MenuItem> {
        let name = first_text(&[&self.name, &self.dish_name, &self.dish, &self.title])?;

        let dietary_classification = first_text(&[
            &self.classification,
            &self.dietary_classification,
            &self.dietary_classification_camel,
            &self.food_type,
            &self.diet,
        ])
        .map(|label| DietaryClassification::from_label(&label))
        .unwrap_or_default();

        let mut meat_types: BTreeSet<MeatType> = [
            &self.meat,
            &self.meat_type,
            &self.meat_types,
            &self.meat_type_flags,
        ]
        .into_iter()
        .flatten()
        .flat_map(list)
        .filter_map(|token| MeatType::from_token(&token))
        .collect();

        if self.contains_pork.as_ref().is_some_and(flag) {
            meat_types.insert(MeatType::Pork);
        }
        if self.contains_beef.as_ref().is_some_and(flag) {
            meat_types.insert(MeatType::Beef);
        }

        let mut allergens = BTreeSet::new();
        for token in self.allergens.as_ref().map(list).unwrap_or_default() {
            match catalog.resolve(&token) {
                Some(allergen) => {
                    allergens.insert(allergen);
                }
                None => {
                    tracing::warn!(dish = %name, allergen = %token, "Dropping unrecognized allergen")
                }
            }
        }

        Some(MenuItem {
            description: first_text(&[&self.description]),
            ingredients: self.ingredients.as_ref().map(list).unwrap_or_default(),
            dietary_classification,
            meat_types,
            allergens,
            confidence_note: first_text(&[
                &self.confidence_note,
                &self.confidence,
                &self.certainty,
            ]),
            image_url: None,
            name,
        })
    }

    /// The field a `label: value` line fills, or None for labels that do not
    /// belong to a dish.
    fn field_slot(&mut self, label: &str) -> Option<&mut Option<Value>> {
        let slot = match label {
            "description" => &mut self.description,
            "ingredients" | "ingredient" | "main ingredients" => &mut self.ingredients,
            "type" | "food type" | "classification" | "dietary classification" | "diet" => {
                &mut self.classification
            }
            "meat" | "meat type" | "meat types" | "meat type flags" => &mut self.meat,
            "contains pork" => &mut self.contains_pork,
            "contains beef" => &mut self.contains_beef,
            "allergens" | "allergen" | "common allergens" => &mut self.allergens,
            "confidence" | "confidence note" | "certainty" | "note" | "notes" => {
                &mut self.confidence
            }
            _ => return None,
        };
        Some(slot)
    }

    fn apply_label(&mut self, label: &str, value: Value) -> bool {
        match self.field_slot(label) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(candidates: &[&Option<Value>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|candidate| candidate.as_ref())
        .find_map(text)
}

/// Arrays keep their order; strings are split on commas, semicolons and newlines.
fn list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(values) => values
            .iter()
            .filter_map(|v| match v {
                Value::Object(map) => ["name", "ingredient_name", "ingredient"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(text)),
                other => text(other),
            })
            .collect(),
        Value::String(s) => s
            .split([',', ';', '\n'])
            .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\'').trim())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Number(_) => text(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "y" | "1"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

/// Complete item objects from a JSON document that was cut off part-way
/// through its item list.
fn salvage_item_list(raw: &str) -> Vec<RawMenuItem> {
    let Some(start) = item_list_start(raw) else {
        return Vec::new();
    };

    let mut values = Vec::new();
    let mut rest = &raw[start..];
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() || rest.starts_with(']') {
            break;
        }

        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                let consumed = stream.byte_offset();
                values.push(value);
                rest = &rest[consumed..];
            }
            _ => break,
        }
    }

    raw_items(values)
}

/// Offset just past the `[` that opens the item list.
fn item_list_start(raw: &str) -> Option<usize> {
    let keyed = ITEM_LIST_KEYS
        .iter()
        .filter_map(|key| {
            let quoted = format!("\"{key}\"");
            let after_key = raw.find(&quoted)? + quoted.len();
            let open = raw[after_key..].find('[')?;
            let between = raw[after_key..after_key + open].trim();
            (between == ":").then_some(after_key + open + 1)
        })
        .min();

    // A bare array: the first bracket in the text opens it.
    keyed.or_else(|| {
        let open = raw.find(['[', '{'])?;
        raw[open..].starts_with('[').then_some(open + 1)
    })
}

struct LabelledField {
    raw_label: String,
    label: String,
    value: Option<Value>,
    opens_list: bool,
}

fn labelled_field(body: &str) -> Option<LabelledField> {
    if let Some(caps) = QUOTED_FIELD.captures(body) {
        let raw_label = caps[1].trim().to_string();
        let raw_value = caps[2].trim();
        // Unterminated strings are cut-off output.
        let value = match serde_json::from_str::<Value>(raw_value) {
            Ok(value) => Some(value),
            Err(_) if raw_value.starts_with(['"', '[', '{']) => None,
            Err(_) => Some(Value::String(raw_value.to_string())),
        };

        return Some(LabelledField {
            label: normalize_label(&raw_label),
            opens_list: raw_value == "[",
            raw_label,
            value,
        });
    }

    let caps = LABELLED_LINE.captures(body)?;
    let raw_label = caps[1].trim().to_string();
    let value = caps[2].trim().trim_matches('*').trim().to_string();

    Some(LabelledField {
        label: normalize_label(&raw_label),
        raw_label,
        value: Some(Value::String(value)),
        opens_list: false,
    })
}

fn normalize_label(raw: &str) -> String {
    raw.to_lowercase().replace(['_', '-'], " ")
}

#[derive(Default)]
struct TextExtraction {
    document: ParsedDocument,
    current: Option<RawMenuItem>,
    /// The current dish came from a heading and has no details yet.
    bare_heading: bool,
    /// Label and collected entries of a JSON array spanning several lines.
    open_list: Option<(String, Vec<Value>)>,
}

impl TextExtraction {
    /// A `#` or bold heading with no detail lines before the next dish is a
    /// section title, not a dish.
    fn start_dish(&mut self, item: RawMenuItem, from_heading: bool) {
        self.close_list();
        if let Some(previous) = self.current.take() {
            if self.bare_heading {
                tracing::debug!("Dropping section heading without dish details");
            } else {
                self.document.items.push(previous);
            }
        }
        self.current = Some(item);
        self.bare_heading = from_heading;
    }

    fn apply(&mut self, label: &str, value: Value) -> bool {
        let applied = self
            .current
            .as_mut()
            .is_some_and(|item| item.apply_label(label, value));
        if applied {
            self.bare_heading = false;
        }
        applied
    }

    fn close_list(&mut self) {
        if let Some((label, values)) = self.open_list.take() {
            self.apply(&label, Value::Array(values));
        }
    }

    fn list_entry(&mut self, line: &str) {
        if line.starts_with(']') {
            self.close_list();
            return;
        }
        if line.starts_with(['{', '}']) {
            return;
        }

        let entry = line.trim_end_matches(',').trim();
        if let (Ok(value), Some((_, values))) =
            (serde_json::from_str::<Value>(entry), self.open_list.as_mut())
        {
            values.push(value);
        }
    }

    fn finish(mut self) -> ParsedDocument {
        self.close_list();
        self.document.items.extend(self.current);
        self.document
    }
}

fn extract_from_text(raw: &str) -> ParsedDocument {
    let mut state = TextExtraction::default();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("```") {
            continue;
        }

        if state.open_list.is_some() {
            state.list_entry(line);
            continue;
        }

        if let Some(caps) = MARKDOWN_HEADING
            .captures(line)
            .or_else(|| BOLD_HEADING.captures(line))
        {
            let heading = LIST_MARKER.replace(&caps[1], "");
            state.start_dish(RawMenuItem::from_heading(&heading), true);
            continue;
        }

        let (bulleted, body) = match LIST_MARKER.find(line) {
            Some(marker) => (true, line[marker.end()..].trim()),
            None => (false, line),
        };

        let Some(field) = labelled_field(body) else {
            if bulleted {
                state.start_dish(RawMenuItem::from_heading(body), false);
            }
            continue;
        };

        let value_text = field.value.as_ref().and_then(text);
        match field.label.as_str() {
            "name" | "dish" | "dish name" | "item" | "item name" => {
                if let Some(name) = value_text {
                    state.start_dish(RawMenuItem::named(name), false);
                }
            }
            "language" | "menu language" => {
                state.document.language = value_text;
            }
            "cuisine" | "cuisine type" => {
                state.document.cuisine_type = value_text;
            }
            _ => {
                let has_slot = state
                    .current
                    .as_mut()
                    .is_some_and(|item| item.field_slot(&field.label).is_some());
                if field.opens_list && has_slot {
                    state.open_list = Some((field.label.clone(), Vec::new()));
                    continue;
                }

                let applied = match field.value {
                    Some(value) => state.apply(&field.label, value),
                    None => false,
                };

                // "1. Bacon Burger: smoked bacon, cheddar" starts a new dish.
                if !applied && bulleted {
                    let mut item = RawMenuItem::from_heading(&field.raw_label);
                    if let Some(description) = value_text {
                        item.description = Some(Value::String(description));
                    }
                    state.start_dish(item, false);
                }
            }
        }
    }

    state.finish()
}

impl RawMenuItem {
    /// A dish heading may carry a trailing " - description".
    fn from_heading(heading: &str) -> Self {
        let heading = heading.trim().trim_matches('*').trim();
        match heading.split_once(" - ").or_else(|| heading.split_once(" – ")) {
            Some((name, description)) => Self {
                description: Some(Value::String(description.trim().to_string())),
                ..Self::named(name.trim().trim_matches('*').trim())
            },
            None => Self::named(heading),
        }
    }
}
