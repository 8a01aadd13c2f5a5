pub mod allergen;
pub mod common;
pub mod health;
pub mod image_enrichment;
pub mod menu_analysis;
pub mod menu_scan;
