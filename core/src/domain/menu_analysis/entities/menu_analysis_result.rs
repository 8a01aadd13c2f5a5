use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    menu_analysis::{entities::menu_item::MenuItem, value_objects::VisionProvider},
    menu_scan::entities::MenuScan,
};

/// Outcome of one analyze call. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuAnalysisResult {
    pub scan: MenuScan,
    /// Same order the model listed the dishes in.
    pub items: Vec<MenuItem>,
    pub language: Option<String>,
    pub cuisine_type: Option<String>,
    /// Set when the model output could not be parsed as structured data.
    pub parse_degraded: bool,
    pub metadata: ProcessingMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProcessingMetadata {
    pub provider: VisionProvider,
    pub model: String,
    pub analyzed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub enrichment: EnrichmentSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EnrichmentSummary {
    pub provider: String,
    pub attempted: bool,
    pub enriched_items: usize,
}

impl EnrichmentSummary {
    pub fn skipped(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            attempted: false,
            enriched_items: 0,
        }
    }
}
