use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    menu_analysis::entities::MenuItem,
    menu_scan::value_objects::{ImageFormat, UploadMenuImageInput},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VisionProvider {
    Anthropic,
    OpenAi,
}

impl VisionProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisionProvider::Anthropic => "anthropic",
            VisionProvider::OpenAi => "openai",
        }
    }
}

impl fmt::Display for VisionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisionProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(VisionProvider::Anthropic),
            "openai" => Ok(VisionProvider::OpenAi),
            other => Err(format!("unsupported AI provider: {other}")),
        }
    }
}

/// One image-plus-instruction call to a vision model.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub image: Bytes,
    pub media_type: ImageFormat,
    pub instruction: String,
}

#[derive(Debug, Clone)]
pub struct AnalyzeMenuInput {
    pub upload: UploadMenuImageInput,
    pub enrich: bool,
    pub cuisine_hint: Option<String>,
}

/// Normalizer output: validated items plus document-level fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedMenu {
    pub items: Vec<MenuItem>,
    pub language: Option<String>,
    pub cuisine_type: Option<String>,
    pub degraded: bool,
}

/// Steps of a single analyze request, used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Received,
    ImageValidated,
    AnalysisRequested,
    AnalysisSucceeded,
    AnalysisFailed,
    Normalized,
    Enriched,
    Assembled,
}
