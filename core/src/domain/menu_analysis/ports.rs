use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    menu_analysis::{
        entities::MenuAnalysisResult,
        value_objects::{AnalyzeMenuInput, VisionProvider, VisionRequest},
    },
};

/// A multimodal model that accepts an image plus an instruction and returns text.
#[cfg_attr(test, mockall::automock)]
pub trait VisionClient: Send + Sync {
    fn provider(&self) -> VisionProvider;

    fn model(&self) -> String;

    /// False when no API key is available. Calls then fail with `ProviderRejected`.
    fn is_configured(&self) -> bool;

    fn analyze_image(
        &self,
        request: &VisionRequest,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for menu photo analysis
#[cfg_attr(test, mockall::automock)]
pub trait MenuAnalysisService: Send + Sync {
    /// Store the photo, ask the vision model about it and assemble the result
    fn analyze_menu(
        &self,
        input: AnalyzeMenuInput,
    ) -> impl Future<Output = Result<MenuAnalysisResult, CoreError>> + Send;
}
