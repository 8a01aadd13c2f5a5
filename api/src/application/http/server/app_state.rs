use std::sync::Arc;

use menulens_core::application::MenuLensService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: MenuLensService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: MenuLensService) -> Self {
        Self { args, service }
    }
}
