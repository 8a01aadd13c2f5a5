pub mod menu_analysis_result;
pub mod menu_item;

pub use menu_analysis_result::*;
pub use menu_item::*;
