pub mod analyze_menu;
pub mod delete_menu_item;
pub mod get_menu_item;
pub mod upload_menu;
