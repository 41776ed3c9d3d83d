pub mod action_bar;
pub mod details;
pub mod export_menu;
pub mod list;
