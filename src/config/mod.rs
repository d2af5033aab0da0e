pub mod catalog;
pub mod settings;
pub mod yml_entry;
