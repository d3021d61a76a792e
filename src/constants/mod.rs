pub mod defaults;
pub mod element_ids;
