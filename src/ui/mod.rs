pub mod filters;
pub mod panels;
pub mod table;
