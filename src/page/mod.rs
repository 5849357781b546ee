pub mod page_model;
