pub mod catalog;
pub mod session_store;
