pub mod lead;
pub mod project;
pub mod quote;
pub mod selection;
pub mod service;
pub mod submission;
