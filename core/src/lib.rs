pub mod forms;
pub mod join;
pub mod listing;
pub mod models;
pub mod service;
pub mod session;
