pub mod app;
pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
