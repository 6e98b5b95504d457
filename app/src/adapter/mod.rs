pub mod habitify;
pub mod store;
pub mod web;
