#![recursion_limit = "256"]
pub mod config;
pub mod model;
pub mod seed;
pub mod store;
pub mod sync;
pub mod timeline;
pub mod web;
