pub mod bucket;
pub mod cache;
pub mod config;
pub mod legacy;
pub mod model;
pub mod pipeline;
pub mod show_api;
pub mod standings;
pub mod teams;
pub mod update;
