pub mod config;
pub mod library;
pub mod markdown;
pub mod models;
pub mod parser;
pub mod writer;
