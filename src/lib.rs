// src/lib.rs

//! Repository activity reports and team index library

pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod services;
pub mod utils;
