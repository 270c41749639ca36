//! Blogstore - data-access layer for a simple blog
//!
//! This library provides article storage and retrieval over SQLite or MySQL.

pub mod config;
pub mod db;
pub mod models;
