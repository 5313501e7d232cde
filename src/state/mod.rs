/// State management module
///
/// This module handles all persistent application state, including:
/// - Database connection and queries (library.rs)
/// - Shared data structures (data.rs)
/// - Capture settings persisted as JSON (settings.rs)

pub mod data;
pub mod library;
pub mod settings;
