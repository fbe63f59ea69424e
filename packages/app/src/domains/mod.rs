// Business domains
pub mod auth;
pub mod catalog;
pub mod directory;
pub mod preferences;
