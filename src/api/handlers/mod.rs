pub mod admin;
pub mod applications;
pub mod auth;
pub mod content;
pub mod events;
pub mod profile;
pub mod public;
pub mod root;
