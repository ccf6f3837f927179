pub mod definition;
pub mod loader;
pub mod registry;
pub mod settings;
