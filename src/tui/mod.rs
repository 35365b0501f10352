pub mod app;
pub mod input;
pub mod loader;
pub mod navigation;
pub mod render;
pub mod state;
pub mod view;
pub mod viewport;
