pub mod renderer;
pub mod templates;

pub use renderer::{render, RenderedMessage};
