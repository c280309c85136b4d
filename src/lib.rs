pub mod engine;
pub mod render;
pub mod view;

pub use engine::Engine;
pub use render::{Raster, RenderError};
pub use view::ViewState;
