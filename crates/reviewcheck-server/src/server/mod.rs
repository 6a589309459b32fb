pub mod app;
pub mod render;
pub mod routes;

pub use app::*;
pub use render::*;
pub use routes::*;
