pub mod camera;
pub mod context;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod texture;
