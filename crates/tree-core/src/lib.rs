pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod formation;
pub mod gesture;
pub mod lights;
pub mod loading;
pub mod mode;
pub mod music;
pub mod photos;
pub mod scene;
pub mod shared;
pub mod synthetic;

pub static SPRITE_WGSL: &str = include_str!("../shaders/sprite.wgsl");
pub static PHOTO_WGSL: &str = include_str!("../shaders/photo.wgsl");

pub use camera::*;
pub use clock::*;
pub use config::*;
pub use constants::*;
pub use formation::*;
pub use gesture::*;
pub use lights::*;
pub use loading::*;
pub use mode::*;
pub use photos::*;
pub use scene::*;
pub use shared::*;
