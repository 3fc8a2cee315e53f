pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod field;
pub mod lab;
pub mod particles;
pub mod scene;
pub mod scheduler;

pub use camera::*;
pub use clock::*;
pub use config::*;
pub use constants::*;
pub use emitter::*;
pub use error::*;
pub use field::*;
pub use lab::*;
pub use particles::*;
pub use scene::*;
pub use scheduler::*;
