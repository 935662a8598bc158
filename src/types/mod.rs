//! Core types for palaver.

pub mod generation;
pub mod image;
pub mod message;
pub mod stream;

pub use generation::*;
pub use image::*;
pub use message::*;
pub use stream::*;
