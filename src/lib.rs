#![doc = include_str!("../README.md")]
#![warn(missing_docs, missing_debug_implementations)]
pub mod config;
pub mod cosmos;
mod entity;
mod error;
mod pool;
mod prototype;
mod registry;

pub use entity::*;
pub use error::*;
pub use pool::*;
pub use prototype::*;
pub use registry::*;
