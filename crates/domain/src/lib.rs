#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;

mod classifier;
mod encoder;
mod error;
mod exercise;
mod generator;
mod name;
mod performance;
mod plan;
mod progression;
mod region;
mod service;
mod training;
mod tree;
mod user;

pub use classifier::*;
pub use encoder::*;
pub use error::*;
pub use exercise::*;
pub use generator::*;
pub use name::*;
pub use performance::*;
pub use plan::*;
pub use progression::*;
pub use region::*;
pub use service::*;
pub use training::*;
pub use tree::*;
pub use user::*;
