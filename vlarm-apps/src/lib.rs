#![doc = include_str!("../README.md")]

mod config;
mod error;
pub mod protocol;
mod server;
pub mod utils;

pub use crate::{config::*, error::*, server::*};
