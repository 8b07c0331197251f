#![doc = include_str!("../README.md")]

mod client;
mod error;
mod request;

pub use crate::{client::*, error::*, request::*};
