#![doc = include_str!("../README.md")]

mod stub_server;

pub use crate::stub_server::*;
