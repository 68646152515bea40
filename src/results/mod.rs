//! Result types shared by providers and the router

mod types;

pub use types::*;
