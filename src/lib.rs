#![warn(rust_2018_idioms, missing_debug_implementations)]
mod config;
mod domain;
mod engine;
pub mod io;
pub mod session;

pub use crate::config::*;
pub use crate::domain::*;
pub use crate::engine::*;
pub use crate::io::HttpTransport;
pub use crate::io::SoapAction;
pub use crate::io::SoapTransport;
pub use crate::session::*;
