mod error;
pub use error::{Error, Result};

pub mod config;
pub mod credentials;

pub mod format;
pub mod sts;

pub mod cmd;
