//! Library side of the `crc-quality` command line.

pub mod config;
pub mod logging;
pub mod pipeline;
