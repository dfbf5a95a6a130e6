//! Encoder command construction.

pub mod command_builder;
pub mod request;

pub use command_builder::{escape_filter_path, CommandBuilder, RequestError};
pub use request::{EncodeRequest, DEFAULT_CRF, DEFAULT_PRESET};
