pub mod config;
pub mod dataurl;
pub mod error;
pub mod gradio;
pub mod normalize;
pub mod publish;
pub mod server;

pub use error::{Error, Result};
