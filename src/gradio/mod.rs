mod client;
mod types;

pub use client::{GradioTryOnClient, TryOnClient};
pub use types::*;
