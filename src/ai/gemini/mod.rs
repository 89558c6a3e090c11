pub mod client;
pub mod enhance;
pub mod image;
pub mod types;

pub use client::GeminiHttpClient;
pub use enhance::GeminiEnhanceClient;
pub use image::GeminiImageClient;
