//! Client for text-to-image and image-to-image generation with Gemini
//!
//! Collects a prompt and an optional source image, optionally rewrites the
//! prompt through a text model, sends a single generation request and hands
//! back the base64 image for display or download.

pub mod ai;
pub mod app;
pub mod error;
pub mod image;
pub mod models;
pub mod prompts;
pub mod request;
pub mod status;
pub mod store;

pub use error::{Error, Result};
