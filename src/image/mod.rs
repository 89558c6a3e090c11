//! Image payload handling
//!
//! Validates source images against the upload allow-list and size ceiling,
//! converts them to transport-safe base64 and back, and writes generated
//! images out as downloadable files. Pixel data is never decoded.

pub mod codec;
pub mod download;
pub mod mime;

pub use codec::{decode, encode, MAX_UPLOAD_BYTES};
pub use download::save_download;
