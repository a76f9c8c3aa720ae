//! HTTP handlers

pub mod api;
pub mod form;
pub mod upload;

pub use upload::{handle_upload, EntryPoint};
