//! Folio Server Library
//!
//! Turns the front page of an uploaded PDF into a generated cover image.
//!
//! # Modules
//!
//! - `extract`: first-page text via MuPDF
//! - `prompt`: prompt template
//! - `generate`: remote image generation (Gemini)
//! - `session`: session store correlating the request steps
//! - `routes`: the upload → process → result → download flow

pub mod config;
pub mod error;
pub mod extract;
pub mod flash;
pub mod generate;
pub mod html;
pub mod prompt;
pub mod routes;
pub mod session;
pub mod state;
pub mod workspace;

#[cfg(test)]
mod test_support;
