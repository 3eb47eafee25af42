#![doc = "guidepress: turns a travel-guide outline into HTML, per-section DOCX documents and a zip bundle."]

//! The crate holds the whole document pipeline; network-backed generators and the
//! command line live in `guidepress-cli`.
//!
//! # Flow
//! outline forest → [`traverse`] → per node: [`contract::ContentGenerator`] → markup →
//! [`render`] → [`docx::persist`] under a name from [`filename::FilenameRegistry`] →
//! manifest entry; then [`archive::assemble`] bundles the documents.
//!
//! # Usage
//! Call [`guide::build_guide`] (or [`guide::build_single_node`]) with a generator
//! and a [`config::GuideConfig`].

pub mod archive;
pub mod config;
pub mod contract;
pub mod demo;
pub mod docx;
pub mod error;
pub mod filename;
pub mod guide;
pub mod manifest;
pub mod markup;
pub mod outline;
pub mod render;
pub mod traverse;

pub use error::{GuideError, Result};
