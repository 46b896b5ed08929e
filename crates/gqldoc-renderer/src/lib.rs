//! Rendering pipeline for gqldoc.
//!
//! [`Renderer`] owns the output directory: it wipes and recreates it on
//! construction, fans out one file write per classified element, copies the
//! homepage template with the generation timestamp substituted, and emits
//! the navigation manifest as a generated JavaScript module.
//!
//! [`generate_docs`] is the end-to-end pipeline: load, change-detection
//! gate, classify, render, persist diff artifacts.

mod generator;
mod renderer;
mod sidebar;

pub use generator::{GenerateError, GenerateOptions, GenerateReport, generate_docs};
pub use renderer::{DocPage, RenderError, Renderer, SIDEBAR_FILENAME};
pub use sidebar::{HOMEPAGE_ID, SidebarEntry, generate_sidebar};
