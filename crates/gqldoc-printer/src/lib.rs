//! Markdown document printing for gqldoc.
//!
//! [`Printer`] is the pure half of the pipeline: it turns one classified
//! schema element into a complete MDX document (front matter, description,
//! canonical code block, metadata sections with cross-reference links).
//! Printing is stateless per call; the same schema and element always yield
//! the same document.
//!
//! The crate also owns the identifier utilities ([`to_slug`],
//! [`start_case`]) and the text-prettifying collaborator seam
//! ([`prettify_markdown`], [`prettify_javascript`]).

mod prettify;
mod printer;
mod slug;

pub use prettify::{prettify_javascript, prettify_markdown};
pub use printer::{NO_DESCRIPTION_TEXT, Printer, default_value};
pub use slug::{start_case, to_slug};
