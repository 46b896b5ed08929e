//! Output-directory rendering.
//!
//! [`Renderer`] wipes and recreates the output directory when constructed
//! (a blocking precondition, sequenced strictly before any write), then
//! writes one `.mdx` file per element, the homepage, and the sidebar
//! module. Element writes within a category run concurrently; callers join
//! a whole category before aggregating its pages.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Local;
use futures::future::try_join_all;
use regex::Regex;

use gqldoc_printer::{Printer, prettify_javascript, start_case, to_slug};
use gqldoc_schema::{Category, SchemaElement};

use crate::sidebar::{SidebarEntry, generate_sidebar};

/// File name of the generated navigation module.
pub const SIDEBAR_FILENAME: &str = "sidebar-schema.js";

/// Token in the homepage template replaced with the generation timestamp.
const GENERATED_DATE_TOKEN: &str = "##generated-date-time##";

/// Shape every written page path must match, relative to the output
/// directory. The re-derived `category/pageId` pair is authoritative for
/// navigation grouping.
static PAGE_INFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z][A-Za-z0-9-]*)/([A-Za-z][A-Za-z0-9-]*)\.mdx?$")
        .expect("page-info pattern is valid")
});

/// Record of one rendered page, consumed by the sidebar builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocPage {
    /// Start-cased category label re-derived from the written path.
    pub category: String,
    /// Relative slug (`category/page-id`).
    pub slug: String,
}

/// Error raised by the rendering phase.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// An element expected to exist was absent.
    #[error("Not a type: {0}")]
    NotAType(String),
    /// A written file's path did not match the expected category/page shape.
    #[error("Cannot resolve page information for {}", .0.display())]
    PageInfo(PathBuf),
    /// Filesystem failure, carrying the offending path.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The navigation manifest failed to serialize.
    #[error("Cannot serialize sidebar: {0}")]
    Sidebar(#[from] serde_json::Error),
}

/// Renderer owning one output directory for one run.
pub struct Renderer<'a> {
    printer: Printer<'a>,
    output_dir: PathBuf,
    base_url: String,
}

impl<'a> Renderer<'a> {
    /// Create a renderer, wiping and recreating `output_dir`.
    ///
    /// The wipe is destructive and completes before this returns; no write
    /// is ever issued against the previous directory contents.
    pub fn new(
        printer: Printer<'a>,
        output_dir: PathBuf,
        base_url: impl Into<String>,
    ) -> Result<Self, RenderError> {
        empty_output_dir(&output_dir)?;
        Ok(Self {
            printer,
            output_dir,
            base_url: base_url.into(),
        })
    }

    /// Render every element of one category into its subdirectory,
    /// concurrently, and collect the resulting pages.
    pub async fn render_root_types(
        &self,
        category: Category,
        elements: &[SchemaElement<'a>],
    ) -> Result<Vec<DocPage>, RenderError> {
        let dir_path = self.output_dir.join(to_slug(category.as_str()));
        tokio::fs::create_dir_all(&dir_path)
            .await
            .map_err(|source| RenderError::Io {
                path: dir_path.clone(),
                source,
            })?;

        let pages = try_join_all(
            elements
                .iter()
                .map(|element| self.render_type_entities(&dir_path, element.name(), Some(element))),
        )
        .await?;
        tracing::debug!(category = category.as_str(), pages = pages.len(), "rendered category");
        Ok(pages)
    }

    /// Write one element's document and return its page record.
    ///
    /// The page's category label and slug are re-derived from the written
    /// file's path relative to the output directory; that re-derivation is
    /// authoritative and must succeed.
    pub async fn render_type_entities(
        &self,
        dir_path: &Path,
        name: &str,
        element: Option<&SchemaElement<'a>>,
    ) -> Result<DocPage, RenderError> {
        let Some(element) = element else {
            return Err(RenderError::NotAType(name.to_owned()));
        };

        let file_name = to_slug(name);
        let file_path = dir_path.join(format!("{file_name}.mdx"));
        let content = self.printer.print_type(&file_name, element);
        tokio::fs::write(&file_path, content)
            .await
            .map_err(|source| RenderError::Io {
                path: file_path.clone(),
                source,
            })?;

        let relative = file_path
            .strip_prefix(&self.output_dir)
            .unwrap_or(&file_path)
            .to_string_lossy()
            .replace('\\', "/");
        let captures = PAGE_INFO
            .captures(&relative)
            .ok_or_else(|| RenderError::PageInfo(file_path.clone()))?;
        let (category, page_id) = (&captures[1], &captures[2]);
        Ok(DocPage {
            category: start_case(category),
            slug: format!("{category}/{page_id}"),
        })
    }

    /// Copy the homepage template into the output root, substituting every
    /// generation-date token with the current timestamp.
    pub async fn render_homepage(&self, template: &Path) -> Result<(), RenderError> {
        let file_name = template
            .file_name()
            .ok_or_else(|| RenderError::PageInfo(template.to_path_buf()))?;
        let dest = self.output_dir.join(file_name);

        let data = tokio::fs::read_to_string(template)
            .await
            .map_err(|source| RenderError::Io {
                path: template.to_path_buf(),
                source,
            })?;
        let generated_at = Local::now().format("%B %d, %Y at %-I:%M:%S %p").to_string();
        let stamped = data.replace(GENERATED_DATE_TOKEN, &generated_at);
        tokio::fs::write(&dest, stamped)
            .await
            .map_err(|source| RenderError::Io {
                path: dest.clone(),
                source,
            })
    }

    /// Write the navigation manifest as a generated JavaScript module and
    /// return its path.
    pub async fn render_sidebar(&self, pages: &[DocPage]) -> Result<PathBuf, RenderError> {
        let file_path = self.output_dir.join(SIDEBAR_FILENAME);
        let manifest = self.generate_sidebar(pages);
        let json = serde_json::to_string_pretty(&manifest)?;
        let content =
            prettify_javascript(&format!("module.exports = {{\n  schemaSidebar: {json}\n}};\n"));
        tokio::fs::write(&file_path, content)
            .await
            .map_err(|source| RenderError::Io {
                path: file_path.clone(),
                source,
            })?;
        Ok(file_path)
    }

    /// Fold pages into the navigation manifest for this renderer's base URL.
    #[must_use]
    pub fn generate_sidebar(&self, pages: &[DocPage]) -> Vec<SidebarEntry> {
        generate_sidebar(&self.base_url, pages)
    }

    /// The directory this renderer writes into.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Destructive wipe-then-recreate of the output directory.
fn empty_output_dir(dir: &Path) -> Result<(), RenderError> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
        path: dir.to_path_buf(),
        source,
    })
}
