//! End-to-end documentation generation.
//!
//! Pipeline: load schema, let the change-detection gate decide, classify,
//! fan out one render task per category, join, render homepage and sidebar,
//! then persist the diff artifacts regardless of whether rendering
//! occurred.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use futures::future::try_join_all;

use gqldoc_diff::{DiffError, DiffMethod, save_schema_artifacts, should_regenerate};
use gqldoc_printer::Printer;
use gqldoc_schema::{LoaderError, SchemaMap, load_schema};

use crate::renderer::{DocPage, RenderError, Renderer};

/// Inputs of one generation run, produced by the configuration layer.
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    /// Schema location: SDL file, URL, or introspection JSON file.
    pub schema_location: String,
    /// Directory receiving the generated tree (root path + base URL).
    pub output_dir: PathBuf,
    /// Base URL segment used in page slugs and cross-reference links.
    pub base_url: String,
    /// Root prefix for cross-reference links.
    pub link_root: String,
    /// Homepage template location.
    pub homepage: PathBuf,
    /// Change-detection mode.
    pub diff_method: DiffMethod,
    /// Directory holding the persisted fingerprint and snapshot.
    pub tmp_dir: PathBuf,
}

/// Error raised anywhere in the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Outcome of one generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Whether documents were (re)generated or the run was skipped.
    pub regenerated: bool,
    /// Number of pages written.
    pub pages: usize,
    /// Path of the written sidebar module, when one was generated.
    pub sidebar_path: Option<PathBuf>,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

/// Run the full generation pipeline.
pub async fn generate_docs(options: &GenerateOptions) -> Result<GenerateReport, GenerateError> {
    let started = Instant::now();

    let schema = load_schema(&options.schema_location)?;

    let regenerate = should_regenerate(&schema, &options.tmp_dir, options.diff_method)?;
    let mut pages_written = 0;
    let mut sidebar_path = None;

    if regenerate {
        let printer = Printer::new(&schema, &options.base_url, &options.link_root);
        let renderer = Renderer::new(printer, options.output_dir.clone(), &options.base_url)?;
        let schema_map = SchemaMap::of(&schema);

        // Fan out one task per category; every type-page write settles
        // before the homepage/sidebar phase starts.
        let page_groups = try_join_all(
            schema_map
                .entries()
                .iter()
                .map(|(category, elements)| renderer.render_root_types(*category, elements)),
        )
        .await?;
        let pages: Vec<DocPage> = page_groups.into_iter().flatten().collect();

        renderer.render_homepage(&options.homepage).await?;
        sidebar_path = Some(renderer.render_sidebar(&pages).await?);
        pages_written = pages.len();
        tracing::info!(
            pages = pages_written,
            output_dir = %options.output_dir.display(),
            "documentation generated"
        );
    } else {
        tracing::info!(schema = %options.schema_location, "no changes detected");
    }

    save_schema_artifacts(&schema, &options.tmp_dir)?;

    Ok(GenerateReport {
        regenerated: regenerate,
        pages: pages_written,
        sidebar_path,
        duration: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqldoc_diff::{HASH_FILE, SNAPSHOT_FILE};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SDL: &str = r#"
        "A person."
        type User {
          id: ID!
          name: String
        }

        type Query {
          user(id: ID!): User
        }
    "#;

    struct Fixture {
        _tmp: TempDir,
        options: GenerateOptions,
    }

    fn fixture(sdl: &str) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let schema_path = tmp.path().join("schema.graphql");
        std::fs::write(&schema_path, sdl).unwrap();
        let homepage = tmp.path().join("generated.md");
        std::fs::write(
            &homepage,
            "---\nid: schema\ntitle: Schema\n---\n\nGenerated on ##generated-date-time##.\n",
        )
        .unwrap();

        let options = GenerateOptions {
            schema_location: schema_path.to_string_lossy().into_owned(),
            output_dir: tmp.path().join("docs/schema"),
            base_url: "schema".to_owned(),
            link_root: "/".to_owned(),
            homepage,
            diff_method: DiffMethod::SchemaDiff,
            tmp_dir: tmp.path().join("tmp"),
        };
        Fixture { _tmp: tmp, options }
    }

    #[tokio::test]
    async fn test_end_to_end_generates_expected_tree() {
        let fixture = fixture(SDL);
        let report = generate_docs(&fixture.options).await.unwrap();

        assert!(report.regenerated);
        let out = &fixture.options.output_dir;

        let user_object = std::fs::read_to_string(out.join("objects/user.mdx")).unwrap();
        assert!(user_object.contains("```graphql\ntype User {\n  id: ID!\n  name: String\n}\n```"));

        let user_query = std::fs::read_to_string(out.join("queries/user.mdx")).unwrap();
        assert!(user_query.contains("user(id: ID! = 0): User"));
        assert!(user_query.contains("### Type"));
        assert!(user_query.contains("[`User`](/schema/objects/user)"));

        let sidebar = std::fs::read_to_string(out.join("sidebar-schema.js")).unwrap();
        assert!(sidebar.contains("\"label\": \"Queries\""));
        assert!(sidebar.contains("schema/queries/user"));
        assert!(sidebar.contains("\"label\": \"Objects\""));
        assert!(sidebar.contains("schema/objects/user"));

        assert!(out.join("generated.md").exists());
    }

    #[tokio::test]
    async fn test_report_counts_pages_and_sidebar_path() {
        let fixture = fixture(SDL);
        let report = generate_docs(&fixture.options).await.unwrap();

        // User + user query + five built-in scalars
        assert_eq!(report.pages, 7);
        assert_eq!(
            report.sidebar_path,
            Some(fixture.options.output_dir.join("sidebar-schema.js"))
        );
        assert!(report.duration.as_nanos() > 0);
    }

    #[tokio::test]
    async fn test_second_run_unchanged_schema_skips() {
        let fixture = fixture(SDL);

        let first = generate_docs(&fixture.options).await.unwrap();
        assert!(first.regenerated);

        let second = generate_docs(&fixture.options).await.unwrap();
        assert!(!second.regenerated);
        assert_eq!(second.pages, 0);
        assert_eq!(second.sidebar_path, None);
    }

    #[tokio::test]
    async fn test_force_regenerates_unchanged_schema() {
        let mut fixture = fixture(SDL);

        generate_docs(&fixture.options).await.unwrap();

        fixture.options.diff_method = DiffMethod::Force;
        let forced = generate_docs(&fixture.options).await.unwrap();
        assert!(forced.regenerated);
    }

    #[tokio::test]
    async fn test_artifacts_persisted_even_when_skipped() {
        let fixture = fixture(SDL);

        generate_docs(&fixture.options).await.unwrap();
        std::fs::remove_file(fixture.options.tmp_dir.join(HASH_FILE)).unwrap();

        // Skipped via snapshot comparison, but both artifacts come back.
        let report = generate_docs(&fixture.options).await.unwrap();
        assert!(!report.regenerated);
        assert!(fixture.options.tmp_dir.join(HASH_FILE).exists());
        assert!(fixture.options.tmp_dir.join(SNAPSHOT_FILE).exists());
    }

    #[tokio::test]
    async fn test_loader_failure_precedes_output_mutation() {
        let fixture = fixture(SDL);
        let mut options = fixture.options.clone();
        options.schema_location = "./missing.graphql".to_owned();

        // Seed the output dir so a wipe would be observable.
        std::fs::create_dir_all(&options.output_dir).unwrap();
        std::fs::write(options.output_dir.join("keep.mdx"), "untouched").unwrap();

        let err = generate_docs(&options).await.unwrap_err();
        assert!(matches!(err, GenerateError::Loader(_)));
        assert!(options.output_dir.join("keep.mdx").exists());
    }

    #[tokio::test]
    async fn test_schema_change_triggers_regeneration() {
        let fixture = fixture(SDL);
        generate_docs(&fixture.options).await.unwrap();

        std::fs::write(
            &fixture.options.schema_location,
            "type Query { ping: String }",
        )
        .unwrap();
        let report = generate_docs(&fixture.options).await.unwrap();
        assert!(report.regenerated);
    }
}
