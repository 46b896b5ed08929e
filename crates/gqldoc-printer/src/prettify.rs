//! Text-prettifying collaborator seam.
//!
//! Generated documents pass through a prettifying step before they are
//! treated as final. The underlying pretty-printing is an external concern;
//! these functions implement the seam as conservative whitespace
//! normalization so output is stable without reflowing the author-visible
//! structure.

/// Normalize a generated Markdown/MDX document: strip trailing whitespace,
/// collapse runs of blank lines, end with exactly one newline.
#[must_use]
pub fn prettify_markdown(content: &str) -> String {
    normalize(content)
}

/// Normalize a generated JavaScript module the same way.
#[must_use]
pub fn prettify_javascript(content: &str) -> String {
    normalize(content)
}

fn normalize(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut blank_run = 0usize;
    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    // No leading blank lines, exactly one trailing newline
    let trimmed = out.trim_start_matches('\n').trim_end_matches('\n');
    format!("{trimmed}\n")
}
