//! Release notes rendering.

use crate::changelog::TitleChanges;
use crate::error::{ErrorExt, Result};
use handlebars::{Handlebars, no_escape};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Name of the generated notes file in each release directory
pub const RELEASE_NOTES_FILENAME: &str = "release-notes.md";

const RELEASE_NOTES_TEMPLATE: &str = r#"{{#each change_groups~}}
## {{title}}

{{#each changes~}}
* {{subject}} {{short_hash}}{{#if username}} @{{username}}{{/if}}
{{/each}}

{{/each~}}
"#;

#[derive(Serialize)]
struct ReleaseNotesContext<'a> {
    change_groups: &'a [TitleChanges],
}

/// Render grouped changes as Markdown
pub fn render_release_notes(groups: &[TitleChanges]) -> Result<String> {
    let mut hb = Handlebars::new();
    hb.register_escape_fn(no_escape);
    let ctx = ReleaseNotesContext {
        change_groups: groups,
    };
    Ok(hb.render_template(RELEASE_NOTES_TEMPLATE, &ctx)?)
}

/// Render and write `release-notes.md` into `dir`
pub async fn write_release_notes(dir: &Path, groups: &[TitleChanges]) -> Result<PathBuf> {
    let content = render_release_notes(groups)?;
    let out = dir.join(RELEASE_NOTES_FILENAME);
    tokio::fs::write(&out, content)
        .await
        .fs_context("writing release notes", &out)?;
    log::debug!("Wrote release notes to {}", out.display());
    Ok(out)
}
