use super::Change;
use crate::error::{ChangelogError, Result};
use gix::ObjectId;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// History range of one release
#[derive(Debug, Clone)]
pub struct CommitRange {
    /// Any path inside the repository
    pub repo_path: PathBuf,
    /// Tag being released
    pub tag: String,
    /// Upper end of the range
    pub commitish: String,
}

fn walk_error(e: impl std::fmt::Display) -> ChangelogError {
    ChangelogError::WalkFailed {
        reason: e.to_string(),
    }
}

fn resolve_commit(repo: &gix::Repository, revision: &str) -> Result<ObjectId> {
    let spec = format!("{revision}^{{commit}}");
    let id = repo
        .rev_parse_single(spec.as_str())
        .map_err(|e| ChangelogError::RevisionNotFound {
            revision: revision.to_string(),
            reason: e.to_string(),
        })?;
    Ok(id.detach())
}

/// Map of peeled tag target to tag names
fn tag_targets(repo: &gix::Repository) -> Result<HashMap<ObjectId, Vec<String>>> {
    let mut targets: HashMap<ObjectId, Vec<String>> = HashMap::new();
    let platform = repo.references().map_err(walk_error)?;

    for reference in platform.tags().map_err(walk_error)? {
        let mut reference = reference.map_err(walk_error)?;
        let name = reference.name().shorten().to_string();
        match reference.peel_to_id_in_place() {
            Ok(id) => targets.entry(id.detach()).or_default().push(name),
            Err(e) => log::debug!("Skipping tag {name}: {e}"),
        }
    }

    Ok(targets)
}

/// Nearest tagged ancestor of `head`, ignoring the tag being released
fn previous_tag(
    repo: &gix::Repository,
    head: ObjectId,
    tags: &HashMap<ObjectId, Vec<String>>,
    release_tag: &str,
) -> Result<Option<ObjectId>> {
    for info in repo.rev_walk([head]).all().map_err(walk_error)? {
        let info = info.map_err(walk_error)?;
        let tagged = tags
            .get(&info.id)
            .is_some_and(|names| names.iter().any(|n| n != release_tag));
        if tagged {
            return Ok(Some(info.id));
        }
    }
    Ok(None)
}

fn ancestors(repo: &gix::Repository, tip: ObjectId) -> Result<HashSet<ObjectId>> {
    let mut seen = HashSet::new();
    for info in repo.rev_walk([tip]).all().map_err(walk_error)? {
        seen.insert(info.map_err(walk_error)?.id);
    }
    Ok(seen)
}

fn to_change(commit: &gix::Commit<'_>) -> Result<Change> {
    let hash = commit.id.to_string();
    let short_hash = commit
        .id()
        .shorten()
        .map(|prefix| prefix.to_string())
        .unwrap_or_else(|_| hash.clone());
    let subject = commit
        .message()
        .map(|m| m.summary().to_string())
        .unwrap_or_default();
    let author = commit.author().map_err(walk_error)?;
    // Raw git time: "<seconds> <timezone>"
    let timestamp = std::str::from_utf8(author.time.as_ref())
        .ok()
        .and_then(|s| s.split_whitespace().next())
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .unwrap_or_default();

    Ok(Change {
        hash,
        short_hash,
        subject,
        author_name: author.name.to_string(),
        author_email: author.email.to_string(),
        username: None,
        timestamp,
    })
}

/// Read the commits reachable from `commitish` but not from the previous tag,
/// newest first (blocking).
pub fn read_commits(range: &CommitRange) -> Result<Vec<Change>> {
    let repo = gix::discover(&range.repo_path).map_err(|e| ChangelogError::OpenFailed {
        path: range.repo_path.clone(),
        reason: e.to_string(),
    })?;

    let head = resolve_commit(&repo, &range.commitish)?;
    let tags = tag_targets(&repo)?;
    let hidden = match previous_tag(&repo, head, &tags, &range.tag)? {
        Some(boundary) => {
            log::debug!("Changelog lower boundary: {boundary}");
            ancestors(&repo, boundary)?
        }
        None => HashSet::new(),
    };

    let mut changes = Vec::new();
    for info in repo.rev_walk([head]).all().map_err(walk_error)? {
        let info = info.map_err(walk_error)?;
        if hidden.contains(&info.id) {
            continue;
        }
        let commit = info.object().map_err(walk_error)?;
        changes.push(to_change(&commit)?);
    }

    Ok(changes)
}
