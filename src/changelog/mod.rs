//! Changelog collection and grouping.
//!
//! Commits between the previous tag and the release commitish are read from the
//! repository, optionally enriched with provider usernames, and grouped into
//! titled sections by an ordered list of [`GroupRule`]s.

mod git;

pub use git::{CommitRange, read_commits};

use crate::error::{ChangelogError, ConfigError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// One commit in the release range
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Change {
    /// Full commit hash
    pub hash: String,
    /// Abbreviated commit hash
    pub short_hash: String,
    /// First line of the commit message
    pub subject: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Provider username of the author, when resolved
    pub username: Option<String>,
    /// Author timestamp
    pub timestamp: DateTime<Utc>,
}

/// Changes collected under one title
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TitleChanges {
    /// Group title
    pub title: String,
    /// Changes in commit order
    pub changes: Vec<Change>,
}

/// One grouping rule
#[derive(Debug, Clone)]
pub struct GroupRule {
    /// Matched against the commit subject
    pub pattern: Regex,
    /// Title of the group that collects matching commits
    pub title: String,
    /// Matching commits are dropped from the notes
    pub ignore: bool,
}

impl GroupRule {
    /// Compile a rule
    pub fn new(
        regexp: &str,
        title: impl Into<String>,
        ignore: bool,
    ) -> std::result::Result<Self, ConfigError> {
        let pattern = Regex::new(regexp).map_err(|e| ConfigError::InvalidRegexp {
            pattern: regexp.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern,
            title: title.into(),
            ignore,
        })
    }
}

/// Group changes by the first rule whose pattern matches the subject.
///
/// Ignored and unmatched commits appear in no group. Groups are ordered by the
/// position of the first rule that produced them.
pub fn group_by_rules(changes: Vec<Change>, rules: &[GroupRule]) -> Vec<TitleChanges> {
    let mut groups: Vec<(usize, TitleChanges)> = Vec::new();

    for change in changes {
        let Some((rank, rule)) = rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.pattern.is_match(&change.subject))
        else {
            continue;
        };
        if rule.ignore {
            continue;
        }

        match groups.iter_mut().find(|(_, g)| g.title == rule.title) {
            Some((_, group)) => group.changes.push(change),
            None => groups.push((
                rank,
                TitleChanges {
                    title: rule.title.clone(),
                    changes: vec![change],
                },
            )),
        }
    }

    // Rules sharing a title rank by their earliest position.
    for (rank, group) in groups.iter_mut() {
        if let Some(first) = rules.iter().position(|r| !r.ignore && r.title == group.title) {
            *rank = first;
        }
    }

    groups.sort_by_key(|(rank, _)| *rank);
    groups.into_iter().map(|(_, g)| g).collect()
}

/// Resolves a commit author to a provider username
#[async_trait]
pub trait ResolveUsername: Send + Sync {
    /// Username of the author of `commit`, if the provider knows one
    async fn resolve_username(&self, commit: &str, author_email: &str) -> Result<Option<String>>;
}

/// Inputs for [`collect_changes`]
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Tag being released; never used as the lower boundary
    pub tag: String,
    /// Revision the release is cut from
    pub commitish: String,
    /// Repository to read history from
    pub repo_path: PathBuf,
}

/// Read the release range and resolve author usernames.
///
/// Each distinct author email is resolved at most once.
pub async fn collect_changes(
    options: &CollectOptions,
    resolver: Option<&dyn ResolveUsername>,
) -> Result<Vec<Change>> {
    let range = CommitRange {
        repo_path: options.repo_path.clone(),
        tag: options.tag.clone(),
        commitish: options.commitish.clone(),
    };
    let mut changes = tokio::task::spawn_blocking(move || read_commits(&range)).await??;

    log::debug!(
        "Collected {} change(s) for {} from {}",
        changes.len(),
        options.commitish,
        options.repo_path.display()
    );

    let Some(resolver) = resolver else {
        return Ok(changes);
    };

    let mut cache: HashMap<String, Option<String>> = HashMap::new();
    for change in &mut changes {
        if let Some(known) = cache.get(&change.author_email) {
            change.username = known.clone();
            continue;
        }
        let username = resolver
            .resolve_username(&change.hash, &change.author_email)
            .await
            .map_err(|e| ChangelogError::ResolveFailed {
                commit: change.hash.clone(),
                reason: e.to_string(),
            })?;
        cache.insert(change.author_email.clone(), username.clone());
        change.username = username;
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn change(subject: &str, email: &str) -> Change {
        Change {
            hash: format!("{:0>40}", subject.len()),
            short_hash: "abc1234".into(),
            subject: subject.into(),
            author_name: "Dev".into(),
            author_email: email.into(),
            username: None,
            timestamp: DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    fn rules() -> Vec<GroupRule> {
        vec![
            GroupRule::new("^fix", "Bug fixes", false).unwrap(),
            GroupRule::new("snapshot|^chore", "", true).unwrap(),
            GroupRule::new("^feat", "Features", false).unwrap(),
            GroupRule::new(".*", "Other", false).unwrap(),
        ]
    }

    #[test]
    fn first_matching_rule_wins() {
        let grouped = group_by_rules(
            vec![
                change("feat: add zip", "a@x"),
                change("fix: close order", "a@x"),
                change("docs: readme", "b@x"),
                change("fix: snapshot naming", "b@x"),
            ],
            &rules(),
        );

        let titles: Vec<_> = grouped.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["Bug fixes", "Features", "Other"]);
        assert_eq!(grouped[0].changes.len(), 2);
        assert_eq!(grouped[0].changes[0].subject, "fix: close order");
        assert_eq!(grouped[0].changes[1].subject, "fix: snapshot naming");
    }

    #[test]
    fn ignored_and_unmatched_commits_are_dropped() {
        let rules = vec![
            GroupRule::new("^chore", "", true).unwrap(),
            GroupRule::new("^fix", "Bug fixes", false).unwrap(),
        ];
        let grouped = group_by_rules(
            vec![
                change("chore: fix lint", "a@x"),
                change("docs: readme", "a@x"),
                change("fix: it", "a@x"),
            ],
            &rules,
        );
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].changes.len(), 1);
        assert_eq!(grouped[0].changes[0].subject, "fix: it");
    }

    #[test]
    fn shared_titles_merge_at_earliest_rank() {
        let rules = vec![
            GroupRule::new("^feat", "Features", false).unwrap(),
            GroupRule::new("^fix", "Fixes", false).unwrap(),
            GroupRule::new("^perf", "Features", false).unwrap(),
        ];
        let grouped = group_by_rules(
            vec![
                change("fix: a", "a@x"),
                change("perf: b", "a@x"),
                change("feat: c", "a@x"),
            ],
            &rules,
        );
        let titles: Vec<_> = grouped.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["Features", "Fixes"]);
        assert_eq!(grouped[0].changes[0].subject, "perf: b");
    }

    #[test]
    fn invalid_regexp_is_a_config_error() {
        assert!(matches!(
            GroupRule::new("(", "x", false),
            Err(ConfigError::InvalidRegexp { .. })
        ));
    }

    struct CountingResolver {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ResolveUsername for CountingResolver {
        async fn resolve_username(&self, _commit: &str, email: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(email.split('@').next().map(str::to_string))
        }
    }

    #[tokio::test]
    async fn usernames_are_resolved_once_per_email() {
        if std::process::Command::new("git").arg("--version").output().is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let git = |args: &[&str], email: &str| {
            let status = std::process::Command::new("git")
                .args(args)
                .current_dir(dir.path())
                .env("GIT_AUTHOR_NAME", "Dev")
                .env("GIT_AUTHOR_EMAIL", email)
                .env("GIT_COMMITTER_NAME", "Dev")
                .env("GIT_COMMITTER_EMAIL", email)
                .status()
                .unwrap();
            assert!(status.success(), "git {args:?}");
        };
        git(&["init", "-q"], "a@x");
        git(&["commit", "-q", "--allow-empty", "-m", "initial"], "a@x");
        git(&["tag", "v0.1.0"], "a@x");
        git(&["commit", "-q", "--allow-empty", "-m", "fix: one"], "alice@x");
        git(&["commit", "-q", "--allow-empty", "-m", "feat: two"], "bob@x");
        git(&["commit", "-q", "--allow-empty", "-m", "fix: three"], "alice@x");

        let resolver = CountingResolver {
            calls: AtomicUsize::new(0),
        };
        let changes = collect_changes(
            &CollectOptions {
                tag: "v0.2.0".into(),
                commitish: "HEAD".into(),
                repo_path: dir.path().to_path_buf(),
            },
            Some(&resolver),
        )
        .await
        .unwrap();

        let subjects: Vec<_> = changes.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(subjects, ["fix: three", "feat: two", "fix: one"]);
        assert_eq!(changes[0].username.as_deref(), Some("alice"));
        assert_eq!(changes[1].username.as_deref(), Some("bob"));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
    }

    struct FailingResolver;

    #[async_trait]
    impl ResolveUsername for FailingResolver {
        async fn resolve_username(&self, _commit: &str, _email: &str) -> Result<Option<String>> {
            Err(crate::error::PublishError::Rejected {
                provider: "github".into(),
                operation: "resolve username".into(),
                reason: "401 Bad credentials".into(),
            }
            .into())
        }
    }

    #[tokio::test]
    async fn resolver_failure_names_the_commit() {
        if std::process::Command::new("git").arg("--version").output().is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        for args in [
            &["init", "-q"][..],
            &["commit", "-q", "--allow-empty", "-m", "fix: one"][..],
        ] {
            let status = std::process::Command::new("git")
                .args(args)
                .current_dir(dir.path())
                .env("GIT_AUTHOR_NAME", "Dev")
                .env("GIT_AUTHOR_EMAIL", "dev@x")
                .env("GIT_COMMITTER_NAME", "Dev")
                .env("GIT_COMMITTER_EMAIL", "dev@x")
                .status()
                .unwrap();
            assert!(status.success(), "git {args:?}");
        }

        let err = collect_changes(
            &CollectOptions {
                tag: "v0.1.0".into(),
                commitish: "HEAD".into(),
                repo_path: dir.path().to_path_buf(),
            },
            Some(&FailingResolver),
        )
        .await
        .unwrap_err();

        match err {
            crate::error::ReleaseError::Changelog(ChangelogError::ResolveFailed { commit, reason }) => {
                assert_eq!(commit.len(), 40);
                assert!(reason.contains("Bad credentials"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
