mod common;

#[cfg(test)]
mod tests {
    use super::common::{self, ARCHIVE_NAMES, CONFIG, TAG};
    use assert_cmd::Command;
    use predicates::prelude::*;

    fn cli() -> Command {
        let mut cmd = Command::cargo_bin("kodegen_release_pipeline").unwrap();
        cmd.env_remove("GITHUB_TOKEN").env_remove("GH_TOKEN");
        cmd
    }

    #[test]
    fn test_try_all_builds_every_local_artifact() {
        let project = common::project(CONFIG);

        cli()
            .arg("--project-dir")
            .arg(project.path())
            .args(["--tag", TAG, "--try", "all", "--commitish", "main"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created 2 archive(s)"));

        assert!(common::archive_path(project.path(), "unix/linux/amd64", ARCHIVE_NAMES[0]).exists());
        assert!(common::archive_path(project.path(), "unix/darwin/arm64", ARCHIVE_NAMES[1]).exists());
        assert!(common::release_dir(project.path()).join("checksum.txt").exists());
    }

    #[test]
    fn test_archive_filter_selects_targets() {
        let project = common::project(CONFIG);

        cli()
            .arg("--project-dir")
            .arg(project.path())
            .args(["--tag", TAG, "archive", "--build-paths", "builds/unix/linux/**"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created 1 archive(s)"));

        assert!(!common::archive_path(project.path(), "unix/darwin/arm64", ARCHIVE_NAMES[1]).exists());
    }

    #[test]
    fn test_missing_tag_is_rejected() {
        let project = common::project(CONFIG);

        cli()
            .arg("--project-dir")
            .arg(project.path())
            .args(["archive"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--tag is required"));
    }

    #[test]
    fn test_release_without_token_fails_outside_try_mode() {
        let project = common::project(CONFIG);

        cli()
            .arg("--project-dir")
            .arg(project.path())
            .args(["--tag", TAG, "all", "--commitish", "main"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("GITHUB_TOKEN"));
    }
}
