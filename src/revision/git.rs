// Git plumbing
//
// Every git invocation names its repository through `current_dir`; the
// process working directory is never changed.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

use super::commits::CommitList;

/// Full history of `repo`, oldest commit first.
pub async fn collect_commits(repo: &Path) -> Result<CommitList> {
    let output = Command::new("git")
        .args(["log", "--reverse", "--pretty=format:%H"])
        .current_dir(repo)
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("Failed to run git log in {}", repo.display()))?;

    if !output.status.success() {
        bail!(
            "Failed to collect commits in {}: {}",
            repo.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    CommitList::parse(&String::from_utf8_lossy(&output.stdout))
}

/// `git checkout <commit>` inside `repo`.
pub async fn checkout(repo: &Path, commit: &str, quiet: bool) -> Result<()> {
    let mut command = Command::new("git");
    command
        .args(["checkout", commit])
        .current_dir(repo)
        .stdin(Stdio::null());
    if quiet {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    }

    let status = command
        .status()
        .await
        .with_context(|| format!("Failed to run git checkout in {}", repo.display()))?;

    if !status.success() {
        bail!("git checkout {} failed in {} ({})", commit, repo.display(), status);
    }

    info!("Checked out to commit {}", commit);
    Ok(())
}
