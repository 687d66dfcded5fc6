//! Repository cloning
//!
//! The core only needs "put the template at this path"; [`GitCloner`] does
//! it with the `git` binary and [`clone_repo_and_clean`] strips the version
//! control metadata afterwards.

use crate::error::{Result, ScaffoldError};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

/// Where a template came from and where it landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneResult {
    pub source: String,
    pub destination: PathBuf,
}

/// Clone transport contract
pub trait RepoCloner {
    fn clone_repo(
        &self,
        source: &str,
        destination: &Path,
    ) -> impl Future<Output = Result<CloneResult>> + Send;
}

/// Options for [`GitCloner`]
#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    /// Shallow clone with specified depth
    pub depth: Option<u32>,
    /// Branch or tag to check out
    pub branch: Option<String>,
}

/// Clones with the system `git` binary
#[derive(Debug, Clone, Default)]
pub struct GitCloner {
    options: CloneOptions,
}

impl GitCloner {
    pub fn new(options: CloneOptions) -> Self {
        Self { options }
    }
}

impl RepoCloner for GitCloner {
    async fn clone_repo(&self, source: &str, destination: &Path) -> Result<CloneResult> {
        info!("Cloning {} -> {}", source, destination.display());

        if !is_valid_repo_address(source) {
            return Err(ScaffoldError::clone_failed(
                source,
                "not a git URL or an existing local path",
            ));
        }
        if !is_empty_or_missing(destination) {
            return Err(ScaffoldError::clone_failed(
                source,
                format!("destination {} is not empty", destination.display()),
            ));
        }

        let mut cmd = Command::new("git");
        cmd.arg("clone").arg("--quiet");
        if let Some(depth) = self.options.depth {
            cmd.arg("--depth").arg(depth.to_string());
        }
        if let Some(branch) = &self.options.branch {
            cmd.arg("--branch").arg(branch);
        }
        cmd.arg(source).arg(destination);

        debug!("Running: git clone");
        let output = cmd.output().await.map_err(|e| {
            let message = if e.kind() == ErrorKind::NotFound {
                "git command not found; make sure git is installed and in PATH".to_string()
            } else {
                e.to_string()
            };
            ScaffoldError::clone_failed(source, message)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScaffoldError::clone_failed(source, stderr.trim()));
        }

        Ok(CloneResult {
            source: source.to_string(),
            destination: destination.to_path_buf(),
        })
    }
}

/// Clone `source` into `destination` and remove its `.git` metadata
pub async fn clone_repo_and_clean<C: RepoCloner>(
    cloner: &C,
    source: &str,
    destination: &Path,
) -> Result<CloneResult> {
    let result = cloner.clone_repo(source, destination).await?;

    let git_dir = result.destination.join(".git");
    let removed = match tokio::fs::symlink_metadata(&git_dir).await {
        Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(&git_dir).await,
        Ok(_) => tokio::fs::remove_file(&git_dir).await,
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    };
    removed.map_err(|e| {
        ScaffoldError::clone_failed(source, format!("failed to remove {}: {}", git_dir.display(), e))
    })?;

    debug!("Removed version control metadata from {}", result.destination.display());
    Ok(result)
}

/// Accept git-style URLs, scp-like `user@host:path`, and existing local paths
pub fn is_valid_repo_address(address: &str) -> bool {
    if address.trim().is_empty() {
        return false;
    }
    if let Ok(url) = Url::parse(address) {
        if matches!(url.scheme(), "https" | "http" | "ssh" | "git" | "file") {
            return true;
        }
    }
    if let Some((user_host, path)) = address.split_once(':') {
        if user_host.contains('@') && !user_host.contains('/') && !path.is_empty() {
            return true;
        }
    }
    Path::new(address).exists()
}

/// Last path segment of an address without `.git`, used as a default directory name
///
/// - https://github.com/user/repo.git -> repo
/// - git@github.com:user/repo.git -> repo
pub fn repo_name(address: &str) -> Option<String> {
    let trimmed = address.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then(|| name.to_string())
}

fn is_empty_or_missing(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(e) => e.kind() == ErrorKind::NotFound,
    }
}
