use anyhow::{Context, Result, anyhow, bail};
use git2::{Repository, RepositoryState};
use std::path::{Path, PathBuf};

/// the version control operations decoding needs
pub trait Vcs {
    /// whether the path is present in the index
    fn is_tracked(&self, path: &Path) -> Result<bool>;

    /// add the path's current content to the index
    fn stage(&mut self, path: &Path) -> Result<()>;

    /// commit exactly the given paths with one message
    fn commit(&mut self, message: &str, paths: &[PathBuf]) -> Result<()>;
}

/// a git working tree discovered from the decode root
pub struct GitRepo {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRepo {
    /// find the repository containing `path` (can be anywhere within the repo)
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .map_err(|e| anyhow!("not in a git repository: {}", e.message()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| anyhow!("repository has no working tree"))?
            .canonicalize()
            .context("failed to resolve repository working tree")?;
        Ok(Self { repo, workdir })
    }

    /// describe anything that would make committing unwise
    pub fn sanity_check(&self) -> Option<&'static str> {
        if self.repo.state() != RepositoryState::Clean {
            return Some("repository is in the middle of an operation (merge, rebase, etc)");
        }
        if self.repo.head_detached().unwrap_or(false) {
            return Some("repository is in detached HEAD state");
        }
        None
    }

    /// path relative to the working tree, as git wants it
    ///
    /// relative input is taken as already relative to the working tree
    fn relative(&self, path: &Path) -> Result<PathBuf> {
        let absolute = self.workdir.join(path);

        // the file itself may not exist yet, so fall back to resolving its parent
        let resolved = match absolute.canonicalize() {
            Ok(resolved) => resolved,
            Err(_) => match (absolute.parent(), absolute.file_name()) {
                (Some(parent), Some(name)) => parent
                    .canonicalize()
                    .with_context(|| format!("failed to resolve {}", parent.display()))?
                    .join(name),
                _ => absolute.clone(),
            },
        };

        resolved
            .strip_prefix(&self.workdir)
            .map(Path::to_path_buf)
            .map_err(|_| anyhow!("{} is outside the repository", path.display()))
    }
}

impl Vcs for GitRepo {
    fn is_tracked(&self, path: &Path) -> Result<bool> {
        let relative = self.relative(path)?;
        let mut index = self.repo.index().context("failed to get git index")?;
        // pick up anything the operator staged or committed elsewhere meanwhile
        index.read(true).context("failed to read git index")?;
        Ok(index.get_path(&relative, 0).is_some())
    }

    fn stage(&mut self, path: &Path) -> Result<()> {
        let relative = self.relative(path)?;
        let mut index = self.repo.index().context("failed to get git index")?;
        index.read(true).context("failed to read git index")?;

        if let Err(e) = index.add_path(&relative) {
            // rollback by reloading from disk
            if let Err(e) = index.read(true) {
                crate::warning!("failed to reload index during rollback: {}", e);
            }
            bail!("failed to stage {}: {}", relative.display(), e.message());
        }

        index
            .write()
            .map_err(|e| anyhow!("failed to write git index: {}", e.message()))
    }

    /// uses the git binary rather than git2 so commit signing (gpg/ssh)
    /// and hooks (pre-commit, commit-msg, etc.) work as expected
    fn commit(&mut self, message: &str, paths: &[PathBuf]) -> Result<()> {
        let relative = paths
            .iter()
            .map(|p| self.relative(p))
            .collect::<Result<Vec<_>>>()?;

        let status = std::process::Command::new("git")
            .arg("commit")
            .arg("--message")
            .arg(message)
            .arg("--")
            .args(&relative)
            .current_dir(&self.workdir)
            .status()
            .context("failed to run git commit")?;

        if !status.success() {
            bail!("git commit failed with exit code: {}", status);
        }
        Ok(())
    }
}

/// stands in when the decode root is not inside a repository
pub struct Unversioned;

impl Vcs for Unversioned {
    fn is_tracked(&self, _path: &Path) -> Result<bool> {
        bail!("not in a git repository")
    }

    fn stage(&mut self, path: &Path) -> Result<()> {
        bail!("cannot stage {}: not in a git repository", path.display())
    }

    fn commit(&mut self, _message: &str, _paths: &[PathBuf]) -> Result<()> {
        bail!("cannot commit: not in a git repository")
    }
}
