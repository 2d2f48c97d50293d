//! Working directory layout
//!
//! ```text
//! <work_dir>/
//!   upload_<session_id>/<original file name>
//!   generated_image_<session_id>.png
//! ```

use std::io;
use std::path::{Path, PathBuf};

const UPLOAD_DIR_PREFIX: &str = "upload_";

/// File layout rooted at the configured work directory
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn upload_dir(&self, session_id: &str) -> PathBuf {
        self.root.join(format!("{}{}", UPLOAD_DIR_PREFIX, session_id))
    }

    pub fn image_path(&self, session_id: &str) -> PathBuf {
        self.root.join(format!("generated_image_{}.png", session_id))
    }

    /// Save an uploaded file into a fresh per-session directory
    pub async fn save_upload(
        &self,
        session_id: &str,
        file_name: &str,
        data: &[u8],
    ) -> io::Result<PathBuf> {
        let dir = self.upload_dir(session_id);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(safe_file_name(file_name));
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }

    /// Write a generated image for `session_id`
    pub async fn write_image(&self, session_id: &str, png: &[u8]) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.image_path(session_id);
        tokio::fs::write(&path, png).await?;
        Ok(path)
    }
}

/// Strip any directory components a client put in the file name
pub fn safe_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match base {
        "" | "." | ".." => "upload.pdf".to_string(),
        name => name.to_string(),
    }
}

/// Delete a file or directory, logging failures
///
/// When a file sits alone in its `upload_` directory the directory goes too.
pub async fn remove_path(path: &Path) {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to stat for cleanup: {}", e);
            return;
        }
    };

    let result = if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };

    if let Err(e) = result {
        tracing::warn!(path = %path.display(), "Error cleaning up file: {}", e);
        return;
    }

    if let Some(parent) = path.parent() {
        let is_upload_dir = parent
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(UPLOAD_DIR_PREFIX));
        if is_upload_dir {
            // Fails harmlessly when other files remain
            let _ = tokio::fs::remove_dir(parent).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("report.pdf"), "report.pdf");
        assert_eq!(safe_file_name("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(safe_file_name("C:\\docs\\thesis.pdf"), "thesis.pdf");
        assert_eq!(safe_file_name(".."), "upload.pdf");
        assert_eq!(safe_file_name("dir/"), "upload.pdf");
    }

    #[test]
    fn test_layout() {
        let workspace = Workspace::new("/srv/folio");
        assert_eq!(workspace.upload_dir("s1"), PathBuf::from("/srv/folio/upload_s1"));
        assert_eq!(
            workspace.image_path("s1"),
            PathBuf::from("/srv/folio/generated_image_s1.png")
        );
    }

    #[tokio::test]
    async fn test_save_and_remove_upload() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path());

        let path = workspace.save_upload("s1", "book.pdf", b"%PDF-1.4").await.unwrap();
        assert_eq!(path, dir.path().join("upload_s1").join("book.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");

        remove_path(&path).await;
        assert!(!path.exists());
        assert!(!workspace.upload_dir("s1").exists());
    }

    #[tokio::test]
    async fn test_remove_missing_path_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        remove_path(&dir.path().join("never-existed.png")).await;
    }

    #[tokio::test]
    async fn test_write_image() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::new(dir.path().join("nested"));

        let path = workspace.write_image("s1", b"png-bytes").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"png-bytes");
    }
}
