use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use time::OffsetDateTime;

/// Disk-backed profile-picture store: one fixed destination directory,
/// filenames derived from the upload instant.
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Opens the store, creating the destination directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create upload directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes one upload under `<epoch-millis><original-extension>` and
    /// returns the stored filename. Two uploads in the same millisecond
    /// with the same extension map to the same name and overwrite.
    pub async fn save(&self, original_name: &str, body: Bytes) -> anyhow::Result<String> {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let name = timestamped_name(original_name, millis);
        let path = self.dir.join(&name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        Ok(name)
    }
}

/// `<millis><ext>`, where the extension (dot included) comes from the
/// client-supplied name. Extension-less names yield a bare timestamp.
fn timestamped_name(original: &str, millis: i128) -> String {
    match Path::new(original).extension() {
        Some(ext) => format!("{}.{}", millis, ext.to_string_lossy()),
        None => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_keep_the_original_extension() {
        assert_eq!(
            timestamped_name("avatar.png", 1_700_000_000_000),
            "1700000000000.png"
        );
        assert_eq!(timestamped_name("archive.tar.gz", 1), "1.gz");
        assert_eq!(timestamped_name("photo.JPEG", 7), "7.JPEG");
    }

    #[test]
    fn names_without_an_extension_are_the_bare_timestamp() {
        assert_eq!(timestamped_name("README", 42), "42");
        assert_eq!(timestamped_name(".gitignore", 42), "42");
        assert_eq!(timestamped_name("", 42), "42");
    }

    #[tokio::test]
    async fn save_writes_the_body_under_a_timestamped_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        let stored = store
            .save("avatar.png", Bytes::from_static(b"pixels"))
            .await
            .unwrap();

        assert!(stored.ends_with(".png"));
        let on_disk = std::fs::read(dir.path().join(&stored)).unwrap();
        assert_eq!(on_disk, b"pixels");
    }

    #[tokio::test]
    async fn open_creates_the_destination_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("profile-pictures");

        let store = DiskStore::open(&nested).unwrap();

        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }
}
