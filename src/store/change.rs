//! Content change detection via fingerprints.

use std::path::Path;

use sha2::{
    Digest,
    Sha256,
};

/// Hex-encoded SHA-256 digest of the given bytes.
#[must_use]
pub fn fingerprint(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Whether writing `new_content` to `path` would change the file.
///
/// A missing file is always a change. An existing file that cannot be
/// read is treated as changed too, so the subsequent write repairs it.
#[must_use]
pub fn has_changed(path: &Path, new_content: &[u8]) -> bool {
    if !path.exists() {
        return true;
    }
    match std::fs::read(path) {
        Ok(existing) => fingerprint(&existing) != fingerprint(new_content),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "Could not fingerprint existing file, rewriting it");
            true
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    fn test_missing_file_is_changed() {
        let dir = TempDir::new().unwrap();

        assert!(has_changed(&dir.path().join("messages.en.yml"), b"greeting: Hello\n"));
    }

    #[rstest]
    fn test_identical_content_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.en.yml");
        fs::write(&path, b"greeting: Hello\n").unwrap();

        assert!(!has_changed(&path, b"greeting: Hello\n"));
    }

    #[rstest]
    fn test_different_content_is_changed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.en.yml");
        fs::write(&path, b"greeting: Hello\n").unwrap();

        assert!(has_changed(&path, b"greeting: Hi\n"));
    }

    #[googletest::test]
    fn test_fingerprint_is_stable() {
        expect_that!(fingerprint(b"abc"), eq(fingerprint(b"abc")));
        expect_that!(fingerprint(b"abc"), not(eq(fingerprint(b"abd"))));
    }
}
