// src/watch/hash.rs

use std::path::Path;

use anyhow::Result;
use blake3::Hasher;
use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::fs::FileSystem;
use crate::pipeline::sources::collect_sources;

/// Compute the hash of a single file.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let contents = fs.read(path)?;
    Ok(blake3::hash(&contents).to_hex().to_string())
}

/// Digest over every file in the source set, partials and non-style files
/// included.
///
/// Each entry contributes its relative path and content hash, in sorted
/// order, so renames and additions change the digest as well as edits.
pub fn compute_source_digest(fs: &dyn FileSystem, cfg: &ConfigFile) -> Result<String> {
    let set = collect_sources(fs, cfg)?;
    let root = cfg.source_dir();

    let mut rels: Vec<&str> = set.all_rel_paths().collect();
    rels.sort_unstable();

    let mut hasher = Hasher::new();
    for rel in rels {
        let file_hash = compute_file_hash(fs, &root.join(rel))?;
        hasher.update(rel.as_bytes());
        hasher.update(b"\0");
        hasher.update(file_hash.as_bytes());
    }

    let digest = hasher.finalize().to_hex().to_string();
    debug!(digest = %digest, "computed source digest");
    Ok(digest)
}

/// Remembers the last admitted digest and rejects repeats.
#[derive(Debug, Default)]
pub struct DigestGate {
    last: Option<String>,
}

impl DigestGate {
    pub fn new(initial: Option<String>) -> Self {
        Self { last: initial }
    }

    /// Returns true (and records `digest`) when it differs from the last one.
    pub fn admit(&mut self, digest: String) -> bool {
        if self.last.as_deref() == Some(digest.as_str()) {
            info!("source digest unchanged; skipping rebuild");
            return false;
        }
        self.last = Some(digest);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfigFile;
    use crate::fs::mock::MockFileSystem;
    use std::path::PathBuf;

    fn config() -> ConfigFile {
        let mut raw = RawConfigFile::default();
        raw.paths.source_dir = PathBuf::from("sass");
        raw.paths.dest_dir = PathBuf::from("css");
        ConfigFile::try_from(raw).unwrap()
    }

    #[test]
    fn file_hash_is_blake3_hex() {
        let fs = MockFileSystem::new();
        fs.add_file("test.txt", b"hello world".to_vec());

        let hash = compute_file_hash(&fs, Path::new("test.txt")).unwrap();
        assert_eq!(hash, "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24");
    }

    #[test]
    fn digest_tracks_partials_and_renames() {
        let fs = MockFileSystem::new();
        fs.add_file("sass/main.scss", "@use 'vars';");
        fs.add_file("sass/_vars.scss", "$c: red;");
        let cfg = config();

        let d1 = compute_source_digest(&fs, &cfg).unwrap();
        assert_eq!(d1, compute_source_digest(&fs, &cfg).unwrap());

        fs.add_file("sass/_vars.scss", "$c: blue;");
        let d2 = compute_source_digest(&fs, &cfg).unwrap();
        assert_ne!(d1, d2);

        fs.rename(Path::new("sass/main.scss"), Path::new("sass/site.scss")).unwrap();
        let d3 = compute_source_digest(&fs, &cfg).unwrap();
        assert_ne!(d2, d3);
    }

    #[test]
    fn gate_rejects_repeated_digest() {
        let mut gate = DigestGate::new(Some("a".to_string()));
        assert!(!gate.admit("a".to_string()));
        assert!(gate.admit("b".to_string()));
        assert!(!gate.admit("b".to_string()));
        assert!(gate.admit("a".to_string()));
    }
}
