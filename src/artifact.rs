use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex characters of the parameter digest kept in file names.
const DIGEST_LEN: usize = 12;

/// File name of the histogram image for one filter request.
///
/// Identical `(quality, features)` pairs always map to the same name; a
/// different feature list (or order) maps to a different one, so requests
/// that draw different images never share a file.
pub fn artifact_name(quality: i64, features: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(quality.to_le_bytes());
    for feature in features {
        hasher.update((feature.len() as u64).to_le_bytes());
        hasher.update(feature.as_bytes());
    }
    let digest = hex::encode(hasher.finalize());
    format!("quality_{quality}_{}_distribution.png", &digest[..DIGEST_LEN])
}

pub fn artifact_path(output_dir: &Path, quality: i64, features: &[String]) -> PathBuf {
    output_dir.join(artifact_name(quality, features))
}
