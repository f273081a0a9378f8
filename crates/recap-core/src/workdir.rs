use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::PathBuf,
};

/// Per-run artifact directory for a given URL. Artifacts here (the downloaded
/// subtitle file) are transient; nothing reads them across runs.
pub fn get_workdir(url: &str) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    get_root_workdir().join(hasher.finish().to_string())
}

pub fn get_root_workdir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("recap")
}
