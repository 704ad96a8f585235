use std::{fs, path::PathBuf};

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> String {
    let dir: PathBuf = std::env::temp_dir().join(format!("summon-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir.to_string_lossy().into_owned()
}
