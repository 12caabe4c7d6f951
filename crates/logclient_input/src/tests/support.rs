use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Drops a fake `logClient` shell script into `dir` and makes it executable.
pub(super) fn write_fake_logclient(dir: &Path, script: &str) -> PathBuf {
    let path = dir.join("logClient");
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    #[cfg(unix)]
    {
        perms.set_mode(0o755);
    }
    fs::set_permissions(&path, perms).unwrap();
    path
}
