//! Stand-in shell scripts for mke2fs and e2fsck.

use std::fs::{self, File};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable `/bin/sh` script called `name` into `dir`.
///
/// The file is closed before returning so it can be executed right away.
pub fn write_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    {
        let mut f = File::create(&path).unwrap();
        writeln!(f, "#!/bin/sh").unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f.sync_all().unwrap();
    }
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A tool that records its arguments, one per line, in `dir/args` and
/// exits with `rc`.
pub fn recording_tool(dir: &Path, name: &str, rc: i32) -> PathBuf {
    let body = format!(
        "printf '%s\\n' \"$@\" > '{}'\nexit {}\n",
        args_file(dir).display(),
        rc
    );
    write_tool(dir, name, &body)
}

/// Where [recording_tool] puts the arguments it saw.
pub fn args_file(dir: &Path) -> PathBuf {
    dir.join("args")
}

/// The arguments recorded by the last [recording_tool] run.
pub fn recorded_args(dir: &Path) -> Vec<String> {
    fs::read_to_string(args_file(dir))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
