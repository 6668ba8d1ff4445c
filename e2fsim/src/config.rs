use std::{path::PathBuf, time::Duration};

/// Environment variable overriding the format tool.
pub const ENV_MKFS: &str = "E2FSIM_MKFS";
/// Environment variable overriding the check tool.
pub const ENV_FSCK: &str = "E2FSIM_FSCK";

/// Which external tools to run and how to supervise them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Format tool, looked up on `PATH` unless absolute.
    pub mkfs:            PathBuf,
    /// Check tool, looked up on `PATH` unless absolute.
    pub fsck:            PathBuf,
    /// How often the check tool's output pipe is polled.
    pub poll_interval:   Duration,
    /// Largest tool output passed on as a user message, in bytes.
    pub max_message_len: usize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            mkfs:            PathBuf::from("mke2fs"),
            fsck:            PathBuf::from("e2fsck"),
            poll_interval:   Duration::from_millis(10),
            max_message_len: 10240,
        }
    }
}

impl ToolConfig {
    /// Defaults, with tool paths overridden from the environment.
    pub fn from_env() -> Self {
        let mut res = Self::default();
        if let Some(p) = std::env::var_os(ENV_MKFS) {
            res.mkfs = PathBuf::from(p);
        }
        if let Some(p) = std::env::var_os(ENV_FSCK) {
            res.fsck = PathBuf::from(p);
        }
        res
    }
    /// Uses the given tools instead of the defaults.
    pub fn with_tools<M: Into<PathBuf>, F: Into<PathBuf>>(mkfs: M, fsck: F) -> Self {
        Self {
            mkfs: mkfs.into(),
            fsck: fsck.into(),
            ..Self::default()
        }
    }
}

#[test]
fn defaults_name_e2fsprogs() {
    let c = ToolConfig::default();
    assert_eq!(c.mkfs, PathBuf::from("mke2fs"));
    assert_eq!(c.fsck, PathBuf::from("e2fsck"));
    assert_eq!(c.poll_interval, Duration::from_millis(10));

    let c = ToolConfig::with_tools("/sbin/mkfs.ext3", "/sbin/fsck.ext3");
    assert_eq!(c.fsck, PathBuf::from("/sbin/fsck.ext3"));
    assert_eq!(c.max_message_len, 10240);
}

#[test]
#[serial]
fn tools_from_env() {
    std::env::set_var(ENV_FSCK, "/opt/e2fsprogs/sbin/e2fsck");
    let c = ToolConfig::from_env();
    std::env::remove_var(ENV_FSCK);
    assert_eq!(c.fsck, PathBuf::from("/opt/e2fsprogs/sbin/e2fsck"));
    assert_eq!(ToolConfig::from_env().fsck, PathBuf::from("e2fsck"));
}
