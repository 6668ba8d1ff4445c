use std::{
    io::{ErrorKind, Read},
    process::{Child, Command, Stdio},
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
};

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, FromRepr, IntoStaticStr};

use super::{exit_code, spawn_error, ArgVector, OptionArray, ToolOption};
use crate::{Ext2Result, MessageSink, ToolConfig, Volume};

/// The options understood when checking, with their table indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, IntoStaticStr, FromRepr)]
#[repr(u32)]
pub enum FsckOption {
    /// Check even if the filesystem looks clean
    #[strum(serialize = "force")]
    Force       = 0,
    /// Answer no to every question, change nothing
    #[strum(serialize = "readonly")]
    ReadOnly    = 1,
    /// Read-only bad block scan
    #[strum(serialize = "badblocks")]
    BadBlocks   = 2,
    /// Read-write bad block scan
    #[strum(serialize = "badblocks_rw")]
    BadBlocksRw = 3,
    /// Print timing statistics
    #[strum(serialize = "timing")]
    Timing      = 4,
}

impl ToolOption for FsckOption {
    fn from_index(index: u32) -> Option<Self> {
        FsckOption::from_repr(index)
    }
}

/// Builds the `e2fsck` command line for a volume.
///
/// A mounted volume is always checked read-only (`-n`), and never forced or
/// scanned for bad blocks. Without `-n`, `-c` or `-cc` the check preens
/// (`-p`). The device path comes last.
#[cfg(feature = "stable")]
pub fn set_fsck_options(options: &OptionArray, volume: &Volume, program: &str) -> ArgVector {
    let mounted = volume.is_mounted();
    let mut argv = ArgVector::new(program);
    let mut do_preen = true;
    let mut read_only = false;

    for opt in options {
        match opt.resolve::<FsckOption>() {
            Some(FsckOption::Force) if opt.is_true() && !mounted => argv.push("-f"),
            Some(FsckOption::ReadOnly) if (opt.is_true() || mounted) && !read_only => {
                argv.push("-n");
                read_only = true;
                do_preen = false;
            }
            Some(FsckOption::BadBlocks) if opt.is_true() && !mounted => {
                argv.push("-c");
                do_preen = false;
            }
            Some(FsckOption::BadBlocksRw) if opt.is_true() && !mounted => {
                argv.push("-cc");
                do_preen = false;
            }
            Some(FsckOption::Timing) if opt.is_true() => argv.push("-tt"),
            _ => {}
        }
    }

    if mounted && !read_only {
        argv.push("-n");
        do_preen = false;
    }
    if do_preen {
        argv.push("-p");
    }
    argv.push(volume.dev_path().to_string_lossy());
    info!("{}", argv);
    argv
}

/// The conditions e2fsck reports through its exit code bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumIter, IntoStaticStr)]
#[repr(i32)]
pub enum FsckExit {
    /// Errors were corrected
    Corrected        = 1,
    /// Errors were corrected, the system should be rebooted
    RebootRequired   = 2,
    /// Errors were left uncorrected
    Uncorrected      = 4,
    /// e2fsck itself failed
    OperationalError = 8,
    /// Bad command line
    UsageError       = 16,
    /// Cancelled by request
    Cancelled        = 32,
    /// Shared library error
    LibraryError     = 128,
}

/// A decoded e2fsck exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsckStatus(i32);

impl FsckStatus {
    /// Wraps a raw exit code.
    pub fn from_code(code: i32) -> FsckStatus {
        FsckStatus(code)
    }
    /// The raw exit code
    pub fn code(self) -> i32 {
        self.0
    }
    /// Every condition flagged in the code
    pub fn flags(self) -> Vec<FsckExit> {
        FsckExit::iter().filter(|f| self.has(*f)).collect()
    }
    /// True if `flag` is set
    pub fn has(self, flag: FsckExit) -> bool {
        self.0 & flag as i32 != 0
    }
    /// No errors found
    pub fn is_clean(self) -> bool {
        self.0 == 0
    }
    /// Errors were found and all of them were fixed
    pub fn was_corrected(self) -> bool {
        self.has(FsckExit::Corrected) || self.has(FsckExit::RebootRequired)
    }
    /// The filesystem is still damaged or the check did not complete
    pub fn is_failure(self) -> bool {
        self.0 & !(FsckExit::Corrected as i32 | FsckExit::RebootRequired as i32) != 0
    }
}

/// What a check run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsckReport {
    /// Decoded exit code
    pub status: FsckStatus,
    /// Everything the tool wrote to stdout and stderr
    pub output: String,
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R, tx: Sender<Vec<u8>>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("Lost tool output: {}", e);
                    break;
                }
            }
        }
    })
}

/// Header of the message carrying the check output.
pub const FSCK_MESSAGE_HEADER: &str = "e2fsck output: \n\n";

/// Moves pending chunks into `output`, keeping at most `cap` bytes.
/// Returns how many bytes were discarded.
fn drain(rx: &Receiver<Vec<u8>>, output: &mut Vec<u8>, cap: usize) -> usize {
    let mut dropped = 0;
    while let Ok(chunk) = rx.try_recv() {
        let keep = cap.saturating_sub(output.len()).min(chunk.len());
        output.extend_from_slice(&chunk[..keep]);
        dropped += chunk.len() - keep;
    }
    dropped
}

/// Kills and reaps a child we stopped supervising, then joins its readers.
fn abandon(child: &mut Child, readers: Vec<JoinHandle<()>>) {
    if let Err(e) = child.kill() {
        debug!("kill: {}", e);
    }
    if let Err(e) = child.wait() {
        warn!("Cannot reap child {}: {}", child.id(), e);
    }
    for r in readers {
        let _ = r.join();
    }
}

/// Checks the volume with `e2fsck`.
///
/// Blocks until the tool exits, polling its output every
/// `tools.poll_interval`. The collected output is passed to `sink` as a
/// single message.
#[cfg(feature = "stable")]
pub fn fsck(
    volume: &Volume,
    options: &OptionArray,
    tools: &ToolConfig,
    sink: &dyn MessageSink,
) -> Ext2Result<FsckReport> {
    let argv = set_fsck_options(options, volume, &tools.fsck.to_string_lossy());

    let mut child = Command::new(argv.program())
        .args(argv.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(argv.program(), e))?;

    let (tx, rx) = mpsc::channel();
    let mut readers = Vec::new();
    if let Some(out) = child.stdout.take() {
        readers.push(spawn_reader(out, tx.clone()));
    }
    if let Some(err) = child.stderr.take() {
        readers.push(spawn_reader(err, tx.clone()));
    }
    drop(tx);

    let cap = tools.max_message_len;
    let mut output = Vec::new();
    let mut dropped = 0;
    let status = loop {
        dropped += drain(&rx, &mut output, cap);
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => thread::sleep(tools.poll_interval),
            Err(e) => {
                error!("Lost track of {}: {}", argv.program(), e);
                abandon(&mut child, readers);
                return Err(e.into());
            }
        }
    };
    for r in readers {
        if r.join().is_err() {
            warn!("Output reader for {} panicked", argv.program());
        }
    }
    dropped += drain(&rx, &mut output, cap);

    if dropped > 0 {
        debug!("Dropped {} bytes of output", dropped);
    }
    let output = String::from_utf8_lossy(&output).into_owned();
    if !output.is_empty() {
        sink.message(&format!("{}{}", FSCK_MESSAGE_HEADER, output));
    }

    let rc = exit_code(argv.program(), status)?;
    info!("{} completed with exit code {}", argv.program(), rc);
    Ok(FsckReport {
        status: FsckStatus::from_code(rc),
        output,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::operations::{OptionEntry, OptionValue};

    fn vol(mounted: bool) -> Volume {
        Volume::new("/dev/evms/lv0").with_mounted(mounted)
    }

    #[test]
    fn defaults_to_preen() {
        let argv = set_fsck_options(&OptionArray::new(), &vol(false), "e2fsck");
        assert_eq!(argv.as_slice(), ["e2fsck", "-p", "/dev/evms/lv0"]);
    }

    #[test]
    fn mounted_force_becomes_read_only() {
        let opts = OptionArray::new().with_bool("force", true);
        let argv = set_fsck_options(&opts, &vol(true), "e2fsck");
        assert!(!argv.contains("-f"));
        assert!(argv.contains("-n"));
        assert!(!argv.contains("-p"));
        assert_eq!(argv.last(), "/dev/evms/lv0");
    }

    #[test]
    fn mounted_suppresses_bad_block_scans() {
        let opts = OptionArray::new()
            .with_bool("badblocks", true)
            .with_bool("badblocks_rw", true)
            .with_bool("readonly", false)
            .with_bool("timing", true);
        let argv = set_fsck_options(&opts, &vol(true), "e2fsck");
        assert_eq!(argv.as_slice(), ["e2fsck", "-n", "-tt", "/dev/evms/lv0"]);
    }

    #[test]
    fn unmounted_options() {
        let opts = OptionArray::new()
            .with_bool("force", true)
            .with_bool("badblocks", true)
            .with_bool("timing", true);
        let argv = set_fsck_options(&opts, &vol(false), "e2fsck");
        assert_eq!(argv.as_slice(), ["e2fsck", "-f", "-c", "-tt", "/dev/evms/lv0"]);

        let opts = OptionArray::new().with_bool("force", true).with_bool("readonly", true);
        let argv = set_fsck_options(&opts, &vol(false), "e2fsck");
        assert_eq!(argv.as_slice(), ["e2fsck", "-f", "-n", "/dev/evms/lv0"]);
    }

    #[test]
    fn timing_keeps_preen() {
        let opts = OptionArray::new().with_bool("timing", true).with_bool("force", true);
        let argv = set_fsck_options(&opts, &vol(false), "e2fsck");
        assert_eq!(argv.as_slice(), ["e2fsck", "-tt", "-f", "-p", "/dev/evms/lv0"]);
    }

    #[test]
    fn numbered_matches_named() {
        for mounted in [false, true].iter() {
            let named = OptionArray::new()
                .with_bool("force", true)
                .with_bool("readonly", false)
                .with_bool("badblocks", true)
                .with_bool("badblocks_rw", true)
                .with_bool("timing", true);
            let numbered: OptionArray = (0..5)
                .map(|i| OptionEntry::numbered(i, OptionValue::Bool(i != 1)))
                .collect();
            assert_eq!(
                set_fsck_options(&named, &vol(*mounted), "e2fsck"),
                set_fsck_options(&numbered, &vol(*mounted), "e2fsck")
            );
        }
    }

    #[test]
    fn drain_stops_buffering_at_cap() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            tx.send(vec![b'x'; 100]).unwrap();
        }
        let mut output = Vec::new();
        assert_eq!(drain(&rx, &mut output, 250), 150);
        assert_eq!(output.len(), 250);

        tx.send(vec![b'y'; 10]).unwrap();
        assert_eq!(drain(&rx, &mut output, 250), 10);
        assert!(rx.try_recv().is_err());
        assert_eq!(output.len(), 250);
    }

    #[test]
    fn abandoned_child_is_reaped() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        let (tx, _rx) = mpsc::channel();
        let readers = child.stdout.take().map(|out| spawn_reader(out, tx)).into_iter().collect();

        let start = std::time::Instant::now();
        abandon(&mut child, readers);
        assert!(start.elapsed() < std::time::Duration::from_secs(10));
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn status_decoding() {
        let s = FsckStatus::from_code(0);
        assert!(s.is_clean());
        assert!(s.flags().is_empty());

        let s = FsckStatus::from_code(1);
        assert!(s.was_corrected());
        assert!(!s.is_failure());
        assert_eq!(s.flags(), vec![FsckExit::Corrected]);

        let s = FsckStatus::from_code(4 | 8);
        assert!(s.is_failure());
        assert!(!s.was_corrected());
        assert_eq!(s.flags(), vec![FsckExit::Uncorrected, FsckExit::OperationalError]);
        assert_eq!(s.code(), 12);
    }
}
