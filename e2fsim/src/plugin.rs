use derivative::Derivative;

use crate::{
    operations::{self, FsckReport, OptionArray},
    Ext2Result, LogSink, MessageSink, Superblock, ToolConfig, Volume, VolumeLimits,
};

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "ext2/3";

/// The operations a filesystem interface module offers the volume engine.
pub trait FsInterface {
    /// Short name of the filesystem family
    fn name(&self) -> &'static str;

    /// Confirms the tools are usable. The ext2 tools have no minimum version.
    fn test_version(&self) -> Ext2Result<()>;

    /// Looks for a valid superblock and caches it on the volume.
    fn probe<'a>(&self, volume: &'a mut Volume) -> Ext2Result<&'a Superblock>;

    /// Size limits of a probed volume.
    fn get_limits(&self, volume: &Volume) -> Ext2Result<VolumeLimits>;

    /// Creates a filesystem. Returns the format tool's exit code.
    fn mkfs(&self, volume: &Volume, options: &OptionArray) -> Ext2Result<i32>;

    /// Removes the filesystem signature from a probed volume.
    fn unmkfs(&self, volume: &mut Volume) -> Ext2Result<()>;

    /// Checks the filesystem.
    fn fsck(&self, volume: &Volume, options: &OptionArray) -> Ext2Result<FsckReport>;
}

/// The ext2/ext3 interface module.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Ext2Plugin {
    tools: ToolConfig,
    #[derivative(Debug = "ignore")]
    sink:  Box<dyn MessageSink + Send + Sync>,
}

impl Default for Ext2Plugin {
    fn default() -> Self {
        Ext2Plugin::new(ToolConfig::from_env(), Box::new(LogSink))
    }
}

impl Ext2Plugin {
    /// A plugin running `tools` and reporting to `sink`.
    pub fn new(tools: ToolConfig, sink: Box<dyn MessageSink + Send + Sync>) -> Ext2Plugin {
        Ext2Plugin { tools, sink }
    }
    /// The tools this plugin runs
    pub fn tools(&self) -> &ToolConfig {
        &self.tools
    }
}

impl FsInterface for Ext2Plugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn test_version(&self) -> Ext2Result<()> {
        Ok(())
    }

    fn probe<'a>(&self, volume: &'a mut Volume) -> Ext2Result<&'a Superblock> {
        volume.probe()
    }

    fn get_limits(&self, volume: &Volume) -> Ext2Result<VolumeLimits> {
        volume.limits()
    }

    fn mkfs(&self, volume: &Volume, options: &OptionArray) -> Ext2Result<i32> {
        operations::mkfs(volume, options, &self.tools)
    }

    fn unmkfs(&self, volume: &mut Volume) -> Ext2Result<()> {
        volume.unformat()
    }

    fn fsck(&self, volume: &Volume, options: &OptionArray) -> Ext2Result<FsckReport> {
        operations::fsck(volume, options, &self.tools, self.sink.as_ref())
    }
}

/// Every interface module this library provides.
pub fn plugin_records() -> Vec<Box<dyn FsInterface>> {
    vec![Box::new(Ext2Plugin::default())]
}
