//! Node configuration, from command-line flags or `GRID_*` environment variables.

use crate::cluster::address::Address;
use crate::cluster::partitioner::DEFAULT_PARTITION_COUNT;

use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "grid-node", about = "Runs one node of the data grid")]
pub struct NodeConfig {
    /// Address this node listens on and is known by in the member list.
    #[arg(long, env = "GRID_BIND")]
    pub bind: Address,

    /// Static member list (comma separated). The bind address is always included.
    #[arg(long, env = "GRID_MEMBERS", value_delimiter = ',')]
    pub members: Vec<Address>,

    #[arg(long, env = "GRID_PARTITIONS", default_value_t = DEFAULT_PARTITION_COUNT)]
    pub partitions: u32,

    /// Worker lanes applying local operations.
    #[arg(long, env = "GRID_LANES", default_value_t = 4)]
    pub lanes: usize,

    /// Deadline for operations forwarded to another node.
    #[arg(long, env = "GRID_CALL_TIMEOUT_MS", default_value_t = 5000)]
    pub call_timeout_ms: u64,
}

impl NodeConfig {
    /// Single-node configuration with defaults.
    pub fn standalone(bind: Address) -> Self {
        Self {
            bind,
            members: vec![bind],
            partitions: DEFAULT_PARTITION_COUNT,
            lanes: 4,
            call_timeout_ms: 5000,
        }
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}
