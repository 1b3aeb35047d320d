//! Scheduled Task Handle
//!
//! A cluster-wide, value-comparable reference to one scheduled task. The handle
//! remembers *where* the task lives (a partition, or a pinned member) so that
//! later calls can be routed straight to the owner without resolving the
//! scheduler by name again.
//!
//! ## Text form
//! ```text
//! urn:hzScheduledTaskHandler:<location> <partitionId> <schedulerName> <taskName>
//! ```
//! `<location>` is `-` for partition-assigned handles, otherwise the member's
//! `host:port`. `<partitionId>` is `-1` for member-assigned handles. Fields may
//! be separated by spaces or NUL bytes on input (older handles used NUL); the
//! canonical output always uses single spaces. The text is persisted by clients
//! and must stay byte-stable.

use crate::cluster::address::Address;
use crate::error::HandleParseError;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const URN_BASE: &str = "urn:hzScheduledTaskHandler:";

/// Location marker used in place of an address by partition-assigned handles.
const UNASSIGNED_MEMBER: &str = "-";
/// Partition id written by member-assigned handles.
const UNASSIGNED_PARTITION: i64 = -1;
const FIELD_COUNT: usize = 4;

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\0'
}

/// Where the task's state is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskLocation {
    Partition(u32),
    Member(Address),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScheduledTaskHandle {
    location: TaskLocation,
    scheduler_name: String,
    task_name: String,
}

impl ScheduledTaskHandle {
    pub fn of_partition(
        partition_id: u32,
        scheduler_name: impl Into<String>,
        task_name: impl Into<String>,
    ) -> Result<Self, HandleParseError> {
        Self::build(TaskLocation::Partition(partition_id), scheduler_name, task_name)
    }

    pub fn of_member(
        address: Address,
        scheduler_name: impl Into<String>,
        task_name: impl Into<String>,
    ) -> Result<Self, HandleParseError> {
        Self::build(TaskLocation::Member(address), scheduler_name, task_name)
    }

    fn build(
        location: TaskLocation,
        scheduler_name: impl Into<String>,
        task_name: impl Into<String>,
    ) -> Result<Self, HandleParseError> {
        let scheduler_name = scheduler_name.into();
        let task_name = task_name.into();
        check_name("scheduler_name", &scheduler_name)?;
        check_name("task_name", &task_name)?;

        Ok(Self {
            location,
            scheduler_name,
            task_name,
        })
    }

    pub fn parse(urn: &str) -> Result<Self, HandleParseError> {
        if urn.trim().is_empty() {
            return Err(HandleParseError::NullInput);
        }

        let body = urn
            .strip_prefix(URN_BASE)
            .ok_or_else(|| HandleParseError::InvalidScheme {
                text: urn.to_string(),
            })?;

        let parts: Vec<&str> = body.split(is_separator).collect();
        if parts.len() != FIELD_COUNT || parts.iter().any(|part| part.is_empty()) {
            return Err(HandleParseError::MalformedBody {
                field: "field count",
                body: body.to_string(),
            });
        }

        let (location, partition, scheduler_name, task_name) =
            (parts[0], parts[1], parts[2], parts[3]);

        let partition_id: i64 = partition
            .parse()
            .map_err(|_| HandleParseError::MalformedBody {
                field: "partition id",
                body: body.to_string(),
            })?;

        let location = parse_location(location, partition_id)?;

        Ok(Self {
            location,
            scheduler_name: scheduler_name.to_string(),
            task_name: task_name.to_string(),
        })
    }

    pub fn to_urn(&self) -> String {
        let (location, partition_id) = match &self.location {
            TaskLocation::Partition(partition) => {
                (UNASSIGNED_MEMBER.to_string(), i64::from(*partition))
            }
            TaskLocation::Member(address) => (address.to_string(), UNASSIGNED_PARTITION),
        };

        format!(
            "{}{} {} {} {}",
            URN_BASE, location, partition_id, self.scheduler_name, self.task_name
        )
    }

    pub fn location(&self) -> TaskLocation {
        self.location
    }

    pub fn is_assigned_to_partition(&self) -> bool {
        matches!(self.location, TaskLocation::Partition(_))
    }

    pub fn is_assigned_to_member(&self) -> bool {
        matches!(self.location, TaskLocation::Member(_))
    }

    pub fn partition_id(&self) -> Option<u32> {
        match self.location {
            TaskLocation::Partition(partition) => Some(partition),
            TaskLocation::Member(_) => None,
        }
    }

    /// Partition id as written in the text form: `-1` for member-assigned handles.
    pub fn wire_partition_id(&self) -> i64 {
        self.partition_id()
            .map(i64::from)
            .unwrap_or(UNASSIGNED_PARTITION)
    }

    pub fn address(&self) -> Option<Address> {
        match self.location {
            TaskLocation::Member(address) => Some(address),
            TaskLocation::Partition(_) => None,
        }
    }

    pub fn scheduler_name(&self) -> &str {
        &self.scheduler_name
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }
}

fn check_name(field: &'static str, name: &str) -> Result<(), HandleParseError> {
    if name.is_empty() || name.contains(is_separator) {
        return Err(HandleParseError::MalformedBody {
            field,
            body: name.to_string(),
        });
    }
    Ok(())
}

fn parse_location(location: &str, partition_id: i64) -> Result<TaskLocation, HandleParseError> {
    if location == UNASSIGNED_MEMBER {
        let partition =
            u32::try_from(partition_id).map_err(|_| HandleParseError::InvalidLocation {
                location: location.to_string(),
                reason: "partition-assigned handle needs a non-negative partition id",
            })?;
        return Ok(TaskLocation::Partition(partition));
    }

    if !location.contains(':') {
        return Err(HandleParseError::InvalidLocation {
            location: location.to_string(),
            reason: "expected '-' or host:port",
        });
    }

    let address: Address = location
        .parse()
        .map_err(|_| HandleParseError::InvalidAddress {
            address: location.to_string(),
        })?;

    if partition_id != UNASSIGNED_PARTITION {
        return Err(HandleParseError::InvalidLocation {
            location: location.to_string(),
            reason: "member-assigned handle must carry partition id -1",
        });
    }

    Ok(TaskLocation::Member(address))
}

impl fmt::Display for ScheduledTaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_urn())
    }
}

impl FromStr for ScheduledTaskHandle {
    type Err = HandleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ScheduledTaskHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_urn())
    }
}

impl<'de> Deserialize<'de> for ScheduledTaskHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let urn = String::deserialize(deserializer)?;
        Self::parse(&urn).map_err(serde::de::Error::custom)
    }
}
