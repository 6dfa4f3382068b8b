// Domain models

mod entry;
mod record;
mod snapshot;

pub use entry::{NetworkFacts, NetworkMode, RunState, ServiceEntry, ServiceKind};
pub use record::{ContainerRecord, LogLine, MetadataInventory, RuntimeRecord, VmRecord};
pub use snapshot::{HostMetrics, Snapshot, SourceHealth};
