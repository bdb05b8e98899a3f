//! Core type definitions using newtype patterns for type safety.
//!
//! These types keep invalid ports and empty targets unrepresentable once
//! they have been constructed.

mod port;
mod scan_id;
mod target;

pub use port::{parse_port_spec, Port, PortError, PortRange, PortSet};
pub use scan_id::{ScanId, ScanIdError};
pub use target::{
    is_valid_host, is_valid_host_system, DnsResolver, HostResolver, ResolveError, ResolverKind,
    SystemResolver, Target, TargetError,
};
