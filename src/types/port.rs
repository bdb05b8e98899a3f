//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortRange` models explicit start/end bounds and `PortSet` is the ordered,
//! deduplicated set of ports a scan actually probes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(i64::from(value)))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(i64),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// An explicit, user-supplied range of ports (inclusive).
///
/// Unlike range tokens inside a port spec, explicit bounds are never clamped:
/// an inverted or out-of-domain range is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start > end {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Build a range from raw integer bounds as typed by a user.
    pub fn from_bounds(start: i64, end: i64) -> Result<Self, PortError> {
        let start = checked_port(start)?;
        let end = checked_port(end)?;
        Self::new(start, end)
    }

    pub const fn start(&self) -> Port {
        self.start
    }

    pub const fn end(&self) -> Port {
        self.end
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// A valid range always has at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }

    /// Expand into a port set.
    pub fn to_port_set(&self) -> PortSet {
        self.iter().collect()
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

fn checked_port(value: i64) -> Result<Port, PortError> {
    u16::try_from(value)
        .ok()
        .and_then(Port::new)
        .ok_or(PortError::OutOfRange(value))
}

/// The ordered, deduplicated set of ports probed by one scan.
///
/// Always ascending with no duplicates; immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortSet {
    ports: Vec<Port>,
}

impl PortSet {
    /// Create an empty port set.
    pub const fn new() -> Self {
        Self { ports: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    pub fn as_slice(&self) -> &[Port] {
        &self.ports
    }

    /// Lowest port in the set.
    pub fn first(&self) -> Option<Port> {
        self.ports.first().copied()
    }

    /// Highest port in the set.
    pub fn last(&self) -> Option<Port> {
        self.ports.last().copied()
    }

    pub fn contains(&self, port: Port) -> bool {
        self.ports.binary_search(&port).is_ok()
    }

    /// Raw port numbers, ascending.
    pub fn to_u16_vec(&self) -> Vec<u16> {
        self.ports.iter().map(|p| p.as_u16()).collect()
    }
}

impl FromIterator<Port> for PortSet {
    fn from_iter<I: IntoIterator<Item = Port>>(iter: I) -> Self {
        let mut ports: Vec<Port> = iter.into_iter().collect();
        ports.sort_unstable();
        ports.dedup();
        Self { ports }
    }
}

impl<'a> IntoIterator for &'a PortSet {
    type Item = Port;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Port>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ports.iter().copied()
    }
}

/// Parse a port specification into a port set.
///
/// Supports formats like:
/// - Single port: "80"
/// - Comma-separated: "80,443,8080"
/// - Range: "1-1000"
/// - Mixed: "22,80,443,8000-9000"
///
/// Range tokens are clamped into 1-65535. Malformed tokens are skipped, so
/// this never fails; an empty set is the caller's usage error to report.
pub fn parse_port_spec(spec: &str) -> PortSet {
    spec.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .flat_map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> Vec<Port> {
    if let Some((start, end)) = token.split_once('-') {
        let (Some(start), Some(end)) = (parse_bound(start), parse_bound(end)) else {
            return Vec::new();
        };
        let start = start.max(i64::from(Port::MIN));
        let end = end.min(i64::from(Port::MAX));
        // Clamped bounds lie in 1..=65535 whenever the range is non-empty.
        (start..=end).filter_map(|p| checked_port(p).ok()).collect()
    } else {
        token
            .parse::<i64>()
            .ok()
            .and_then(|p| checked_port(p).ok())
            .into_iter()
            .collect()
    }
}

/// Parse one half of a range token. Integers too large for `i64` saturate,
/// so they still clamp to the edge of the port domain.
fn parse_bound(half: &str) -> Option<i64> {
    match half.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

impl FromStr for PortSet {
    type Err = PortError;

    /// Strict variant of [`parse_port_spec`]: an empty result is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let set = parse_port_spec(s);
        if set.is_empty() {
            return Err(PortError::Empty);
        }
        Ok(set)
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => write!(f, "{}-{}", first, last),
            _ => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(set: &PortSet) -> Vec<u16> {
        set.to_u16_vec()
    }

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());
    }

    #[test]
    fn test_parse_mixed_with_duplicates() {
        let set = parse_port_spec("22,80,1000-1002,80");
        assert_eq!(nums(&set), vec![22, 80, 1000, 1001, 1002]);
    }

    #[test]
    fn test_parse_is_order_independent() {
        assert_eq!(nums(&parse_port_spec("443,80")), vec![80, 443]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let spec = "8080, 22 ,1-3,,22";
        assert_eq!(parse_port_spec(spec), parse_port_spec(spec));
        assert_eq!(nums(&parse_port_spec(spec)), vec![1, 2, 3, 22, 8080]);
    }

    #[test]
    fn test_range_clamped_away() {
        assert!(parse_port_spec("70000-70005").is_empty());
    }

    #[test]
    fn test_range_clamped_into_domain() {
        assert_eq!(nums(&parse_port_spec("0-3")), vec![1, 2, 3]);
        assert_eq!(nums(&parse_port_spec("65534-70000")), vec![65534, 65535]);
    }

    #[test]
    fn test_huge_range_bounds_saturate() {
        assert_eq!(parse_port_spec("1-99999999999999999999").len(), 65535);
        assert_eq!(
            parse_port_spec("1-99999999999999999999,80000-99999999999999999999999").len(),
            65535
        );
        assert_eq!(
            nums(&parse_port_spec("65533-+99999999999999999999")),
            vec![65533, 65534, 65535]
        );
        assert!(parse_port_spec("99999999999999999999-99999999999999999999").is_empty());
    }

    #[test]
    fn test_inverted_range_contributes_nothing() {
        assert_eq!(nums(&parse_port_spec("100-50,7")), vec![7]);
    }

    #[test]
    fn test_malformed_tokens_are_skipped() {
        assert_eq!(nums(&parse_port_spec("abc,80")), vec![80]);
        assert_eq!(nums(&parse_port_spec("-5-10,22")), vec![22]);
        assert_eq!(nums(&parse_port_spec("1-x,0,65536,443")), vec![443]);
        assert!(parse_port_spec("").is_empty());
    }

    #[test]
    fn test_strict_parse_rejects_empty() {
        assert_eq!("abc".parse::<PortSet>(), Err(PortError::Empty));
        assert_eq!("22".parse::<PortSet>().map(|s| s.len()), Ok(1));
    }

    #[test]
    fn test_explicit_range_rejects_inverted_bounds() {
        assert_eq!(
            PortRange::from_bounds(1024, 1),
            Err(PortError::InvalidRange(1024, 1))
        );
        assert_eq!(PortRange::from_bounds(0, 10), Err(PortError::OutOfRange(0)));
        assert_eq!(PortRange::from_bounds(1, 1024).map(|r| r.len()), Ok(1024));
    }

    #[test]
    fn test_port_set_accessors() {
        let set = parse_port_spec("22,80,443");
        assert_eq!(set.first(), Port::new(22));
        assert_eq!(set.last(), Port::new(443));
        assert!(set.contains(Port::new(80).unwrap()));
        assert!(!set.contains(Port::new(81).unwrap()));
        assert_eq!(set.to_string(), "22-443");
    }
}
