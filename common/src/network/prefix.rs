//! # Subnet Prefix Model
//!
//! A scan always covers one IPv4 `/24`, identified by its first three octets (`192.168.1`).
//!
//! The prefix is validated once, when parsed, and is immutable afterwards. Everything
//! downstream takes a [`SubnetPrefix`] rather than a string, so an out-of-range octet can
//! never reach the point where addresses are built.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

/// First host octet probed in a `/24` (`.0` is the network address).
pub const FIRST_HOST: u8 = 1;
/// Last host octet probed in a `/24` (`.255` is the broadcast address).
pub const LAST_HOST: u8 = 254;
/// Number of candidates one prefix expands into.
pub const HOSTS_PER_PREFIX: usize = (LAST_HOST - FIRST_HOST + 1) as usize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefixError {
    #[error("prefix is empty")]
    Empty,
    #[error("expected 3 octets separated by '.', found {found}")]
    OctetCount { found: usize },
    #[error("octet {position} is empty")]
    EmptyOctet { position: usize },
    #[error("octet {position} ('{value}') is not a decimal number")]
    NotDecimal { position: usize, value: String },
    #[error("octet {position} ('{value}') is out of range 0-255")]
    OutOfRange { position: usize, value: String },
}

/// The first three octets of an IPv4 `/24` network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubnetPrefix {
    octets: [u8; 3],
}

impl SubnetPrefix {
    pub const fn new(a: u8, b: u8, c: u8) -> Self {
        Self { octets: [a, b, c] }
    }

    /// Builds the full address for `host` inside this network.
    pub fn host(&self, host: u8) -> Ipv4Addr {
        let [a, b, c] = self.octets;
        Ipv4Addr::new(a, b, c, host)
    }

    /// Every address probed by a scan, `.1` through `.254`, ascending.
    pub fn candidates(self) -> impl Iterator<Item = Ipv4Addr> {
        (FIRST_HOST..=LAST_HOST).map(move |host| self.host(host))
    }

    /// `A.B.C.0/24`
    pub fn cidr(&self) -> String {
        format!("{}/24", self.host(0))
    }

    /// `A_B_C`, safe for use in a file name.
    pub fn file_stem(&self) -> String {
        let [a, b, c] = self.octets;
        format!("{a}_{b}_{c}")
    }
}

impl From<Ipv4Addr> for SubnetPrefix {
    fn from(addr: Ipv4Addr) -> Self {
        let [a, b, c, _] = addr.octets();
        Self::new(a, b, c)
    }
}

impl fmt::Display for SubnetPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.octets;
        write!(f, "{a}.{b}.{c}")
    }
}

impl FromStr for SubnetPrefix {
    type Err = PrefixError;

    /// Parses `A.B.C` where each part is a decimal octet (`0`-`255`).
    ///
    /// Surrounding whitespace is ignored. Signs, blanks inside the value, a fourth
    /// octet or a trailing dot are all rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PrefixError::Empty);
        }

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 3 {
            return Err(PrefixError::OctetCount { found: parts.len() });
        }

        let mut octets = [0u8; 3];
        for (idx, (slot, part)) in octets.iter_mut().zip(&parts).enumerate() {
            *slot = parse_octet(part, idx + 1)?;
        }

        Ok(Self { octets })
    }
}

fn parse_octet(part: &str, position: usize) -> Result<u8, PrefixError> {
    if part.is_empty() {
        return Err(PrefixError::EmptyOctet { position });
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PrefixError::NotDecimal {
            position,
            value: part.to_string(),
        });
    }

    let out_of_range = || PrefixError::OutOfRange {
        position,
        value: part.to_string(),
    };
    if part.len() > 3 {
        return Err(out_of_range());
    }
    part.parse::<u8>().map_err(|_| out_of_range())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
