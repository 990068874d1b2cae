//! HTTP method as a typed enum.
//!
//! Covers the RFC 9110 standard methods. Any other token on the wire becomes
//! [`Method::Extension`]: no route is registered for it, so the router answers
//! it like any unmatched method (405 on a known path, 404 elsewhere).

use std::fmt;
use std::str::FromStr;

/// A known HTTP method.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
    /// Any method token not listed above (`PURGE`, `PROPFIND`, ...).
    Extension,
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect   => "CONNECT",
            Self::Delete    => "DELETE",
            Self::Get       => "GET",
            Self::Head      => "HEAD",
            Self::Options   => "OPTIONS",
            Self::Patch     => "PATCH",
            Self::Post      => "POST",
            Self::Put       => "PUT",
            Self::Trace     => "TRACE",
            Self::Extension => "EXTENSION",
        }
    }
}

/// Parses an uppercase method string (e.g. `"GET"`). Case-sensitive per RFC 9110 §9.1.
/// Only the standard methods parse; callers map the rest to [`Method::Extension`].
impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECT" => Ok(Self::Connect),
            "DELETE"  => Ok(Self::Delete),
            "GET"     => Ok(Self::Get),
            "HEAD"    => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "PATCH"   => Ok(Self::Patch),
            "POST"    => Ok(Self::Post),
            "PUT"     => Ok(Self::Put),
            "TRACE"   => Ok(Self::Trace),
            _         => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
