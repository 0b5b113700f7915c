//! Link descriptions and topology-file link keys.

use crate::{ConnectPoint, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of link being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Direct point-to-point link between two switch ports.
    #[default]
    Direct,
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Direct => write!(f, "direct"),
        }
    }
}

/// One direction of a link, as passed to `link_detected`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkDescription {
    pub src: ConnectPoint,
    pub dst: ConnectPoint,
    pub link_type: LinkType,
}

impl LinkDescription {
    /// Creates a direct link description.
    pub fn direct(src: ConnectPoint, dst: ConnectPoint) -> Self {
        Self {
            src,
            dst,
            link_type: LinkType::Direct,
        }
    }

    /// Returns the same link in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            src: self.dst.clone(),
            dst: self.src.clone(),
            link_type: self.link_type,
        }
    }
}

impl fmt::Display for LinkDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.src, self.dst, self.link_type)
    }
}

/// Link key used in the `links` section of a topology file: `"A-B"`.
///
/// Exactly one `-` separator is accepted and the two ends must differ;
/// anything else is rejected with [`ParseError::InvalidLinkKey`].
///
/// # Examples
///
/// ```
/// use synthtopo_types::LinkKey;
///
/// let key: LinkKey = "testprovider:a1/1-testprovider:a2/1".parse().unwrap();
/// assert_eq!(key.src.to_string(), "testprovider:a1/1");
/// assert_eq!(key.dst.to_string(), "testprovider:a2/1");
///
/// assert!("a1/1".parse::<LinkKey>().is_err());
/// assert!("a1/1-a2/1-a3/1".parse::<LinkKey>().is_err());
/// assert!("a1/1-a1/1".parse::<LinkKey>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkKey {
    pub src: ConnectPoint,
    pub dst: ConnectPoint,
}

impl LinkKey {
    /// Consumes the key, returning `(src, dst)`.
    pub fn into_pair(self) -> (ConnectPoint, ConnectPoint) {
        (self.src, self.dst)
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.src, self.dst)
    }
}

impl FromStr for LinkKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidLinkKey(s.to_string());

        let mut parts = s.split('-');
        let (Some(src), Some(dst), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let src: ConnectPoint = src.parse().map_err(|_| invalid())?;
        let dst: ConnectPoint = dst.parse().map_err(|_| invalid())?;
        if src == dst {
            return Err(invalid());
        }

        Ok(LinkKey { src, dst })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_link_key_parse() {
        let key: LinkKey = "a1/1-a2/1".parse().unwrap();
        let (src, dst) = key.into_pair();
        assert_eq!(src, "a1/1".parse().unwrap());
        assert_eq!(dst, "a2/1".parse().unwrap());
    }

    #[test]
    fn test_link_key_separator_count() {
        for bad in ["a1/1", "a1/1-", "-a2/1", "a1/1--a2/1", "a1/1-a2/1-a3/1"] {
            assert_eq!(
                bad.parse::<LinkKey>().unwrap_err(),
                ParseError::InvalidLinkKey(bad.to_string()),
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn test_link_key_rejects_self_loop() {
        assert_eq!(
            "testprovider:a1/1-testprovider:a1/1"
                .parse::<LinkKey>()
                .unwrap_err(),
            ParseError::InvalidLinkKey("testprovider:a1/1-testprovider:a1/1".to_string())
        );
        // Same device, different ports is a valid loopback cable.
        assert!("testprovider:a1/1-testprovider:a1/2".parse::<LinkKey>().is_ok());
    }

    #[test]
    fn test_link_key_bad_endpoint() {
        assert!("a1-a2/1".parse::<LinkKey>().is_err());
        assert!("a1/x-a2/1".parse::<LinkKey>().is_err());
    }

    #[test]
    fn test_link_description_reversed() {
        let link = LinkDescription::direct("a1/1".parse().unwrap(), "a2/2".parse().unwrap());
        let back = link.reversed();

        assert_eq!(back.src, link.dst);
        assert_eq!(back.dst, link.src);
        assert_eq!(back.link_type, LinkType::Direct);
        assert_eq!(link.to_string(), "a1/1 -> a2/2 (direct)");
    }
}
