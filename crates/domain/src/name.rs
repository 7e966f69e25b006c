use crate::errors::DomainError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Maximum encoded length of a name, including the terminating root
/// octet (RFC 1035 §2.3.4).
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a single label.
pub const MAX_LABEL_LEN: usize = 63;

/// A domain name as an ordered sequence of labels, stored as received.
///
/// Equality and hashing are ASCII case-insensitive per DNS convention,
/// so `DnsName` can be used directly as a cache key without a separate
/// normalization step.
#[derive(Clone, Eq)]
pub struct DnsName {
    labels: Vec<Box<[u8]>>,
}

impl DnsName {
    /// The root name (zero labels).
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    /// Builds a name from labels already validated by the wire decoder.
    pub(crate) fn from_wire_labels(labels: Vec<Box<[u8]>>) -> Self {
        Self { labels }
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &[u8]> {
        self.labels.iter().map(|l| l.as_ref())
    }

    /// Encoded length on the wire without compression: one length octet
    /// per label plus the terminating root octet.
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }
}

impl FromStr for DnsName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_suffix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut labels = Vec::new();
        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(format!(
                    "empty label in '{}'",
                    s
                )));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label '{}' exceeds {} octets",
                    label, MAX_LABEL_LEN
                )));
            }
            if !label.is_ascii() {
                return Err(DomainError::InvalidDomainName(format!(
                    "non-ASCII label in '{}'",
                    s
                )));
            }
            labels.push(label.as_bytes().to_vec().into_boxed_slice());
        }

        let name = Self { labels };
        if name.wire_len() > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "name '{}' exceeds {} octets",
                s, MAX_NAME_LEN
            )));
        }
        Ok(name)
    }
}

impl PartialEq for DnsName {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Hash for DnsName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.labels.len().hash(state);
        for label in &self.labels {
            for byte in label.iter() {
                byte.to_ascii_lowercase().hash(state);
            }
            // Separator so ("ab", "c") and ("a", "bc") hash differently.
            0xffu8.hash(state);
        }
    }
}

impl fmt::Display for DnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, ".");
        }
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            for &byte in label.iter() {
                if byte.is_ascii_graphic() && byte != b'.' {
                    write!(f, "{}", byte as char)?;
                } else {
                    write!(f, "\\{:03}", byte)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DnsName({})", self)
    }
}
