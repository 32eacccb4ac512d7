//! Serializable payloads
//!
//! Every type that can be handed to a codec describes itself as a [`Payload`].
//! Types that do not override [`Serializable::payload`] are reported as
//! unsupported and each codec renders its placeholder for them.

use std::collections::{BTreeMap, HashMap};

use crate::value::{Mapping, ValueTree};

/// Borrowed view of data to encode
#[derive(Debug, Clone)]
pub enum Payload<'a> {
    /// A bare string
    Text(&'a str),
    /// A single value tree
    Tree(&'a ValueTree),
    /// Key/value entries rendered as a top-level mapping
    Entries(Vec<(&'a str, &'a ValueTree)>),
    /// A list of values
    Items(&'a [ValueTree]),
    /// No codec knows how to render this value
    Unsupported,
}

/// Data that can be passed to a codec
pub trait Serializable {
    fn payload(&self) -> Payload<'_> {
        Payload::Unsupported
    }
}

impl Serializable for str {
    fn payload(&self) -> Payload<'_> {
        Payload::Text(self)
    }
}

impl Serializable for String {
    fn payload(&self) -> Payload<'_> {
        Payload::Text(self)
    }
}

impl Serializable for ValueTree {
    fn payload(&self) -> Payload<'_> {
        Payload::Tree(self)
    }
}

impl Serializable for Mapping {
    fn payload(&self) -> Payload<'_> {
        Payload::Entries(self.iter().collect())
    }
}

impl Serializable for BTreeMap<String, ValueTree> {
    fn payload(&self) -> Payload<'_> {
        Payload::Entries(self.iter().map(|(k, v)| (k.as_str(), v)).collect())
    }
}

impl Serializable for HashMap<String, ValueTree> {
    /// Entries are sorted by key so that output is stable
    fn payload(&self) -> Payload<'_> {
        let mut entries: Vec<_> = self.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Payload::Entries(entries)
    }
}

impl Serializable for [ValueTree] {
    fn payload(&self) -> Payload<'_> {
        Payload::Items(self)
    }
}

impl Serializable for Vec<ValueTree> {
    fn payload(&self) -> Payload<'_> {
        Payload::Items(self)
    }
}

impl<T: Serializable + ?Sized> Serializable for &T {
    fn payload(&self) -> Payload<'_> {
        (**self).payload()
    }
}
