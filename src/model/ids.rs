// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// A host-assigned identifier carried on the wire.
///
/// The bridge never mints these; it only validates that a value can be embedded in the line
/// protocol. An id must be non-empty and must not contain `#` (the stable-name separator), `,`
/// (the list separator) or whitespace (the argument separator).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id_segment(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Deterministic uuid-shaped id for hosts that mint ids from a counter.
    pub fn sequential(n: u64) -> Self {
        let value = format!("00000000-0000-4000-8000-{n:012x}");
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsSeparator(char),
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsSeparator(c) => write!(f, "id must not contain {c:?}"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id_segment(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if let Some(c) = value.chars().find(|c| matches!(c, '#' | ',') || c.is_whitespace()) {
        return Err(IdError::ContainsSeparator(c));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PersistentIdTag {}
/// Session-stable identifier the host assigns to every object. Survives renames and
/// reparenting, not deletion.
pub type PersistentId = Id<PersistentIdTag>;

/// Live, process-local reference to a host node.
///
/// Handles are only meaningful while the node exists; they are never sent to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Id, IdError, PersistentId};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_protocol_separators() {
        assert_eq!(
            PersistentId::new("a#b"),
            Err(IdError::ContainsSeparator('#'))
        );
        assert_eq!(
            PersistentId::new("a,b"),
            Err(IdError::ContainsSeparator(','))
        );
        assert_eq!(
            PersistentId::new("a b"),
            Err(IdError::ContainsSeparator(' '))
        );
    }

    #[test]
    fn id_accepts_uuid_form() {
        let id = PersistentId::new("5c3f0a2e-0000-4000-8000-00000000002a").expect("id");
        assert_eq!(id.as_str(), "5c3f0a2e-0000-4000-8000-00000000002a");
    }

    #[test]
    fn sequential_ids_are_valid_and_distinct() {
        let a = PersistentId::sequential(1);
        let b = PersistentId::sequential(2);
        assert_ne!(a, b);
        assert_eq!(PersistentId::new(a.as_str()), Ok(a));
    }
}
