//! Human-readable record identifiers.
//!
//! Every entity type has a fixed prefix and a zero-padded numeric suffix:
//!
//! | Kind         | Prefix | Width | First id (in-memory) |
//! |--------------|--------|-------|----------------------|
//! | Patient      | `PAT`  | 4     | `PAT1001`            |
//! | Doctor       | `DOC`  | 3     | `DOC001`             |
//! | Lab test     | `TEST` | 4     | `TEST0001`           |
//! | Prescription | `PRES` | 4     | `PRES0001`           |
//!
//! The in-memory store draws numbers from an [`IdGenerator`]. The SQLite
//! store formats the surrogate row id with [`format_id`], so both stores
//! produce ids of the same shape.

use serde::{Deserialize, Serialize};

/// Entity types that receive generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Patient,
    Doctor,
    LabTest,
    Prescription,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Patient,
        EntityKind::Doctor,
        EntityKind::LabTest,
        EntityKind::Prescription,
    ];

    /// Literal prefix of the identifier.
    pub fn prefix(self) -> &'static str {
        match self {
            EntityKind::Patient => "PAT",
            EntityKind::Doctor => "DOC",
            EntityKind::LabTest => "TEST",
            EntityKind::Prescription => "PRES",
        }
    }

    /// Zero-padding width of the numeric suffix.
    pub fn width(self) -> usize {
        match self {
            EntityKind::Doctor => 3,
            EntityKind::Patient | EntityKind::LabTest | EntityKind::Prescription => 4,
        }
    }

    /// First counter value handed out by [`IdGenerator`].
    pub fn initial(self) -> u32 {
        match self {
            EntityKind::Patient => 1001,
            EntityKind::Doctor | EntityKind::LabTest | EntityKind::Prescription => 1,
        }
    }

    fn index(self) -> usize {
        match self {
            EntityKind::Patient => 0,
            EntityKind::Doctor => 1,
            EntityKind::LabTest => 2,
            EntityKind::Prescription => 3,
        }
    }
}

/// Format a numeric sequence value as an identifier of the given kind.
///
/// Values wider than the padding are printed in full (`PAT12345`).
pub fn format_id(kind: EntityKind, n: u64) -> String {
    format!("{}{:0width$}", kind.prefix(), n, width = kind.width())
}

/// Parse the numeric suffix back out of an identifier.
///
/// Returns `None` when the prefix does not match or the suffix is not a number.
pub fn parse_id(kind: EntityKind, id: &str) -> Option<u64> {
    let digits = id.strip_prefix(kind.prefix())?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// One monotonically increasing counter per entity kind.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    counters: [u32; 4],
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            counters: EntityKind::ALL.map(EntityKind::initial),
        }
    }

    /// Hand out the next identifier for `kind`. Identifiers are never reused.
    pub fn next_id(&mut self, kind: EntityKind) -> String {
        let slot = &mut self.counters[kind.index()];
        let n = *slot;
        *slot += 1;
        format_id(kind, n.into())
    }

    /// The value the next call to [`next_id`](Self::next_id) will use.
    pub fn peek(&self, kind: EntityKind) -> u32 {
        self.counters[kind.index()]
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_ids() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id(EntityKind::Patient), "PAT1001");
        assert_eq!(ids.next_id(EntityKind::Doctor), "DOC001");
        assert_eq!(ids.next_id(EntityKind::LabTest), "TEST0001");
        assert_eq!(ids.next_id(EntityKind::Prescription), "PRES0001");
    }

    #[test]
    fn test_counters_are_independent() {
        let mut ids = IdGenerator::new();
        ids.next_id(EntityKind::LabTest);
        ids.next_id(EntityKind::LabTest);
        assert_eq!(ids.next_id(EntityKind::Prescription), "PRES0001");
        assert_eq!(ids.next_id(EntityKind::LabTest), "TEST0003");
        assert_eq!(ids.peek(EntityKind::Patient), 1001);
    }

    #[test]
    fn test_format_wider_than_padding() {
        assert_eq!(format_id(EntityKind::Patient, 12345), "PAT12345");
        assert_eq!(format_id(EntityKind::Doctor, 7), "DOC007");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(EntityKind::Patient, "PAT0042"), Some(42));
        assert_eq!(parse_id(EntityKind::Patient, "DOC0042"), None);
        assert_eq!(parse_id(EntityKind::LabTest, "TEST"), None);
        assert_eq!(parse_id(EntityKind::LabTest, "TEST00a1"), None);
    }

    proptest! {
        #[test]
        fn prop_patient_ids_distinct_and_well_formed(n in 1usize..300) {
            let mut ids = IdGenerator::new();
            let generated: Vec<String> =
                (0..n).map(|_| ids.next_id(EntityKind::Patient)).collect();

            let unique: std::collections::HashSet<_> = generated.iter().collect();
            prop_assert_eq!(unique.len(), n);

            for id in &generated {
                prop_assert!(id.starts_with("PAT"));
                let suffix = &id[3..];
                prop_assert!(suffix.len() >= 4);
                prop_assert!(suffix.bytes().all(|b| b.is_ascii_digit()));
            }
        }
    }
}
