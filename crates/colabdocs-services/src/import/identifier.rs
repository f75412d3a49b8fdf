use colabdocs_core::constants::IDENTIFIER_WIDTH;

/// Hands out sequential, zero-padded collaborator identifiers for one run.
///
/// Numbering continues from the greatest identifier already stored. Two
/// imports running at the same time can read the same starting point; the
/// unique index on `collaborators.identifier` rejects the loser's inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierAllocator {
    next: u64,
}

impl IdentifierAllocator {
    /// Start after `greatest`, ignoring any non-digit characters in it.
    ///
    /// Starts at 1 when there is no stored identifier or it has no digits.
    pub fn from_greatest(greatest: Option<&str>) -> Self {
        let next = greatest
            .map(|id| id.chars().filter(char::is_ascii_digit).collect::<String>())
            .and_then(|digits| digits.parse::<u64>().ok())
            .map(|value| value.saturating_add(1))
            .unwrap_or(1);

        Self { next }
    }

    /// Take the next identifier. Taken numbers are never handed out again.
    pub fn allocate(&mut self) -> String {
        let identifier = format!("{:0width$}", self.next, width = IDENTIFIER_WIDTH);
        self.next = self.next.saturating_add(1);
        identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continues_after_greatest() {
        let mut ids = IdentifierAllocator::from_greatest(Some("00042"));
        assert_eq!(ids.allocate(), "00043");
        assert_eq!(ids.allocate(), "00044");
    }

    #[test]
    fn test_starts_at_one() {
        assert_eq!(IdentifierAllocator::from_greatest(None).allocate(), "00001");
        assert_eq!(
            IdentifierAllocator::from_greatest(Some("sem-numero")).allocate(),
            "00001"
        );
    }

    #[test]
    fn test_strips_non_digits() {
        let mut ids = IdentifierAllocator::from_greatest(Some("COL-0099"));
        assert_eq!(ids.allocate(), "00100");
    }

    #[test]
    fn test_grows_past_padding_width() {
        let mut ids = IdentifierAllocator::from_greatest(Some("99999"));
        assert_eq!(ids.allocate(), "100000");
    }
}
