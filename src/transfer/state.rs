//! Transfer attempt states
//!
//! Success path: STARTED → DEBITED → CREDITED → RECORDED → COMMITTED.
//! Any non-terminal state may move to ABORTED, which guarantees that no
//! effect of the attempt is visible.

use std::fmt;

use super::error::TransferError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferState {
    /// Unit of work opened, participants not yet touched
    Started,
    /// Sender balance decreased (uncommitted)
    Debited,
    /// Receiver balance increased (uncommitted)
    Credited,
    /// Ledger row inserted (uncommitted)
    Recorded,
    /// Terminal: unit of work committed
    Committed,
    /// Terminal: unit of work discarded
    Aborted,
}

impl TransferState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferState::Committed | TransferState::Aborted)
    }

    pub fn can_transition_to(&self, next: TransferState) -> bool {
        use TransferState::*;
        match (self, next) {
            (Started, Debited) | (Debited, Credited) | (Credited, Recorded) => true,
            (Recorded, Committed) => true,
            (from, Aborted) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Move to `next`, rejecting transitions outside the state machine
    pub fn transition(self, next: TransferState) -> Result<TransferState, TransferError> {
        if self.can_transition_to(next) {
            tracing::debug!(from = %self, to = %next, "transfer state transition");
            Ok(next)
        } else {
            Err(TransferError::Internal(format!(
                "invalid state transition {} -> {}",
                self, next
            )))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Started => "STARTED",
            TransferState::Debited => "DEBITED",
            TransferState::Credited => "CREDITED",
            TransferState::Recorded => "RECORDED",
            TransferState::Committed => "COMMITTED",
            TransferState::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(TransferState::Committed.is_terminal());
        assert!(TransferState::Aborted.is_terminal());

        assert!(!TransferState::Started.is_terminal());
        assert!(!TransferState::Debited.is_terminal());
        assert!(!TransferState::Credited.is_terminal());
        assert!(!TransferState::Recorded.is_terminal());
    }

    #[test]
    fn test_happy_path() {
        let state = TransferState::Started
            .transition(TransferState::Debited)
            .and_then(|s| s.transition(TransferState::Credited))
            .and_then(|s| s.transition(TransferState::Recorded))
            .and_then(|s| s.transition(TransferState::Committed))
            .unwrap();
        assert_eq!(state, TransferState::Committed);
    }

    #[test]
    fn test_abort_from_any_non_terminal_state() {
        for state in [
            TransferState::Started,
            TransferState::Debited,
            TransferState::Credited,
            TransferState::Recorded,
        ] {
            assert!(state.can_transition_to(TransferState::Aborted), "{}", state);
        }
        assert!(!TransferState::Committed.can_transition_to(TransferState::Aborted));
        assert!(!TransferState::Aborted.can_transition_to(TransferState::Aborted));
    }

    #[test]
    fn test_steps_cannot_be_skipped() {
        assert!(!TransferState::Started.can_transition_to(TransferState::Credited));
        assert!(!TransferState::Debited.can_transition_to(TransferState::Recorded));
        assert!(!TransferState::Credited.can_transition_to(TransferState::Committed));
        assert!(TransferState::Started
            .transition(TransferState::Committed)
            .is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(TransferState::Recorded.to_string(), "RECORDED");
    }
}
