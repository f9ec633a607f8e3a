use std::fmt;

/// Synchronous read of one operation's outcome.
///
/// The host sees `Option<Snapshot>`: `None` until the first accepted trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot<T, E> {
    Pending,
    Resolved(T),
    Rejected(E),
}

/// Payload-free discriminant of a [`Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pending,
    Resolved,
    Rejected,
}

impl<T, E> Snapshot<T, E> {
    pub fn from_outcome(outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(value) => Snapshot::Resolved(value),
            Err(error) => Snapshot::Rejected(error),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Snapshot::Pending => Status::Pending,
            Snapshot::Resolved(_) => Status::Resolved,
            Snapshot::Rejected(_) => Status::Rejected,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Snapshot::Pending)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Snapshot::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Snapshot::Rejected(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::Resolved => write!(f, "resolved"),
            Status::Rejected => write!(f, "rejected"),
        }
    }
}
