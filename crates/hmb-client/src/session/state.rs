/// Connectivity of a session.
///
/// `Open` exists only between a successful open and the next failure, EOF,
/// timeout, format change, or explicit close.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Closed,
    Open {
        sid: String,
        /// Empty, or `/queue/seq` of the last positioned message received.
        offset: String,
    },
}

impl SessionState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn sid(&self) -> Option<&str> {
        match self {
            Self::Open { sid, .. } => Some(sid),
            Self::Closed => None,
        }
    }

    /// Offset suffix for the next recv URL; empty when closed.
    pub fn offset(&self) -> &str {
        match self {
            Self::Open { offset, .. } => offset,
            Self::Closed => "",
        }
    }

    pub(crate) fn open(&mut self, sid: String) {
        *self = Self::Open {
            sid,
            offset: String::new(),
        };
    }

    /// Close the session, returning the id it had.
    pub(crate) fn close(&mut self) -> Option<String> {
        match std::mem::take(self) {
            Self::Open { sid, .. } => Some(sid),
            Self::Closed => None,
        }
    }

    pub(crate) fn set_offset(&mut self, queue: &str, seq: i64) {
        if let Self::Open { offset, .. } = self {
            *offset = format!("/{queue}/{seq}");
        }
    }
}
