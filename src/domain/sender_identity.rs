use std::fmt;

/// Platform user handle of a message sender.
///
/// Senders without a public handle are represented by an empty identity,
/// which never passes the access gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SenderIdentity(String);

impl SenderIdentity {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn anonymous() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SenderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<anonymous>")
        } else {
            f.write_str(&self.0)
        }
    }
}
