use std::collections::HashSet;

use crate::domain::SenderIdentity;

/// Static allow-list of sender handles, fixed at startup.
#[derive(Debug, Clone)]
pub struct AccessGate {
    enabled: bool,
    allowed: HashSet<String>,
}

impl AccessGate {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            allowed: allowed
                .into_iter()
                .map(Into::into)
                .filter(|handle: &String| !handle.is_empty())
                .collect(),
        }
    }

    /// A gate that lets every sender through.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            allowed: HashSet::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Exact, case-sensitive membership check.
    pub fn is_authorized(&self, identity: &SenderIdentity) -> bool {
        if !self.enabled {
            return true;
        }
        !identity.is_empty() && self.allowed.contains(identity.as_str())
    }
}
