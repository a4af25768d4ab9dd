//! Observed transport security of an inbound request.

/// Whether a request reached the server over a secure channel.
///
/// TLS termination happens elsewhere; the HTTP layer only reports what it
/// observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// HTTPS, directly or via a trusted proxy.
    Secure,
    /// Plain HTTP.
    Insecure,
}

impl Transport {
    /// Returns `true` for [`Transport::Secure`].
    #[must_use]
    pub fn is_secure(self) -> bool {
        matches!(self, Self::Secure)
    }
}

impl From<bool> for Transport {
    fn from(secure: bool) -> Self {
        if secure { Self::Secure } else { Self::Insecure }
    }
}
