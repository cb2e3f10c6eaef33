use std::collections::HashSet;

/// Names that commonly show up from scanners and shared accounts.
pub const DEFAULT_BLOCKED_USERNAMES: &[&str] = &[
    "anonymous", "root", "toor", "admin", "user", "guest", "test", "demo", "ubuntu", "debian",
    "centos", "fedora", "oracle", "pi", "vagrant", "default", "1234", "ftp",
];

/// Decides whether a connection may play at all. Blocked identities are
/// refused before any session or statistics lookup.
pub trait AccessPolicy: Send + Sync {
    fn is_blocked(&self, display_name: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct Blocklist {
    names: HashSet<String>,
}

impl Blocklist {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        Self { names }
    }

    /// The default list plus any extra names.
    pub fn with_defaults<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blocklist = Self::from_names(DEFAULT_BLOCKED_USERNAMES);
        blocklist.names.extend(
            extra
                .into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .filter(|name| !name.is_empty()),
        );
        blocklist
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::from_names(DEFAULT_BLOCKED_USERNAMES)
    }
}

impl AccessPolicy for Blocklist {
    fn is_blocked(&self, display_name: &str) -> bool {
        self.names.contains(display_name)
    }
}
