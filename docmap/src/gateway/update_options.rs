/// Options for an identity-keyed update.
///
/// With `force_full_replace` the gateway replaces the stored document with
/// the one sent (keeping its identity); without it only the keys sent are
/// written and every other stored key is left alone.
///
/// # Examples
///
/// ```rust
/// use docmap::gateway::UpdateOptions;
///
/// assert!(UpdateOptions::full_replace().is_force_full_replace());
/// assert!(!UpdateOptions::default().is_force_full_replace());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    force_full_replace: bool,
}

impl UpdateOptions {
    pub fn new(force_full_replace: bool) -> Self {
        Self { force_full_replace }
    }

    /// Options that replace the whole stored document.
    pub fn full_replace() -> Self {
        UpdateOptions::new(true)
    }

    /// Options that write only the keys sent.
    pub fn partial() -> Self {
        UpdateOptions::new(false)
    }

    pub fn is_force_full_replace(&self) -> bool {
        self.force_full_replace
    }
}
