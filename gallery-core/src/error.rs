/// Errors produced by the `gallery-core` crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A pathname was empty.
    #[error("pathname must not be empty")]
    EmptyPathname,

    /// A replacement leaf name was empty.
    #[error("new name must not be empty")]
    EmptyName,
}
