use thiserror::Error;

/// An error enum for return from package methods that may fail
#[derive(Error, Debug)]
pub enum PackageError {
    /// Cannot convert a path to unicode
    #[error("String conversion Error")]
    StringConversion,
    /// Requesting a payload path that doesn't exist
    #[error("Payload path does not exist: {0}")]
    Enoent(String),
    /// The package description has no version field
    #[error("Package description has no version")]
    NoVersion,
    /// The version field is not a number
    #[error("Package description version is not a number")]
    VersionType,
    /// Trying to load a package description written with a different format version
    #[error("Version Mismatch (expected {expected:?}, got {found:?})")]
    VersionMismatch { expected: u32, found: u32 },
}
