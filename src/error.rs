use std::fmt;

/// Errors surfaced to callers of the JPI decoder.
///
/// Per-record anomalies (flag mismatch, truncation, checksum drift) are not
/// represented here — they degrade the record stream locally instead of
/// propagating (see module docs on [`crate::decoder`]).
#[derive(Debug)]
pub enum JpiError {
    /// The `$U` anchor was missing, a metadata record was truncated, or an
    /// unrecognized tag appeared before `$E`/`$L`.
    MalformedMetadata(String),
    /// The requested flight id is absent from the directory, or present but
    /// unresolved by the recovery probe.
    FlightNotFound(u16),
    /// The device model in a `$C` record has no known sensor mapping.
    UnknownModel(u32),
    /// I/O errors reading the input file.
    Io(std::io::Error),
    /// The metadata block was not valid UTF-8.
    Utf8(std::str::Utf8Error),
    /// CSV/file export failure.
    Export(String),
}

impl fmt::Display for JpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JpiError::MalformedMetadata(msg) => write!(f, "malformed metadata: {msg}"),
            JpiError::FlightNotFound(id) => write!(f, "flight {id} not found"),
            JpiError::UnknownModel(model) => write!(f, "no sensor mapping for model {model}"),
            JpiError::Io(err) => write!(f, "I/O error: {err}"),
            JpiError::Utf8(err) => write!(f, "UTF-8 error: {err}"),
            JpiError::Export(msg) => write!(f, "export error: {msg}"),
        }
    }
}

impl std::error::Error for JpiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JpiError::Io(err) => Some(err),
            JpiError::Utf8(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for JpiError {
    fn from(err: std::io::Error) -> Self {
        JpiError::Io(err)
    }
}

impl From<std::str::Utf8Error> for JpiError {
    fn from(err: std::str::Utf8Error) -> Self {
        JpiError::Utf8(err)
    }
}

impl From<anyhow::Error> for JpiError {
    fn from(err: anyhow::Error) -> Self {
        JpiError::MalformedMetadata(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JpiError>;
