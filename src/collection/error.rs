use std::fmt;

/// Which kernel query failed. Kept separate so diagnostics can tell the
/// per-core array query apart from the aggregate one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuerySite {
    /// The per-core tick counter array.
    PerCore,
    /// The host-wide tick counter quadruple.
    Aggregate,
    /// The physical/logical core count probe.
    Topology,
}

impl fmt::Display for QuerySite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySite::PerCore => write!(f, "per-core counter query"),
            QuerySite::Aggregate => write!(f, "aggregate counter query"),
            QuerySite::Topology => write!(f, "core topology query"),
        }
    }
}

/// An error to do with data collection.
#[derive(Debug)]
pub enum CollectionError {
    /// A kernel call returned a failure code.
    KernelQuery { site: QuerySite, code: i32 },

    /// The source returned counters we could not make sense of.
    Malformed(String),

    /// A general error to propagate back up. A wrapper around [`anyhow::Error`].
    General(anyhow::Error),

    /// The collection is unsupported.
    Unsupported,
}

impl CollectionError {
    pub fn kernel(site: QuerySite, code: i32) -> Self {
        Self::KernelQuery { site, code }
    }

    pub fn malformed<S: Into<String>>(reason: S) -> Self {
        Self::Malformed(reason.into())
    }

    /// The query site, if this error came from a kernel call.
    pub fn site(&self) -> Option<QuerySite> {
        match self {
            CollectionError::KernelQuery { site, .. } => Some(*site),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::KernelQuery { site, code } => {
                write!(f, "{site} failed with kernel error code {code}")
            }
            CollectionError::Malformed(reason) => {
                write!(f, "malformed counter data: {reason}")
            }
            CollectionError::General(err) => err.fmt(f),
            CollectionError::Unsupported => {
                write!(
                    f,
                    "cpuload does not support this type of data collection for this platform."
                )
            }
        }
    }
}

impl std::error::Error for CollectionError {}

/// A [`Result`] with the error type being a [`CollectionError`].
pub type CollectionResult<T> = Result<T, CollectionError>;

impl From<std::io::Error> for CollectionError {
    fn from(err: std::io::Error) -> Self {
        CollectionError::General(err.into())
    }
}
