use std::net::SocketAddr;
use std::path::PathBuf;

/// Fatal failure while building the contact store at startup.
///
/// Row-level problems (missing columns, short phone numbers) are never
/// reported here; only a source that cannot be opened or read aborts.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open contact source {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read contact source {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    /// 1-based line of the source where reading failed, when known.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Open { .. } => None,
            Self::Read { source, .. } => source.position().map(|p| p.line()),
        }
    }
}

/// Failure bringing the server up or while it runs.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("contact load task failed: {0}")]
    LoadTask(#[from] tokio::task::JoinError),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl ServerError {
    /// Source line of a load failure, when known.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Load(e) => e.line(),
            _ => None,
        }
    }
}
