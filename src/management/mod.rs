mod error;
mod host;

pub use error::RepositoryError;
pub use host::HostRepository;
