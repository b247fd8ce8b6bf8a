mod directory;
mod http;
mod snapshot;

pub use directory::*;
pub use http::*;
pub use snapshot::*;
