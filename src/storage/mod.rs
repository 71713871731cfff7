mod snapshot;

pub use snapshot::*;
