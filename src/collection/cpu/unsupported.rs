//! Fallback for platforms without a tick counter source.

use super::{CoreTopology, CounterSource, TickCounters};
use crate::collection::error::{CollectionError, CollectionResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSource;

impl UnsupportedSource {
    pub fn new() -> Self {
        Self
    }
}

impl CounterSource for UnsupportedSource {
    type Buffer = Vec<TickCounters>;

    fn per_core(&self) -> CollectionResult<Vec<TickCounters>> {
        Err(CollectionError::Unsupported)
    }

    fn aggregate(&self) -> CollectionResult<TickCounters> {
        Err(CollectionError::Unsupported)
    }

    fn topology(&self) -> CollectionResult<CoreTopology> {
        Err(CollectionError::Unsupported)
    }
}
