//! Built-in venues.

mod gasthaus_margareten;
mod waldviertlerhof;

use std::sync::Arc;

use lunchvote_core::{ConfigError, VenueDescriptor};

use crate::strategy::VenueStrategy;

pub use gasthaus_margareten::GasthausMargareten;
pub use waldviertlerhof::Waldviertlerhof;

/// Builds a venue from a (possibly overridden) descriptor.
pub(crate) type VenueFactory = fn(VenueDescriptor) -> Result<Arc<dyn VenueStrategy>, ConfigError>;

/// Default descriptor and constructor of every built-in venue.
pub(crate) fn builtin() -> Vec<(VenueDescriptor, VenueFactory)> {
    vec![
        (
            Waldviertlerhof::default_descriptor(),
            build_waldviertlerhof as VenueFactory,
        ),
        (
            GasthausMargareten::default_descriptor(),
            build_gasthaus_margareten as VenueFactory,
        ),
    ]
}

fn build_waldviertlerhof(
    descriptor: VenueDescriptor,
) -> Result<Arc<dyn VenueStrategy>, ConfigError> {
    Ok(Arc::new(Waldviertlerhof::from_descriptor(descriptor)?))
}

fn build_gasthaus_margareten(
    descriptor: VenueDescriptor,
) -> Result<Arc<dyn VenueStrategy>, ConfigError> {
    Ok(Arc::new(GasthausMargareten::from_descriptor(descriptor)?))
}
