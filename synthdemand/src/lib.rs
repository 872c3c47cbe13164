//! Generates synthetic customers for a German administrative area: as many as the area's share of
//! national demand calls for, spread out like the population, but only in places where land use
//! makes customers plausible.
//!
//! The pieces can be used separately (the two geometry filters, the demand calculation, the
//! sampler), or all together through `DemandSynthesizer` with any set of providers.

#[macro_use]
extern crate log;

pub use self::area::{AdminLevel, Area};
pub use self::config::Config;
pub use self::customers::{CustomerSet, DemandSynthesizer};
pub use self::demand::NationalConstants;
pub use self::eligible::EligibleArea;
pub use self::error::{Error, IdentifierError, Result};
pub use self::filter::{remove_enclosed, remove_out_of_bounds};
pub use self::grid::{GridCell, PopulationGrid};
pub use self::land_use::{Footprint, LandUseKind, LandUsePolygon};
pub use self::provider::{AreaProvider, LandUseProvider, PopulationGridProvider};
pub use self::regkey::{AreaIdentifier, Regkey};
pub use self::sampler::{PopulationWeightedSampler, SampleReport};

mod area;
mod config;
mod customers;
mod demand;
mod eligible;
mod error;
mod filter;
mod grid;
mod land_use;
mod provider;
mod regkey;
mod sampler;
pub mod source;
mod spatial;
