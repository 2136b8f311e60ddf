//! Static JSON loaders and the records they produce.

mod client;
mod error;
mod model;
mod selection;
mod slug;
mod source;
#[cfg(test)]
mod testing;

pub use client::{DataClient, ROLES_FILE, SECTORS_FILE};
#[cfg(test)]
pub use model::{NetworkEdge, NetworkMetadata};
pub use model::{
	CascadeResult, NetworkNode, QuadrantCode, QuadrantDistribution, ResearchStats, ResolvedEdge,
	Role, SectorNetwork, SectorSummary,
};
pub use selection::SectorRequests;
