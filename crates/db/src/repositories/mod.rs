//! Repository layer: one zero-sized struct per table with async associated
//! functions taking a `&PgPool`.

pub mod network_clone_repo;
pub mod port_repo;
pub mod project_repo;
pub mod sfp_repo;
pub mod switch_repo;

pub use network_clone_repo::{CloneError, CloneSummary, NetworkCloneRepo};
pub use port_repo::PortRepo;
pub use project_repo::{ProjectCounts, ProjectRepo};
pub use sfp_repo::SfpRepo;
pub use switch_repo::SwitchRepo;
