//! Identifier remapping for project cloning.
//!
//! Cloning copies switches and SFPs first, recording old id -> new id for
//! each, then rewrites every port's references through those maps. This
//! module holds the mapping and the port rewrite; the database side lives in
//! `wr_db::repositories::NetworkCloneRepo`.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::inventory::validate_name;
use crate::types::DbId;

/// Old identifier -> new identifier for one entity kind.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    inner: HashMap<DbId, DbId>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: DbId, new: DbId) {
        self.inner.insert(old, new);
    }

    pub fn get(&self, old: DbId) -> Option<DbId> {
        self.inner.get(&old).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Translate an optional reference. Absent stays absent; an id with no
    /// mapping (outside the source project) is dropped rather than carried
    /// over, so the copy never points back into the source project.
    pub fn translate_optional(&self, old: Option<DbId>) -> Option<DbId> {
        old.and_then(|id| self.get(id))
    }
}

/// The foreign keys of a port row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRefs {
    pub switch_id: DbId,
    pub sfp_id: Option<DbId>,
    pub remote_sfp_id: Option<DbId>,
    pub connected_to_id: Option<DbId>,
}

/// Rewrite a port's references into the cloned project.
///
/// Returns `None` when the owning switch was not copied; such a port must be
/// skipped instead of being inserted with a dangling owner.
pub fn remap_port_refs(refs: &PortRefs, switches: &IdMap, sfps: &IdMap) -> Option<PortRefs> {
    let switch_id = switches.get(refs.switch_id)?;
    Some(PortRefs {
        switch_id,
        sfp_id: sfps.translate_optional(refs.sfp_id),
        remote_sfp_id: sfps.translate_optional(refs.remote_sfp_id),
        connected_to_id: switches.translate_optional(refs.connected_to_id),
    })
}

/// Validate and trim the name for a cloned project.
pub fn validate_clone_name(name: &str) -> Result<String, CoreError> {
    validate_name("Project name", name)?;
    Ok(name.trim().to_string())
}
