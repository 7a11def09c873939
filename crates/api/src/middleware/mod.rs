//! Request extractors that gate access.
//!
//! - [`edit_access::EditAccess`] -- Requires the edit password on mutating endpoints.

pub mod edit_access;
