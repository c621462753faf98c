//! Working-copy blob hashing.
//!
//! Cleanliness checks compare the on-disk content against the blob hash
//! recorded in the branch-tip tree, so the working hash must match git's
//! own content addressing byte for byte: SHA-1 over
//! `"blob <len>\0" + bytes`. Delegating the framing to libgit2 keeps the
//! two sides of the comparison computed the same way.

use std::path::Path;

use git2::{ObjectType, Oid};

use crate::core::errors::{Result, TexbakeError};

/// Compute the git blob hash of a file's current on-disk content.
pub fn working_blob_hash(path: &Path) -> Result<Oid> {
    let bytes = std::fs::read(path).map_err(|err| TexbakeError::io_at(path, err))?;
    hash_bytes(&bytes)
}

/// Compute the git blob hash of an in-memory byte sequence.
pub fn hash_bytes(bytes: &[u8]) -> Result<Oid> {
    Oid::hash_object(ObjectType::Blob, bytes).map_err(Into::into)
}
