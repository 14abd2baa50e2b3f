//! Credential persistence.
//!
//! [`CredentialStore`] is the seam between the authenticated client and
//! whatever holds the OAuth blobs. The only shipped backend is
//! [`SqliteCredentialStore`].

mod sqlite;

pub use sqlite::SqliteCredentialStore;

use crate::{error::Result, types::Credential};

pub trait CredentialStore {
    /// Reads one top-level field of the stored blob.
    ///
    /// String values come back without JSON quoting; numbers and booleans as
    /// their JSON text.
    fn read_field(&self, name: &str, field: &str) -> Result<String>;

    /// Reads and decodes the whole blob.
    fn read_record(&self, name: &str) -> Result<Credential>;

    /// Overwrites the blob of an existing record. Never inserts.
    fn write_record(&self, name: &str, record: &Credential) -> Result<()>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for &T {
    fn read_field(&self, name: &str, field: &str) -> Result<String> {
        (**self).read_field(name, field)
    }

    fn read_record(&self, name: &str) -> Result<Credential> {
        (**self).read_record(name)
    }

    fn write_record(&self, name: &str, record: &Credential) -> Result<()> {
        (**self).write_record(name, record)
    }
}
