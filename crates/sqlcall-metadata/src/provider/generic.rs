//! Provider for databases without call metadata quirks.

use crate::database::{DatabaseFamily, DatabaseInfo};

use super::CallMetaDataProvider;

/// Provider relying only on the database's identifier case flags.
///
/// Serves MySQL and DB2, and any unsupported product with column metadata
/// turned off.
#[derive(Debug, Clone)]
pub struct GenericCallMetaDataProvider {
    info: DatabaseInfo,
    family: DatabaseFamily,
    procedure_column_metadata_used: bool,
}

impl GenericCallMetaDataProvider {
    /// Create a provider with column metadata enabled.
    pub fn new(info: DatabaseInfo) -> Self {
        let family = info.family();
        Self {
            info,
            family,
            procedure_column_metadata_used: true,
        }
    }

    /// Enable or disable the use of introspected procedure columns.
    #[must_use]
    pub fn with_procedure_column_metadata(mut self, used: bool) -> Self {
        self.procedure_column_metadata_used = used;
        self
    }
}

impl CallMetaDataProvider for GenericCallMetaDataProvider {
    fn family(&self) -> DatabaseFamily {
        self.family
    }

    fn database_info(&self) -> &DatabaseInfo {
        &self.info
    }

    fn is_procedure_column_metadata_used(&self) -> bool {
        self.procedure_column_metadata_used
    }
}
