//! Apache Derby provider.

use crate::database::{DatabaseFamily, DatabaseInfo};

use super::CallMetaDataProvider;

/// Provider for Apache Derby.
///
/// Derby files procedures under the connecting user's schema unless told
/// otherwise.
#[derive(Debug, Clone)]
pub struct DerbyCallMetaDataProvider {
    info: DatabaseInfo,
    procedure_column_metadata_used: bool,
}

impl DerbyCallMetaDataProvider {
    /// Create a provider with column metadata enabled.
    pub fn new(info: DatabaseInfo) -> Self {
        Self {
            info,
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

impl CallMetaDataProvider for DerbyCallMetaDataProvider {
    fn family(&self) -> DatabaseFamily {
        DatabaseFamily::Derby
    }

    fn database_info(&self) -> &DatabaseInfo {
        &self.info
    }

    fn is_procedure_column_metadata_used(&self) -> bool {
        self.procedure_column_metadata_used
    }

    fn metadata_schema_name_to_use(&self, schema: Option<&str>) -> Option<String> {
        match schema {
            Some(schema) => Some(self.identifier_name_to_use(schema)),
            None => self
                .info
                .user_name
                .as_deref()
                .map(|user| self.identifier_name_to_use(user)),
        }
    }
}
