use redb::TableDefinition;

/// Session tokens: host -> token
pub const TOKENS: TableDefinition<&str, &str> = TableDefinition::new("tokens");

/// Installed apps: app_id -> app_name
pub const APP_MAPPING: TableDefinition<&str, &str> = TableDefinition::new("app_mapping");

/// Wake addresses: host -> mac
pub const DEVICES: TableDefinition<&str, &str> = TableDefinition::new("devices");
