//! Fixed layout of an extracted export archive

/// Logical root directory every export archive unpacks into.
pub const ARCHIVE_ROOT: &str = "puppetdb-bak";

/// Root-relative path of the export metadata document.
pub const METADATA_PATH: &str = "puppetdb-bak/export-metadata.json";

/// Root-relative prefix under which catalog documents live.
pub const CATALOGS_PREFIX: &str = "puppetdb-bak/catalogs/";

/// Suffix shared by every structured entry.
pub const JSON_SUFFIX: &str = ".json";

/// Metadata key that differs between two independently produced exports.
pub const VOLATILE_METADATA_KEY: &str = "timestamp";

/// Key path from the catalog document root to the resources collection.
pub const RESOURCES_PATH: [&str; 2] = ["data", "resources"];

/// Per-resource field whose order carries no meaning.
pub const TAGS_KEY: &str = "tags";

/// Build the root-relative path of a catalog entry for `certname`.
pub fn catalog_path(certname: &str) -> String {
    format!("{CATALOGS_PREFIX}{certname}{JSON_SUFFIX}")
}
