/*!
 * Manifest records and the TSV writer
 */

mod record;
mod writer;

pub use record::{ManifestRow, DEFAULT_ACL, MANIFEST_COLUMNS};
pub use writer::write_manifest;
