//!  Storage is organized through [record_store::JsonRecordStore].
//!  The basic idea is:
//!   - There is a single data file (`dados.json`) inside the application directory.
//!   - The file holds the whole collection as a JSON array and is rewritten on every save.
//!   - The file doubles as the artifact handed to the platform share mechanism on export.

pub mod entities;
pub mod record_store;
