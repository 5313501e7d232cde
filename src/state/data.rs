/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the database layer and the rest of the app.

/// One stored picture.
///
/// Names are caller-supplied and deliberately NOT unique: several pictures may
/// share a name, and name-based operations define their own rules for that
/// (first match by lowest id on lookup, all matches on delete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Unique database ID, assigned in insertion order and never reused
    pub id: i64,
    /// Caller-supplied name (non-empty, not unique)
    pub name: String,
    /// JPEG payload as stored
    pub data: Vec<u8>,
    /// Unix timestamp of the capture commit
    pub captured_at: i64,
}
