use serde::Serialize;

/// One directory entry as reported to clients.
///
/// `path` is root-relative with a leading slash (the same form clients
/// pass in), never the on-disk location. Timestamps are Unix epoch
/// milliseconds; filesystems that cannot report one yield `0`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub create_time: u64,
    pub modify_time: u64,
    pub is_file: bool,
    /// Guessed from the file extension alone; `null` when unknown.
    pub mime_type: Option<&'static str>,
}
