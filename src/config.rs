use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server listening address
    pub addr: String,

    /// Directory all storage operations are confined to
    pub storage_root: PathBuf,

    /// Max file size in bytes
    pub max_file_size: u64,
}

impl Config {
    pub fn load() -> Self {
        let mut addr = std::env::var("ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
        let mut storage_root = PathBuf::from(
            std::env::var("STORAGE_PATH").unwrap_or_else(|_| "./storage".to_string()),
        );
        let mut max_file_size = std::env::var("MAX_FILE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(104857600);

        // Check command line args for overrides (simple implementation)
        for arg in std::env::args() {
            if arg.starts_with("--addr=") {
                addr = arg.trim_start_matches("--addr=").to_string();
            } else if arg.starts_with("--storage-path=") {
                storage_root = PathBuf::from(arg.trim_start_matches("--storage-path="));
            } else if arg.starts_with("--max-file-size=") {
                if let Ok(size) = arg.trim_start_matches("--max-file-size=").parse::<u64>() {
                    max_file_size = size;
                }
            }
        }

        // Containment checks compare whole paths, so the root has to be
        // absolute no matter how it was given.
        if storage_root.is_relative() {
            if let Ok(cwd) = std::env::current_dir() {
                storage_root = cwd.join(storage_root);
            }
        }

        Config {
            addr,
            storage_root,
            max_file_size,
        }
    }
}
