use std::path::{Path, PathBuf};

pub trait FileName {
    fn string_file_name(&self) -> &str;
}

impl FileName for Path {
    fn string_file_name(&self) -> &str {
        self.file_name().and_then(|s| s.to_str()).unwrap_or("unknown")
    }
}

impl FileName for PathBuf {
    fn string_file_name(&self) -> &str {
        self.as_path().string_file_name()
    }
}
