use std::path::{Path, PathBuf};

/// Branding image bytes, ready to hand to egui's image loaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl Logo {
    /// URI under which the bytes are registered with egui. The extension
    /// lets the loader pick the right decoder.
    pub fn uri(&self) -> String {
        format!("bytes://{}", self.path.display())
    }
}

/// Read the optional branding image. A missing or unreadable file is not an
/// error: the side panel is simply drawn without it.
pub fn load_logo(path: &Path) -> Option<Logo> {
    match std::fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => Some(Logo {
            path: path.to_path_buf(),
            bytes,
        }),
        Ok(_) => {
            log::debug!("Branding image {} is empty, skipping", path.display());
            None
        }
        Err(e) => {
            log::debug!("No branding image at {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_logo_is_none() {
        assert!(load_logo(Path::new("no/such/logo.jpg")).is_none());
    }

    #[test]
    fn present_logo_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        let logo = load_logo(&path).unwrap();
        assert_eq!(logo.bytes.len(), 4);
        assert!(logo.uri().starts_with("bytes://"));
        assert!(logo.uri().ends_with("logo.png"));
    }
}
