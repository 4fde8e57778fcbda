use std::fmt;

#[derive(Debug)]
pub enum SkyError {
    Io(std::io::Error),
    Config(String),
    UnknownGameVersion(u16),
    Extraction(String),
    Resource(String),
    Subsystem(String),
}

impl fmt::Display for SkyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkyError::Io(err) => write!(f, "IO Error: {}", err),
            SkyError::Config(msg) => write!(f, "Config Error: {}", msg),
            SkyError::UnknownGameVersion(version) => write!(f, "Unknown game version {}", version),
            SkyError::Extraction(msg) => write!(f, "Extraction Error: {}", msg),
            SkyError::Resource(msg) => write!(f, "Resource Error: {}", msg),
            SkyError::Subsystem(msg) => write!(f, "Subsystem Error: {}", msg),
        }
    }
}

impl std::error::Error for SkyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SkyError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SkyError {
    fn from(err: std::io::Error) -> Self {
        SkyError::Io(err)
    }
}

impl From<serde_json::Error> for SkyError {
    fn from(err: serde_json::Error) -> Self {
        SkyError::Config(format!("Invalid config file: {}", err))
    }
}
