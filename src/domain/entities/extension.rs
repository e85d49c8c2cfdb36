/// Outcome of one load attempt during an extension scan.
///
/// Only lives long enough to be logged; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRecord {
    pub name: String,
    pub loaded: bool,
    pub error: Option<String>,
}

impl ExtensionRecord {
    pub fn loaded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loaded: true,
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loaded: false,
            error: Some(error.into()),
        }
    }
}
