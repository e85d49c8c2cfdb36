/// Parsed message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
    Empty,
}

impl Content {
    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }
}

/// A single command call, independent of how it arrived (prefix message or slash command)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub author_id: u64,
    pub author_name: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(author_id: u64, author_name: impl Into<String>) -> Self {
        Self {
            author_id,
            author_name: author_name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Arguments joined back with single spaces
    pub fn rest(&self) -> String {
        self.args.join(" ")
    }
}
