use std::fmt;

/// A word shown to the participant, either as a caption or as a button.
pub type Label = String;

/// What a trial puts on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stimulus {
    /// Picture of a named object, referenced by path.
    Image { object: String, path: String },
    /// Free text, used for instruction and consent screens.
    Text(String),
}

impl Stimulus {
    /// Builds the image stimulus for `object`, stored as `<dir>/<object>.<ext>`.
    pub fn image(dir: &str, object: &str, extension: &str) -> Self {
        let path = if dir.is_empty() {
            format!("{object}.{extension}")
        } else {
            format!("{}/{object}.{extension}", dir.trim_end_matches('/'))
        };
        Stimulus::Image {
            object: object.to_string(),
            path,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Stimulus::Text(content.into())
    }

    /// Identifier recorded in trial results.
    pub fn id(&self) -> &str {
        match self {
            Stimulus::Image { path, .. } => path,
            Stimulus::Text(content) => content,
        }
    }

    pub fn object(&self) -> Option<&str> {
        match self {
            Stimulus::Image { object, .. } => Some(object),
            Stimulus::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Stimulus::Text(_))
    }
}

impl fmt::Display for Stimulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
