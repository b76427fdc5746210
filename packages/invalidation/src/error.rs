#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationError {
    pub code: String,
    pub title: String,
    pub description: String,
}

impl InvalidationError {
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

impl std::fmt::Display for InvalidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.title, self.description, self.code)
    }
}

impl std::error::Error for InvalidationError {}
