/// Fatal window creation error.
///
/// Window construction fails with exactly one of these kinds; everything
/// that can go wrong after a window exists is reported through the log
/// side channel instead and never aborts the render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The native system cannot provide a context with the requested
    /// parameters (version, sample count, or no usable adapter/device).
    ContextCreation(String),
    /// No native display or surface can be obtained. Only the interactive
    /// backends produce this; headless contexts need no display.
    DisplayUnavailable(String),
}

impl WindowError {
    pub fn context(msg: impl Into<String>) -> Self {
        Self::ContextCreation(msg.into())
    }

    pub fn display(msg: impl Into<String>) -> Self {
        Self::DisplayUnavailable(msg.into())
    }
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContextCreation(msg) => write!(f, "context creation failed: {}", msg),
            Self::DisplayUnavailable(msg) => write!(f, "no display available: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
