use crate::palette::Rgb;

pub type LoomResult<T> = Result<T, LoomError>;

#[derive(thiserror::Error, Debug)]
pub enum LoomError {
    #[error("session intercepted: {0}")]
    Intercepted(String),

    #[error("cursor target out of bounds")]
    OutOfBounds,

    #[error("no swatch for {0}")]
    SwatchMissing(Rgb),

    #[error("image error: {0}")]
    Image(String),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoomError {
    pub fn intercepted(msg: impl Into<String>) -> Self {
        Self::Intercepted(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// True for the failures the scheduler answers with the interception
    /// gate rather than by aborting the run.
    pub fn is_interception(&self) -> bool {
        matches!(self, Self::Intercepted(_) | Self::OutOfBounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            LoomError::intercepted("x")
                .to_string()
                .contains("session intercepted:")
        );
        assert!(LoomError::image("x").to_string().contains("image error:"));
        assert!(
            LoomError::invalid("x")
                .to_string()
                .contains("invalid input:")
        );
        assert!(
            LoomError::SwatchMissing(Rgb::new(1, 2, 3))
                .to_string()
                .contains("rgb(1, 2, 3)")
        );
    }

    #[test]
    fn interception_classification() {
        assert!(LoomError::intercepted("x").is_interception());
        assert!(LoomError::OutOfBounds.is_interception());
        assert!(!LoomError::image("x").is_interception());
        assert!(!LoomError::SwatchMissing(Rgb::new(0, 0, 0)).is_interception());
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = LoomError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
