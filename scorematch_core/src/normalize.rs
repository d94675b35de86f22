/// Maps raw report text to the form the pattern table is written against.
///
/// Implementations must be idempotent on their own output and must not
/// introduce digit characters that were not in the input.
pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

impl<F> TextNormalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, text: &str) -> String {
        self(text)
    }
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl TextNormalizer for IdentityNormalizer {
    fn normalize(&self, text: &str) -> String {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closures_are_normalizers() {
        let lower = |text: &str| text.to_lowercase();
        assert_eq!(lower.normalize("Gleason 7"), "gleason 7");
        assert_eq!(IdentityNormalizer.normalize("Gleason 7"), "Gleason 7");
    }
}
