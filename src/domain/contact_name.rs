use unicode_segmentation::UnicodeSegmentation;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactName(String);

impl ContactName {
    /// Accepts names between 2 and 100 graphemes once surrounding whitespace
    /// is removed.
    pub fn parse(s: String) -> Result<Self, String> {
        let s = s.trim();
        let length = s.graphemes(true).count();

        if length < MIN_NAME_LENGTH {
            return Err(format!(
                "Name must be at least {MIN_NAME_LENGTH} characters long."
            ));
        }
        if length > MAX_NAME_LENGTH {
            return Err(format!(
                "Name must be at most {MAX_NAME_LENGTH} characters long."
            ));
        }

        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
