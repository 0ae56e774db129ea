use unicode_segmentation::UnicodeSegmentation;

pub const MIN_MESSAGE_LENGTH: usize = 10;
pub const MAX_MESSAGE_LENGTH: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage(String);

impl ContactMessage {
    pub fn parse(s: String) -> Result<Self, String> {
        let s = s.trim();
        let length = s.graphemes(true).count();

        if length < MIN_MESSAGE_LENGTH {
            return Err(format!(
                "Message must be at least {MIN_MESSAGE_LENGTH} characters long."
            ));
        }
        if length > MAX_MESSAGE_LENGTH {
            return Err(format!(
                "Message must be at most {MAX_MESSAGE_LENGTH} characters long."
            ));
        }

        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for ContactMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
