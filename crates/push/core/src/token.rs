//! Recipient device tokens.

/// One recipient or an ordered batch of recipients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum DeviceToken {
    /// A single device token.
    One(String),
    /// Several device tokens, in delivery order.
    Many(Vec<String>),
}

impl DeviceToken {
    /// Normalize to an ordered list of tokens.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(token) => vec![token],
            Self::Many(tokens) => tokens,
        }
    }

    /// Number of recipients.
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(tokens) => tokens.len(),
        }
    }

    /// Check if there are no recipients.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for DeviceToken {
    fn from(token: String) -> Self {
        Self::One(token)
    }
}

impl From<&str> for DeviceToken {
    fn from(token: &str) -> Self {
        Self::One(token.to_string())
    }
}

impl From<Vec<String>> for DeviceToken {
    fn from(tokens: Vec<String>) -> Self {
        Self::Many(tokens)
    }
}

impl From<&[&str]> for DeviceToken {
    fn from(tokens: &[&str]) -> Self {
        Self::Many(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for DeviceToken {
    fn from(tokens: [&str; N]) -> Self {
        Self::from(&tokens[..])
    }
}
