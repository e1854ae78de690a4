//! Push platforms.

/// Push platform, one per provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Apple Push Notification service.
    Apns,
    /// Google Cloud Messaging.
    Gcm,
}

impl Platform {
    /// Canonical platform name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apns => "apns",
            Self::Gcm => "gcm",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = push_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "apns" | "ios" => Ok(Self::Apns),
            "gcm" | "fcm" | "android" => Ok(Self::Gcm),
            _ => Err(push_core::Error::UnknownPlatform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("ios".parse::<Platform>().unwrap(), Platform::Apns);
        assert_eq!("Android".parse::<Platform>().unwrap(), Platform::Gcm);
        assert_eq!("gcm".parse::<Platform>().unwrap().to_string(), "gcm");
        assert!("windows".parse::<Platform>().is_err());
    }
}
