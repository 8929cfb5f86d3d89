use std::fmt;
use std::str::FromStr;

/// How the email address is turned into a key segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMode {
    /// Use the address exactly as submitted. `A@x.com` and `a@x.com` are
    /// different keys.
    #[default]
    Verbatim,
    /// Trim surrounding whitespace and lowercase.
    Normalized,
}

impl FromStr for KeyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbatim" => Ok(KeyMode::Verbatim),
            "normalized" | "normalised" => Ok(KeyMode::Normalized),
            other => Err(format!("unknown key mode '{other}'")),
        }
    }
}

/// Why an email address cannot be used as a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    Empty,
    IllegalCharacter(char),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::Empty => write!(f, "email address is empty"),
            KeyError::IllegalCharacter(c) => {
                write!(f, "email address contains illegal character {c:?}")
            }
        }
    }
}

/// Location of a submission in the object store: `<prefix>/<email>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn derive(prefix: &str, email: &str, mode: KeyMode) -> Result<Self, KeyError> {
        let segment = match mode {
            KeyMode::Verbatim => email.to_string(),
            KeyMode::Normalized => email.trim().to_lowercase(),
        };

        if segment.is_empty() {
            return Err(KeyError::Empty);
        }
        // One email, one path segment.
        if let Some(c) = segment.chars().find(|c| *c == '/' || c.is_control()) {
            return Err(KeyError::IllegalCharacter(c));
        }

        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            Ok(Self(format!("{segment}.json")))
        } else {
            Ok(Self(format!("{prefix}/{segment}.json")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
