use std::fmt;

use serde::{Deserialize, Serialize};

/// Tone the judge uses for feedback. Chosen once per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Default,
    Serious,
    Cheery,
}

impl Persona {
    /// Unknown or missing names fall back to [`Persona::Default`].
    pub fn parse(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("serious") => Persona::Serious,
            Some("cheery") => Persona::Cheery,
            _ => Persona::Default,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Persona::Default => "default",
            Persona::Serious => "serious",
            Persona::Cheery => "cheery",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
