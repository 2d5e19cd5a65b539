use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language tag declared on a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Interpreted script, run directly by the interpreter.
    Py,
    /// C, compiled with the configured C compiler.
    C,
    /// C++, compiled with the configured C++ compiler.
    Cpp,
    /// Compiled to bytecode; the entry class must be named `Main`.
    Java,
    /// Script run by the JavaScript runtime.
    Js,
}

impl Language {
    /// All supported languages.
    pub const ALL: &'static [Language] = &[Self::Py, Self::C, Self::Cpp, Self::Java, Self::Js];

    /// Returns the wire tag (e.g. `"cpp"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Py => "py",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Js => "js",
        }
    }

    /// Source file extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Py => ".py",
            Self::C => ".c",
            Self::Cpp => ".cpp",
            Self::Java => ".java",
            Self::Js => ".js",
        }
    }

    /// Returns true if the language has a build step that can reject the source.
    pub fn is_compiled(&self) -> bool {
        matches!(self, Self::C | Self::Cpp | Self::Java)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unsupported language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLanguageError {
    invalid: String,
}

impl ParseLanguageError {
    /// The tag as it was received.
    pub fn tag(&self) -> &str {
        &self.invalid
    }
}

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsupported language '{}'. Valid values: {}",
            self.invalid,
            Language::ALL
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for Language {
    type Err = ParseLanguageError;

    /// Tags are matched case-insensitively after trimming surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "py" => Ok(Self::Py),
            "c" => Ok(Self::C),
            "cpp" => Ok(Self::Cpp),
            "java" => Ok(Self::Java),
            "js" => Ok(Self::Js),
            _ => Err(ParseLanguageError {
                invalid: s.to_string(),
            }),
        }
    }
}
