use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a single test-case execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Output matched after normalization and the program exited with code 0.
    #[serde(rename = "AC")]
    Accepted,
    /// Program ran to completion but the output did not match.
    #[serde(rename = "WA")]
    WrongAnswer,
    /// Non-zero exit status, or the execution itself failed.
    #[serde(rename = "RE")]
    RuntimeError,
    /// Wall-clock deadline expired.
    #[serde(rename = "TLE")]
    TimeLimitExceeded,
    /// Build step rejected the source.
    #[serde(rename = "CE")]
    CompilationError,
}

impl Verdict {
    pub const ALL: &'static [Verdict] = &[
        Self::Accepted,
        Self::WrongAnswer,
        Self::RuntimeError,
        Self::TimeLimitExceeded,
        Self::CompilationError,
    ];

    /// Returns the short code (e.g. `"TLE"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "AC",
            Self::WrongAnswer => "WA",
            Self::RuntimeError => "RE",
            Self::TimeLimitExceeded => "TLE",
            Self::CompilationError => "CE",
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a whole judging run.
///
/// Deliberately coarser than [`Verdict`]: runtime errors and timeouts fold into
/// `WrongAnswer`, while the per-test results keep the finer detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinalVerdict {
    #[serde(rename = "AC")]
    Accepted,
    #[serde(rename = "WA")]
    WrongAnswer,
    #[serde(rename = "CE")]
    CompilationError,
    /// No test cases existed to judge against.
    #[serde(rename = "P")]
    Pending,
}

impl FinalVerdict {
    pub const ALL: &'static [FinalVerdict] = &[
        Self::Accepted,
        Self::WrongAnswer,
        Self::CompilationError,
        Self::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "AC",
            Self::WrongAnswer => "WA",
            Self::CompilationError => "CE",
            Self::Pending => "P",
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for FinalVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for FinalVerdict {
    fn default() -> Self {
        Self::Pending
    }
}

/// Error when parsing an invalid verdict code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVerdictError {
    invalid: String,
}

impl fmt::Display for ParseVerdictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid verdict '{}'", self.invalid)
    }
}

impl std::error::Error for ParseVerdictError {}

impl FromStr for Verdict {
    type Err = ParseVerdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ParseVerdictError {
                invalid: s.to_string(),
            })
    }
}

impl FromStr for FinalVerdict {
    type Err = ParseVerdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ParseVerdictError {
                invalid: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_short_codes() {
        assert_eq!(
            serde_json::to_string(&Verdict::TimeLimitExceeded).unwrap(),
            "\"TLE\""
        );
        assert_eq!(
            serde_json::to_string(&FinalVerdict::Pending).unwrap(),
            "\"P\""
        );
        for verdict in Verdict::ALL {
            let json = serde_json::to_string(verdict).unwrap();
            assert_eq!(json, format!("\"{}\"", verdict.as_str()));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("RE".parse::<Verdict>().unwrap(), Verdict::RuntimeError);
        assert_eq!("P".parse::<FinalVerdict>().unwrap(), FinalVerdict::Pending);
        assert!("P".parse::<Verdict>().is_err());
        assert!("TLE".parse::<FinalVerdict>().is_err());
    }
}
