/// Canonical form of program output: trimmed, non-blank lines joined by `\n`.
pub fn normalize(text: &str) -> String {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Exact comparison after normalization. No numeric tolerance.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    normalize(actual) == normalize(expected)
}
