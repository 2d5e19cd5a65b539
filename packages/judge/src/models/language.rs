use common::Language;
use std::path::Path;

use crate::config::ToolchainConfig;
use crate::models::runner::Invocation;

/// Entry type name every bytecode submission must declare, and the base name
/// used for sources that are copied into the scratch directory.
pub const ENTRY_NAME: &str = "Main";

#[cfg(windows)]
pub const EXECUTABLE_NAME: &str = "solution.exe";
#[cfg(not(windows))]
pub const EXECUTABLE_NAME: &str = "solution";

/// How the submitted file is placed before building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePlacement {
    /// Used where it is; nothing is copied.
    AsSubmitted,
    /// Copied to `Main<ext>` only if the name lacks the expected extension.
    RenameIfMissingExtension,
    /// Always copied to `Main<ext>`.
    Canonical,
}

/// Static description of how one language is built and run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    pub language: Language,
    pub placement: SourcePlacement,
}

impl LanguageProfile {
    pub fn for_language(language: Language) -> Self {
        let placement = match language {
            Language::Py | Language::Js => SourcePlacement::AsSubmitted,
            Language::C | Language::Cpp => SourcePlacement::RenameIfMissingExtension,
            Language::Java => SourcePlacement::Canonical,
        };
        Self {
            language,
            placement,
        }
    }

    /// File name the source gets when it is copied into the scratch directory.
    pub fn canonical_file_name(&self) -> String {
        format!("{ENTRY_NAME}{}", self.language.extension())
    }

    /// Whether `source` has to be copied before building.
    pub fn needs_copy(&self, source: &Path) -> bool {
        match self.placement {
            SourcePlacement::AsSubmitted => false,
            SourcePlacement::Canonical => true,
            SourcePlacement::RenameIfMissingExtension => !source
                .file_name()
                .map(|name| {
                    name.to_string_lossy()
                        .to_lowercase()
                        .ends_with(self.language.extension())
                })
                .unwrap_or(false),
        }
    }

    /// Compiler command line, or `None` for languages without a build step.
    pub fn build_invocation(
        &self,
        toolchain: &ToolchainConfig,
        source: &Path,
        scratch: &Path,
    ) -> Option<Invocation> {
        let source = source.to_string_lossy();
        let executable = scratch.join(EXECUTABLE_NAME);
        match self.language {
            Language::Py | Language::Js => None,
            Language::C => Some(
                Invocation::new(&toolchain.gcc)
                    .arg(source)
                    .arg("-o")
                    .arg(executable.to_string_lossy()),
            ),
            Language::Cpp => Some(
                Invocation::new(&toolchain.gxx)
                    .arg(source)
                    .arg("-o")
                    .arg(executable.to_string_lossy()),
            ),
            Language::Java => Some(
                Invocation::new(&toolchain.javac)
                    .arg(source)
                    .current_dir(scratch),
            ),
        }
    }

    /// Command line executed once per test case.
    pub fn run_invocation(
        &self,
        toolchain: &ToolchainConfig,
        source: &Path,
        scratch: &Path,
    ) -> Invocation {
        match self.language {
            Language::Py => Invocation::new(&toolchain.python).arg(source.to_string_lossy()),
            Language::Js => Invocation::new(&toolchain.node).arg(source.to_string_lossy()),
            Language::C | Language::Cpp => {
                Invocation::new(scratch.join(EXECUTABLE_NAME).to_string_lossy())
            }
            Language::Java => Invocation::new(&toolchain.java)
                .arg("-cp")
                .arg(scratch.to_string_lossy())
                .arg(ENTRY_NAME),
        }
    }
}
