use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Toolchain binaries used to build and run submissions.
#[derive(Debug, Deserialize, Clone)]
pub struct ToolchainConfig {
    /// Interpreter for `py` submissions. Default: "python3".
    #[serde(default = "default_python")]
    pub python: String,
    /// C compiler. Default: "gcc".
    #[serde(default = "default_gcc")]
    pub gcc: String,
    /// C++ compiler. Default: "g++".
    #[serde(default = "default_gxx")]
    pub gxx: String,
    /// Bytecode compiler. Default: "javac".
    #[serde(default = "default_javac")]
    pub javac: String,
    /// Bytecode runtime. Default: "java".
    #[serde(default = "default_java")]
    pub java: String,
    /// JavaScript runtime. Default: "node".
    #[serde(default = "default_node")]
    pub node: String,
}

fn default_python() -> String {
    "python3".into()
}
fn default_gcc() -> String {
    "gcc".into()
}
fn default_gxx() -> String {
    "g++".into()
}
fn default_javac() -> String {
    "javac".into()
}
fn default_java() -> String {
    "java".into()
}
fn default_node() -> String {
    "node".into()
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            gcc: default_gcc(),
            gxx: default_gxx(),
            javac: default_javac(),
            java: default_java(),
            node: default_node(),
        }
    }
}

/// Engine behaviour.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Parent directory for per-run scratch directories. Default: system temp dir.
    #[serde(default)]
    pub scratch_root: Option<PathBuf>,
    /// Upper bound on a single compiler invocation. Default: unbounded.
    #[serde(default)]
    pub compile_timeout_secs: Option<u64>,
    /// Stderr reported for a test case that hit the deadline. Default: "Time Limit Exceeded".
    #[serde(default = "default_tle_marker")]
    pub tle_marker: String,
}

fn default_tle_marker() -> String {
    "Time Limit Exceeded".into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scratch_root: None,
            compile_timeout_secs: None,
            tle_marker: default_tle_marker(),
        }
    }
}

impl EngineConfig {
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Judge application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct JudgeAppConfig {
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl JudgeAppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("JUDGE_CONFIG").unwrap_or_else(|_| "config/judge".to_string());

        let s = Config::builder()
            .set_default("toolchain.python", default_python())?
            .set_default("toolchain.gcc", default_gcc())?
            .set_default("toolchain.gxx", default_gxx())?
            .set_default("toolchain.javac", default_javac())?
            .set_default("toolchain.java", default_java())?
            .set_default("toolchain.node", default_node())?
            .set_default("engine.tle_marker", default_tle_marker())?
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("JUDGE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
