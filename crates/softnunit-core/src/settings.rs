//! Run settings for the NUnit 3 console.
//!
//! Every field is optional; an absent value means the corresponding console
//! option is omitted. Settings load from YAML:
//!
//! ```yaml
//! where: "cat == Integration"
//! timeout: 60000
//! results:
//!   - path: out/TestResult.xml
//!     format: nunit3
//! labels: all
//! params:
//!   env: ci
//!   retries: 2
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::environment::Environment;
use crate::error::{SoftRunError, SoftRunResult};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSettings {
    /// Comma-separated list of test names (`--test`).
    pub test: Option<String>,
    /// File containing test names, one per line (`--testlist`).
    pub test_list: Option<PathBuf>,
    /// Test selection expression (`--where`).
    #[serde(rename = "where")]
    pub where_clause: Option<String>,
    /// Default test case timeout in milliseconds.
    pub timeout: Option<u32>,
    pub seed: Option<i32>,
    pub workers: Option<u32>,
    pub stop_on_error: bool,
    pub skip_non_test_assemblies: bool,
    /// Directory for output files (`--work`).
    pub work: Option<PathBuf>,
    /// File receiving the tests' text output (`--out`).
    pub output_file: Option<PathBuf>,
    pub results: Vec<ResultSpec>,
    pub no_results: bool,
    pub labels: LabelMode,
    pub teamcity: bool,
    pub no_header: bool,
    pub no_color: bool,
    /// Project configuration to load (`--config`).
    pub configuration: Option<String>,
    pub framework: Option<String>,
    pub x86: bool,
    pub dispose_runners: bool,
    pub shadow_copy: bool,
    pub agents: Option<u32>,
    pub process: ProcessMode,
    pub app_domain_usage: DomainUsage,
    pub trace_level: Option<TraceLevel>,
    /// Assembly config file (`--configfile`).
    pub config_file: Option<PathBuf>,
    pub params: Params,

    // Host-side settings; never rendered as console options.
    /// Explicit console executable, bypassing the PATH lookup.
    pub tool_path: Option<PathBuf>,
    /// Working directory of the spawned console.
    pub working_directory: Option<PathBuf>,
    /// Extra environment variables for the spawned console.
    pub environment: BTreeMap<String, String>,
}

impl RunSettings {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> SoftRunResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SoftRunError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|err| match err {
            SoftRunError::ConfigFile { message, .. } => SoftRunError::ConfigFile {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_yaml_str(content: &str) -> SoftRunResult<Self> {
        // An empty document means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| SoftRunError::ConfigFile {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    /// Absolute paths of the result files a run will write in the console's
    /// native format. Without explicit results the console writes
    /// `TestResult.xml` into the work directory, or into its own working
    /// directory when no work directory is set.
    pub fn report_paths(&self, env: &Environment) -> Vec<PathBuf> {
        if self.no_results {
            return Vec::new();
        }
        if self.has_results() {
            return self
                .results
                .iter()
                .filter(|r| r.is_nunit3_format())
                .map(|r| env.make_absolute(&r.path))
                .collect();
        }
        let dir = self
            .work
            .as_deref()
            .or(self.working_directory.as_deref())
            .map(|d| env.make_absolute(d))
            .unwrap_or_else(|| env.working_dir().to_path_buf());
        vec![dir.join(DEFAULT_RESULT_FILE)]
    }
}

/// File name the console writes results to when none is configured.
pub const DEFAULT_RESULT_FILE: &str = "TestResult.xml";

/// One `--result` specification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultSpec {
    pub path: PathBuf,
    pub format: Option<String>,
    pub transform: Option<PathBuf>,
}

impl ResultSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            transform: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_transform(mut self, transform: impl Into<PathBuf>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    /// Whether the file is written in the console's native XML format,
    /// the one [`crate::report`] understands.
    pub fn is_nunit3_format(&self) -> bool {
        self.transform.is_none()
            && self
                .format
                .as_deref()
                .map_or(true, |f| f.eq_ignore_ascii_case("nunit3"))
    }
}

/// Parses the console's own syntax: `PATH[;format=F][;transform=T]`.
impl FromStr for ResultSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(';');
        let path = parts.next().unwrap_or_default().trim();
        if path.is_empty() {
            return Err(format!("result spec '{s}' has no file path"));
        }
        let mut spec = ResultSpec::new(path);
        for part in parts {
            match part.split_once('=') {
                Some(("format", value)) if !value.is_empty() => {
                    spec.format = Some(value.to_string());
                }
                Some(("transform", value)) if !value.is_empty() => {
                    spec.transform = Some(PathBuf::from(value));
                }
                _ => return Err(format!("unknown result option '{part}' in '{s}'")),
            }
        }
        Ok(spec)
    }
}

/// Test labelling mode (`--labels`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    #[default]
    Off,
    On,
    All,
    Before,
    After,
}

impl LabelMode {
    /// Flag value, or `None` for the default that is left off the command line.
    pub fn flag_value(self) -> Option<&'static str> {
        match self {
            Self::Off => None,
            Self::On => Some("On"),
            Self::All => Some("All"),
            Self::Before => Some("Before"),
            Self::After => Some("After"),
        }
    }
}

impl FromStr for LabelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            "all" => Ok(Self::All),
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            _ => Err(format!(
                "invalid label mode '{s}' (expected off, on, all, before or after)"
            )),
        }
    }
}

/// How test assemblies are distributed over agent processes (`--process`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessMode {
    #[default]
    Multiple,
    Single,
    Separate,
}

impl ProcessMode {
    pub fn flag_value(self) -> Option<&'static str> {
        match self {
            Self::Multiple => None,
            Self::Single => Some("Single"),
            Self::Separate => Some("Separate"),
        }
    }
}

impl FromStr for ProcessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "multiple" => Ok(Self::Multiple),
            "single" => Ok(Self::Single),
            "separate" => Ok(Self::Separate),
            _ => Err(format!(
                "invalid process mode '{s}' (expected multiple, single or separate)"
            )),
        }
    }
}

/// AppDomain isolation (`--domain`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainUsage {
    #[default]
    Default,
    None,
    Single,
    Multiple,
}

impl DomainUsage {
    pub fn flag_value(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::None => Some("None"),
            Self::Single => Some("Single"),
            Self::Multiple => Some("Multiple"),
        }
    }
}

impl FromStr for DomainUsage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "none" => Ok(Self::None),
            "single" => Ok(Self::Single),
            "multiple" => Ok(Self::Multiple),
            _ => Err(format!(
                "invalid domain usage '{s}' (expected default, none, single or multiple)"
            )),
        }
    }
}

/// Internal trace level of the console (`--trace`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Off,
    Error,
    Warning,
    Info,
    Debug,
    Verbose,
}

impl TraceLevel {
    pub fn flag_value(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
            // The console only knows "Verbose" for its most detailed level.
            Self::Debug | Self::Verbose => "Verbose",
        }
    }
}

impl FromStr for TraceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!(
                "invalid trace level '{s}' (expected off, error, warning, info, debug or verbose)"
            )),
        }
    }
}

/// Custom test parameters (`--params`), kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; an overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// YAML scalars accepted as parameter values.
#[derive(Deserialize)]
#[serde(untagged)]
enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<ParamValue> for String {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Str(s) => s,
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Bool(b) => b.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParamsVisitor;

        impl<'de> Visitor<'de> for ParamsVisitor {
            type Value = Params;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of parameter names to scalar values")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Params, E> {
                Ok(Params::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Params, A::Error> {
                let mut params = Params::new();
                while let Some((key, value)) = map.next_entry::<String, ParamValue>()? {
                    params.insert(key, value);
                }
                Ok(params)
            }
        }

        deserializer.deserialize_any(ParamsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_yaml() {
        let yaml = r#"
test: Ns.Fixture.Case
where: "cat == Integration"
timeout: 5000
seed: -12
results:
  - path: out/TestResult.xml
    format: nunit3
  - path: out/junit.xml
    transform: tools/junit.xslt
labels: before
process: separate
app_domain_usage: none
trace_level: debug
params:
  env: ci
  retries: 2
  fast: true
environment:
  DOTNET_ROLL_FORWARD: Major
"#;
        let settings = RunSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.test.as_deref(), Some("Ns.Fixture.Case"));
        assert_eq!(settings.where_clause.as_deref(), Some("cat == Integration"));
        assert_eq!(settings.timeout, Some(5000));
        assert_eq!(settings.seed, Some(-12));
        assert_eq!(settings.results.len(), 2);
        assert_eq!(settings.results[0].format.as_deref(), Some("nunit3"));
        assert_eq!(
            settings.results[1].transform,
            Some(PathBuf::from("tools/junit.xslt"))
        );
        assert_eq!(settings.labels, LabelMode::Before);
        assert_eq!(settings.process, ProcessMode::Separate);
        assert_eq!(settings.app_domain_usage, DomainUsage::None);
        assert_eq!(settings.trace_level, Some(TraceLevel::Debug));
        let params: Vec<_> = settings.params.iter().collect();
        assert_eq!(
            params,
            vec![("env", "ci"), ("retries", "2"), ("fast", "true")]
        );
        assert_eq!(
            settings.environment.get("DOTNET_ROLL_FORWARD").map(String::as_str),
            Some("Major")
        );
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(RunSettings::from_yaml_str("  \n").unwrap(), RunSettings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RunSettings::from_yaml_str("tiemout: 5").unwrap_err();
        assert!(matches!(err, SoftRunError::ConfigFile { .. }));
    }

    #[test]
    fn params_overwrite_keeps_position() {
        let mut params = Params::new();
        params.insert("a", "1");
        params.insert("b", "2");
        params.insert("a", "3");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn result_spec_from_console_syntax() {
        let spec: ResultSpec = "out/r.xml;format=nunit2;transform=t.xslt".parse().unwrap();
        assert_eq!(spec.path, PathBuf::from("out/r.xml"));
        assert_eq!(spec.format.as_deref(), Some("nunit2"));
        assert_eq!(spec.transform, Some(PathBuf::from("t.xslt")));
        assert!(!spec.is_nunit3_format());

        let plain: ResultSpec = "r.xml".parse().unwrap();
        assert!(plain.is_nunit3_format());

        assert!("".parse::<ResultSpec>().is_err());
        assert!("r.xml;colour=red".parse::<ResultSpec>().is_err());
    }

    #[test]
    fn report_paths_follow_console_defaults() {
        let env = Environment::new("/work");
        assert_eq!(
            RunSettings::default().report_paths(&env),
            vec![PathBuf::from("/work/TestResult.xml")]
        );

        let with_work = RunSettings {
            work: Some("out".into()),
            ..Default::default()
        };
        assert_eq!(
            with_work.report_paths(&env),
            vec![PathBuf::from("/work/out/TestResult.xml")]
        );

        let explicit = RunSettings {
            results: vec![
                ResultSpec::new("r.xml"),
                ResultSpec::new("j.xml").with_format("nunit2"),
            ],
            ..Default::default()
        };
        assert_eq!(explicit.report_paths(&env), vec![PathBuf::from("/work/r.xml")]);

        let none = RunSettings {
            no_results: true,
            ..Default::default()
        };
        assert!(none.report_paths(&env).is_empty());
    }

    #[test]
    fn default_variants_are_omitted() {
        assert_eq!(LabelMode::default().flag_value(), None);
        assert_eq!(ProcessMode::default().flag_value(), None);
        assert_eq!(DomainUsage::default().flag_value(), None);
        assert_eq!(LabelMode::All.flag_value(), Some("All"));
        assert_eq!(TraceLevel::Debug.flag_value(), "Verbose");
        assert_eq!("SEPARATE".parse::<ProcessMode>(), Ok(ProcessMode::Separate));
        assert!("sideways".parse::<DomainUsage>().is_err());
    }
}
