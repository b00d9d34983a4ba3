//! Run command arguments.
//!
//! Console options mirror the NUnit 3 console's own spelling where it does
//! not clash with ours (`--config` selects the settings file here, so the
//! console's project configuration is `--nunit-config`).

use std::path::{Path, PathBuf};

use clap::Parser;
use softnunit_core::{DomainUsage, LabelMode, ProcessMode, ResultSpec, RunSettings, TraceLevel};

/// Settings file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "softnunit.yaml";

#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Test assemblies to run
    #[arg(required_unless_present = "pattern", conflicts_with = "pattern")]
    pub assemblies: Vec<PathBuf>,

    /// Glob selecting the test assemblies, e.g. "src/**/bin/Release/*.Tests.dll"
    #[arg(long)]
    pub pattern: Option<String>,

    /// YAML settings file (default: softnunit.yaml when present)
    #[arg(long, env = "SOFTNUNIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Console executable; skips the PATH lookup
    #[arg(long, env = "SOFTNUNIT_TOOL_PATH")]
    pub tool_path: Option<PathBuf>,

    /// Working directory for the console process
    #[arg(long)]
    pub working_directory: Option<PathBuf>,

    /// Print the command line instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the tests that did not pass once the run finishes
    #[arg(long)]
    pub summarize: bool,

    #[arg(long)]
    pub test: Option<String>,

    #[arg(long = "testlist")]
    pub test_list: Option<PathBuf>,

    /// Test selection expression
    #[arg(long = "where", value_name = "EXPRESSION")]
    pub where_clause: Option<String>,

    /// Default test case timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u32>,

    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i32>,

    #[arg(long)]
    pub workers: Option<u32>,

    #[arg(long = "stoponerror")]
    pub stop_on_error: bool,

    #[arg(long = "skipnontestassemblies")]
    pub skip_non_test_assemblies: bool,

    #[arg(long)]
    pub work: Option<PathBuf>,

    #[arg(long = "out")]
    pub output_file: Option<PathBuf>,

    /// Result file: PATH[;format=F][;transform=T] (repeatable)
    #[arg(long = "result", value_name = "SPEC")]
    pub results: Vec<ResultSpec>,

    #[arg(long = "noresult")]
    pub no_results: bool,

    /// Label mode: off|on|all|before|after
    #[arg(long)]
    pub labels: Option<LabelMode>,

    #[arg(long)]
    pub teamcity: bool,

    #[arg(long = "noheader")]
    pub no_header: bool,

    #[arg(long = "nocolor")]
    pub no_color: bool,

    /// Project configuration to load
    #[arg(long = "nunit-config", value_name = "NAME")]
    pub configuration: Option<String>,

    #[arg(long)]
    pub framework: Option<String>,

    #[arg(long)]
    pub x86: bool,

    #[arg(long)]
    pub dispose_runners: bool,

    #[arg(long = "shadowcopy")]
    pub shadow_copy: bool,

    #[arg(long)]
    pub agents: Option<u32>,

    /// Process model: multiple|single|separate
    #[arg(long)]
    pub process: Option<ProcessMode>,

    /// AppDomain usage: default|none|single|multiple
    #[arg(long = "domain")]
    pub app_domain_usage: Option<DomainUsage>,

    /// Internal trace level: off|error|warning|info|debug|verbose
    #[arg(long = "trace")]
    pub trace_level: Option<TraceLevel>,

    #[arg(long = "configfile")]
    pub config_file: Option<PathBuf>,

    /// Test parameter KEY=VALUE (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

impl RunArgs {
    /// Settings file merged with the flags given on the command line.
    pub fn settings(&self, working_dir: &Path) -> anyhow::Result<RunSettings> {
        let mut settings = match self.config_path(working_dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                RunSettings::load(&path)?
            }
            None => RunSettings::default(),
        };
        self.apply(&mut settings);
        Ok(settings)
    }

    fn config_path(&self, working_dir: &Path) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }
        let default = working_dir.join(DEFAULT_CONFIG_FILE);
        default.is_file().then_some(default)
    }

    /// Flags override file values; switches can only be turned on; `--result`
    /// replaces the file's result list; `--param` adds to the file's params.
    pub fn apply(&self, s: &mut RunSettings) {
        fn set<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }

        set(&mut s.tool_path, &self.tool_path);
        set(&mut s.working_directory, &self.working_directory);
        set(&mut s.test, &self.test);
        set(&mut s.test_list, &self.test_list);
        set(&mut s.where_clause, &self.where_clause);
        set(&mut s.timeout, &self.timeout);
        set(&mut s.seed, &self.seed);
        set(&mut s.workers, &self.workers);
        set(&mut s.work, &self.work);
        set(&mut s.output_file, &self.output_file);
        set(&mut s.configuration, &self.configuration);
        set(&mut s.framework, &self.framework);
        set(&mut s.agents, &self.agents);
        set(&mut s.trace_level, &self.trace_level);
        set(&mut s.config_file, &self.config_file);

        s.stop_on_error |= self.stop_on_error;
        s.skip_non_test_assemblies |= self.skip_non_test_assemblies;
        s.no_results |= self.no_results;
        s.teamcity |= self.teamcity;
        s.no_header |= self.no_header;
        s.no_color |= self.no_color;
        s.x86 |= self.x86;
        s.dispose_runners |= self.dispose_runners;
        s.shadow_copy |= self.shadow_copy;

        if let Some(labels) = self.labels {
            s.labels = labels;
        }
        if let Some(process) = self.process {
            s.process = process;
        }
        if let Some(domain) = self.app_domain_usage {
            s.app_domain_usage = domain;
        }
        if !self.results.is_empty() {
            s.results = self.results.clone();
        }
        for (key, value) in &self.params {
            s.params.insert(key.clone(), value.clone());
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
