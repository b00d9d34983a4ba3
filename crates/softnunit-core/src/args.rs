//! Command-line construction for the NUnit 3 console.
//!
//! [`build_arguments`] is a pure function of its inputs: the same assemblies,
//! settings and working directory always produce the same token sequence, in
//! a fixed order.

use std::fmt;
use std::path::Path;

use crate::environment::Environment;
use crate::error::{SoftRunError, SoftRunResult};
use crate::settings::RunSettings;
use crate::TOOL_NAME;

/// One command-line token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessArgument {
    Text(String),
    /// Always wrapped in double quotes when rendered.
    Quoted(String),
}

impl ProcessArgument {
    /// Raw value as handed to the OS.
    pub fn value(&self) -> &str {
        match self {
            Self::Text(v) | Self::Quoted(v) => v,
        }
    }
}

impl fmt::Display for ProcessArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quoted(v) => write!(f, "\"{v}\""),
            Self::Text(v) if v.chars().any(char::is_whitespace) => write!(f, "\"{v}\""),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Ordered list of command-line tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList {
    args: Vec<ProcessArgument>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(ProcessArgument::Text(value.into()));
        self
    }

    pub fn append_quoted(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(ProcessArgument::Quoted(value.into()));
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessArgument> {
        self.args.iter()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Raw token values, in order; this is the argv of the child process.
    pub fn values(&self) -> Vec<String> {
        self.args.iter().map(|a| a.value().to_string()).collect()
    }

    /// Display form, tokens joined by single spaces.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a ProcessArgument;
    type IntoIter = std::slice::Iter<'a, ProcessArgument>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

/// Build the console arguments for `assemblies` under `settings`.
///
/// Fails with [`SoftRunError::Config`] when result files are requested
/// together with `no_results`.
pub fn build_arguments<P: AsRef<Path>>(
    assemblies: &[P],
    settings: &RunSettings,
    env: &Environment,
) -> SoftRunResult<ArgumentList> {
    let abs = |p: &Path| env.absolute_string(p);
    let mut args = ArgumentList::new();

    for assembly in assemblies {
        args.append_quoted(abs(assembly.as_ref())?);
    }

    if let Some(test) = &settings.test {
        args.append(format!("--test={test}"));
    }
    if let Some(list) = &settings.test_list {
        args.append_quoted(format!("--testlist={}", abs(list)?));
    }
    if let Some(clause) = &settings.where_clause {
        args.append_quoted(format!("--where={clause}"));
    }
    if let Some(timeout) = settings.timeout {
        args.append(format!("--timeout={timeout}"));
    }
    if let Some(seed) = settings.seed {
        args.append(format!("--seed={seed}"));
    }
    if let Some(workers) = settings.workers {
        args.append(format!("--workers={workers}"));
    }
    if settings.stop_on_error {
        args.append("--stoponerror");
    }
    if settings.skip_non_test_assemblies {
        args.append("--skipnontestassemblies");
    }
    if let Some(work) = &settings.work {
        args.append_quoted(format!("--work={}", abs(work)?));
    }
    if let Some(out) = &settings.output_file {
        args.append_quoted(format!("--out={}", abs(out)?));
    }

    if settings.has_results() && settings.no_results {
        return Err(SoftRunError::Config {
            tool: TOOL_NAME.to_string(),
            message: "You can't specify both a results file and set no_results to true."
                .to_string(),
        });
    }

    if settings.has_results() {
        for result in &settings.results {
            let mut spec = abs(&result.path)?;
            if let Some(format) = &result.format {
                spec.push_str(";format=");
                spec.push_str(format);
            }
            if let Some(transform) = &result.transform {
                spec.push_str(";transform=");
                spec.push_str(&abs(transform)?);
            }
            args.append_quoted(format!("--result={spec}"));
        }
    } else if settings.no_results {
        args.append_quoted("--noresult");
    }

    if let Some(labels) = settings.labels.flag_value() {
        args.append(format!("--labels={labels}"));
    }
    if settings.teamcity {
        args.append("--teamcity");
    }
    if settings.no_header {
        args.append("--noheader");
    }
    if settings.no_color {
        args.append("--nocolor");
    }
    if let Some(configuration) = &settings.configuration {
        args.append_quoted(format!("--config={configuration}"));
    }
    if let Some(framework) = &settings.framework {
        args.append_quoted(format!("--framework={framework}"));
    }
    if settings.x86 {
        args.append("--x86");
    }
    if settings.dispose_runners {
        args.append("--dispose-runners");
    }
    if settings.shadow_copy {
        args.append("--shadowcopy");
    }
    if let Some(agents) = settings.agents {
        args.append(format!("--agents={agents}"));
    }
    if let Some(process) = settings.process.flag_value() {
        args.append(format!("--process={process}"));
    }
    if let Some(domain) = settings.app_domain_usage.flag_value() {
        args.append(format!("--domain={domain}"));
    }
    if let Some(level) = settings.trace_level {
        args.append(format!("--trace={}", level.flag_value()));
    }
    if let Some(config_file) = &settings.config_file {
        args.append_quoted(format!("--configfile={}", abs(config_file)?));
    }

    for (key, value) in settings.params.iter() {
        args.append_quoted(format!("--params={key}={value}"));
    }

    Ok(args)
}
