use softnunit_core::{
    Environment, Globber, Invocation, ProcessRunner, ResultSpec, RunOutcome, RunSettings,
    SoftRunError, SoftRunResult, SoftRunner, ToolLocator,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

struct FixedGlob(Vec<PathBuf>);

impl Globber for FixedGlob {
    fn files(&self, _pattern: &str) -> SoftRunResult<Vec<PathBuf>> {
        Ok(self.0.clone())
    }
}

struct FakeLocator;

impl ToolLocator for FakeLocator {
    fn locate(&self, candidates: &[&str], explicit: Option<&Path>) -> SoftRunResult<PathBuf> {
        Ok(explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/tools").join(candidates[0])))
    }
}

#[derive(Clone)]
struct RecordingProcess {
    exit_code: Option<i32>,
    calls: Rc<RefCell<Vec<Invocation>>>,
}

impl ProcessRunner for RecordingProcess {
    fn run(&self, invocation: &Invocation) -> SoftRunResult<Option<i32>> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok(self.exit_code)
    }
}

fn runner(files: Vec<PathBuf>, exit_code: Option<i32>) -> (SoftRunner, Rc<RefCell<Vec<Invocation>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let process = RecordingProcess {
        exit_code,
        calls: Rc::clone(&calls),
    };
    let runner = SoftRunner::new(
        Environment::new("/work"),
        Box::new(FixedGlob(files)),
        Box::new(FakeLocator),
        Box::new(process),
    );
    (runner, calls)
}

#[test]
fn pattern_without_matches_launches_nothing() {
    let (runner, calls) = runner(vec![], Some(0));
    let outcome = runner
        .run_pattern("src/**/*.Tests.dll", &RunSettings::default())
        .unwrap();
    assert_eq!(outcome, RunOutcome::NoMatches);
    assert!(calls.borrow().is_empty());
}

#[test]
fn empty_pattern_is_missing_argument() {
    let (runner, calls) = runner(vec![], Some(0));
    let err = runner.run_pattern("  ", &RunSettings::default()).unwrap_err();
    assert!(matches!(err, SoftRunError::MissingArgument { name: "pattern" }));
    assert!(calls.borrow().is_empty());
}

#[test]
fn pattern_matches_are_passed_to_the_console() {
    let (runner, calls) = runner(vec![PathBuf::from("/work/bin/a.Tests.dll")], Some(0));
    runner
        .run_pattern("bin/*.Tests.dll", &RunSettings::default())
        .unwrap();

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, PathBuf::from("/tools/nunit3-console.exe"));
    assert_eq!(calls[0].args.values(), vec!["/work/bin/a.Tests.dll"]);
}

#[test]
fn positive_exit_codes_are_soft_failures() {
    let (runner, _) = runner(vec![], Some(4));
    let outcome = runner.run(&["a.dll"], &RunSettings::default()).unwrap();
    assert_eq!(outcome, RunOutcome::Completed { exit_code: 4 });
}

#[test]
fn negative_exit_codes_fail_with_category() {
    let (runner, _) = runner(vec![], Some(-2));
    let err = runner.run(&["a.dll"], &RunSettings::default()).unwrap_err();
    assert_eq!(err.to_string(), "NUnit3: Invalid assembly (exit code -2).");
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn signal_termination_is_an_error() {
    let (runner, _) = runner(vec![], None);
    let err = runner.run(&["a.dll"], &RunSettings::default()).unwrap_err();
    assert!(matches!(err, SoftRunError::Terminated { .. }));
}

#[test]
fn conflicting_result_settings_never_launch() {
    let (runner, calls) = runner(vec![PathBuf::from("/work/a.dll")], Some(0));
    let settings = RunSettings {
        results: vec![ResultSpec::new("r.xml")],
        no_results: true,
        ..Default::default()
    };
    let err = runner.run_pattern("*.dll", &settings).unwrap_err();
    assert!(matches!(err, SoftRunError::Config { .. }));
    assert!(!err.is_invocation_failure());
    assert!(calls.borrow().is_empty());
}

#[test]
fn host_settings_shape_the_invocation() {
    let (runner, calls) = runner(vec![], Some(0));
    let mut settings = RunSettings {
        tool_path: Some(PathBuf::from("tools/nunit3-console.exe")),
        working_directory: Some(PathBuf::from("out")),
        timeout: Some(30),
        ..Default::default()
    };
    settings
        .environment
        .insert("NUNIT_ENV".to_string(), "ci".to_string());

    let plan = runner.plan(&["a.dll"], &settings).unwrap();
    assert_eq!(plan.program, PathBuf::from("/work/tools/nunit3-console.exe"));
    assert_eq!(plan.working_dir, Some(PathBuf::from("/work/out")));
    assert_eq!(
        plan.command_line(),
        "/work/tools/nunit3-console.exe \"/work/a.dll\" --timeout=30"
    );
    assert!(calls.borrow().is_empty(), "plan must not launch");

    runner.run(&["a.dll"], &settings).unwrap();
    let calls = calls.borrow();
    assert_eq!(calls[0].env.get("NUNIT_ENV").map(String::as_str), Some("ci"));
    assert_eq!(calls[0], plan);
}
