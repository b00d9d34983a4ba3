use super::*;
use clap::CommandFactory;
use clap::Parser;
use softnunit_core::{LabelMode, Params, ResultSpec, RunSettings, TraceLevel};

#[test]
fn cli_debug_assert() {
    Cli::command().debug_assert();
}

fn parse_run(argv: &[&str]) -> RunArgs {
    let cli = Cli::try_parse_from(argv).expect("parse should succeed");
    match cli.cmd {
        Command::Run(args) => args,
        _ => panic!("expected Command::Run"),
    }
}

#[test]
fn run_requires_assemblies_or_pattern() {
    assert!(Cli::try_parse_from(["softnunit", "run"]).is_err());
    assert!(Cli::try_parse_from(["softnunit", "run", "a.dll", "--pattern", "*.dll"]).is_err());
}

#[test]
fn run_parses_console_options() {
    let args = parse_run(&[
        "softnunit",
        "run",
        "a.dll",
        "b.dll",
        "--timeout",
        "500",
        "--seed",
        "-7",
        "--result",
        "out/r.xml;format=nunit3",
        "--labels",
        "All",
        "--trace",
        "verbose",
        "--param",
        "env=ci",
        "--param",
        "url=http://x/?a=b",
        "--nocolor",
    ]);
    assert_eq!(args.assemblies.len(), 2);
    assert_eq!(args.timeout, Some(500));
    assert_eq!(args.seed, Some(-7));
    assert_eq!(
        args.results,
        vec![ResultSpec::new("out/r.xml").with_format("nunit3")]
    );
    assert_eq!(args.labels, Some(LabelMode::All));
    assert_eq!(args.trace_level, Some(TraceLevel::Verbose));
    assert_eq!(
        args.params,
        vec![
            ("env".to_string(), "ci".to_string()),
            ("url".to_string(), "http://x/?a=b".to_string()),
        ]
    );
    assert!(args.no_color);
}

#[test]
fn bad_param_is_rejected() {
    assert!(Cli::try_parse_from(["softnunit", "run", "a.dll", "--param", "novalue"]).is_err());
    assert!(Cli::try_parse_from(["softnunit", "run", "a.dll", "--param", "=v"]).is_err());
}

#[test]
fn flags_override_file_settings() {
    let mut settings = RunSettings {
        timeout: Some(1),
        test: Some("FromFile".into()),
        results: vec![ResultSpec::new("file.xml")],
        params: [("env", "local"), ("keep", "yes")].into_iter().collect(),
        no_header: true,
        ..Default::default()
    };
    let args = parse_run(&[
        "softnunit",
        "run",
        "a.dll",
        "--timeout",
        "2",
        "--result",
        "cli.xml",
        "--param",
        "env=ci",
    ]);
    args.apply(&mut settings);

    assert_eq!(settings.timeout, Some(2));
    assert_eq!(settings.test.as_deref(), Some("FromFile"));
    assert_eq!(settings.results, vec![ResultSpec::new("cli.xml")]);
    let expected: Params = [("env", "ci"), ("keep", "yes")].into_iter().collect();
    assert_eq!(settings.params, expected);
    assert!(settings.no_header, "switches from the file stay on");
}

#[test]
fn non_passing_requires_a_report() {
    assert!(Cli::try_parse_from(["softnunit", "non-passing"]).is_err());
    let cli = Cli::try_parse_from(["softnunit", "non-passing", "r.xml", "--format", "json"])
        .expect("parse should succeed");
    match cli.cmd {
        Command::NonPassing(args) => assert_eq!(args.format, OutputFormat::Json),
        _ => panic!("expected Command::NonPassing"),
    }
}
