use std::process::Command;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rusty_snn_stats"))
}

#[test]
fn test_cli_report() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.json");

    let output = cli()
        .args(["-N", "4", "-T", "200.0", "--firing-rate", "0.1", "--jitter", "0.0"])
        .args(["--normalization", "energy", "--seed", "5"])
        .arg("--report")
        .arg(&report)
        .arg("--log-dir")
        .arg(dir.path().join("log"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["num_trials"], 4);
    assert_eq!(json["normalization"], "energy");
    assert_eq!(json["binning"]["num_bins"], 200);
    assert!((json["correlation"].as_f64().unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn test_cli_error_is_displayed() {
    let dir = tempfile::tempdir().unwrap();

    let output = cli()
        .args(["--normalization", "zscore"])
        .arg("--log-dir")
        .arg(dir.path().join("log"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Invalid argument: Unknown normalization 'zscore'"));
    assert!(!stderr.contains("InvalidArgument("));
}
