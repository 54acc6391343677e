//! End-to-end tests for the drift-gen binary and the populate layer.

use drift_core::DriftConfig;
use drift_populate::{validate_output, GenerationProfile, OutputFormat, Populator};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/drift_config.yaml")
}

fn drift_gen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_drift-gen"))
}

#[test]
fn test_generate_csv_from_fixture() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let output = drift_gen()
        .args(["generate", "--config"])
        .arg(fixture())
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    assert!(validate_output(&out, OutputFormat::Csv, 5).is_empty());

    let header = |day: u32| {
        let content = std::fs::read_to_string(out.join(format!("{day}.csv"))).unwrap();
        content.lines().next().unwrap().to_string()
    };
    assert_eq!(header(0), "id,amount,quantity,ratio,category,description");
    assert_eq!(header(4), "id,amount_cents,quantity,ratio,category,description");

    let profile = GenerationProfile::read_from(&out).unwrap();
    assert_eq!(profile.config.seed, 1234);
    assert_eq!(profile.run.days_completed, 5);
    assert_eq!(profile.populate.files_written, 5);
    assert_eq!(profile.run.total_rows, profile.populate.rows_written);
}

#[test]
fn test_cli_overrides_and_validate() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let status = drift_gen()
        .args(["generate", "--format", "jsonl", "--num-days", "3", "--rows-per-day", "15"])
        .arg("-o")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let status = drift_gen()
        .args(["validate", "--format", "jsonl", "--num-days", "3", "-o"])
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let status = drift_gen()
        .args(["validate", "--format", "jsonl", "--num-days", "4", "-o"])
        .arg(&out)
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let output = drift_gen()
        .args(["generate", "--dry-run", "--num-days", "4"])
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("TOTAL"));
    assert!(!out.exists());
}

#[test]
fn test_sample_config_round_trips() {
    let output = drift_gen().arg("sample-config").output().unwrap();
    assert!(output.status.success());

    let yaml = String::from_utf8(output.stdout).unwrap();
    let config = DriftConfig::from_yaml(&yaml).unwrap();
    assert_eq!(config, DriftConfig::with_default_columns());
}

#[test]
fn test_generate_from_json_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("drift.json");
    std::fs::write(
        &config_path,
        r#"{
  "seed": 5,
  "num_days": 2,
  "approx_rows_per_day": 8,
  "columns": [
    {"name": "id", "data_type": "integer", "distribution": 1},
    {"name": "score", "data_type": "float", "distribution": ["normal"],
     "transition_percentage": 0.5, "transition_type": ["schema_name"]}
  ]
}"#,
    )
    .unwrap();
    let out = temp_dir.path().join("out");

    let output = drift_gen()
        .args(["generate", "--config"])
        .arg(&config_path)
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(validate_output(&out, OutputFormat::Csv, 2).is_empty());

    let content = std::fs::read_to_string(out.join("1.csv")).unwrap();
    assert_eq!(content.lines().next().unwrap(), "id,new-score");
}

#[test]
fn test_unsupported_config_extension_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("drift.toml");
    std::fs::write(&config_path, "seed = 5\n").unwrap();

    let output = drift_gen()
        .args(["generate", "--config"])
        .arg(&config_path)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains(".json"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.yaml");
    std::fs::write(
        &config_path,
        "columns:\n  - name: a\n    data_type: integer\n    transition_type: 1\n",
    )
    .unwrap();

    let output = drift_gen()
        .args(["generate", "--config"])
        .arg(&config_path)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown transition_type bits"));
}

#[test]
fn test_start_day_matches_full_run() {
    let temp_dir = TempDir::new().unwrap();
    let config = DriftConfig::from_file(fixture()).unwrap();

    let full = temp_dir.path().join("full");
    Populator::new(config.clone(), OutputFormat::Json, &full)
        .populate()
        .unwrap();

    let partial = temp_dir.path().join("partial");
    Populator::new(config, OutputFormat::Json, &partial)
        .with_start_day(3)
        .populate()
        .unwrap();

    let issues = validate_output(&partial, OutputFormat::Json, 5);
    assert_eq!(issues.len(), 3);
    for day in 3..5 {
        let name = format!("{day}.json");
        assert_eq!(
            std::fs::read(full.join(&name)).unwrap(),
            std::fs::read(partial.join(&name)).unwrap(),
            "day {day}"
        );
    }
}

#[test]
fn test_same_seed_same_bytes_across_formats() {
    let temp_dir = TempDir::new().unwrap();
    let config = DriftConfig::from_file(fixture()).unwrap();

    for format in [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl] {
        let a = temp_dir.path().join(format!("a-{format}"));
        let b = temp_dir.path().join(format!("b-{format}"));
        Populator::new(config.clone(), format, &a).populate().unwrap();
        Populator::new(config.clone(), format, &b).populate().unwrap();

        for day in 0..config.num_days {
            let name = format.file_name(day);
            assert_eq!(
                std::fs::read(a.join(&name)).unwrap(),
                std::fs::read(b.join(&name)).unwrap(),
                "{name}"
            );
        }
    }
}
