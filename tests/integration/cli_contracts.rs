use std::fs;
use std::path::PathBuf;

use dnodes::config::DnodesConfig;
use dnodes::error::ApiError;
use dnodes::grammar::GrammarKind;
use dnodes::tooling::cli::{CliContext, Commands};
use tempfile::TempDir;

const KEY_VALUE_DUMP: &str = "\
inode=1 full=10.00 type=ZFS directory
path=/srv
flags=USED_BYTES

inode=2 full=75.50 type=ZFS plain file
path=/srv/data.bin
maxblkid=3
";

fn context(temp_dir: &TempDir) -> CliContext {
    CliContext::with_config(
        DnodesConfig::default(),
        Some(temp_dir.path().join("store")),
    )
    .unwrap()
}

fn ingest_dump(cli: &CliContext, temp_dir: &TempDir) -> String {
    let input = temp_dir.path().join("dump.txt");
    fs::write(&input, KEY_VALUE_DUMP).unwrap();
    cli.execute(&Commands::Ingest {
        input: Some(input),
        grammar: None,
        format: "json".to_string(),
    })
    .unwrap()
}

#[test]
fn ingest_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    let output = ingest_dump(&cli, &temp_dir);

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["grammar"], "key-value");
    assert_eq!(parsed["records"], 2);
    assert_eq!(parsed["lines"], 7);
    assert!(parsed.get("started_at").and_then(|v| v.as_str()).is_some());
    assert!(parsed.get("finished_at").and_then(|v| v.as_str()).is_some());
}

#[test]
fn list_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    ingest_dump(&cli, &temp_dir);

    let output = cli
        .execute(&Commands::List {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["inode"], 1);
    assert_eq!(rows[0]["type"], "ZFS directory");
    assert_eq!(rows[0]["flags"], "USED_BYTES");
    assert!(rows[0]["maxblkid"].is_null());
    assert_eq!(rows[1]["full"], 75.5);
    assert_eq!(rows[1]["maxblkid"], 3);
    assert_eq!(rows[1]["path"], "/srv/data.bin");
    assert_eq!(rows[1]["path_hex"], hex::encode(b"/srv/data.bin"));
}

#[test]
fn show_and_find_resolve_the_same_record() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    ingest_dump(&cli, &temp_dir);

    let shown = cli
        .execute(&Commands::Show {
            inode: 2,
            format: "json".to_string(),
        })
        .unwrap();
    let found = cli
        .execute(&Commands::Find {
            path: PathBuf::from("/srv/data.bin"),
            format: "json".to_string(),
        })
        .unwrap();
    assert_eq!(shown, found);

    let text = cli
        .execute(&Commands::Show {
            inode: 1,
            format: "text".to_string(),
        })
        .unwrap();
    assert!(text.contains("ZFS directory"));
    assert!(text.contains("/srv"));
}

#[test]
fn missing_records_are_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);

    let err = cli
        .execute(&Commands::Show {
            inode: 42,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = cli
        .execute(&Commands::Find {
            path: PathBuf::from("/nowhere"),
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn configured_grammar_is_used_when_flag_is_absent() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = DnodesConfig::default();
    config.ingest.grammar = GrammarKind::Zdb;
    let cli = CliContext::with_config(config, Some(temp_dir.path().join("store"))).unwrap();

    let input = temp_dir.path().join("zdb.txt");
    fs::write(
        &input,
        "         8    1   128K    512      0     512    512  100.00  ZFS plain file\n\tpath\t/etc/hostname\n",
    )
    .unwrap();
    let output = cli
        .execute(&Commands::Ingest {
            input: Some(input),
            grammar: None,
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.contains("Ingested 1 dnodes"));
    assert!(output.contains("zdb grammar"));
}

#[test]
fn unknown_output_format_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let cli = context(&temp_dir);
    let err = cli
        .execute(&Commands::List {
            format: "yaml".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
}

#[test]
fn config_file_supplies_store_and_grammar() {
    let temp_dir = TempDir::new().unwrap();
    let store_dir = temp_dir.path().join("configured-store");
    let config_file = temp_dir.path().join("config.toml");
    fs::write(
        &config_file,
        format!(
            "[storage]\nstore_path = '{}'\n\n[ingest]\ngrammar = \"zdb\"\n",
            store_dir.display()
        ),
    )
    .unwrap();

    let cli = CliContext::new(None, Some(config_file)).unwrap();
    let input = temp_dir.path().join("zdb.txt");
    fs::write(
        &input,
        "        34    1   128K  1.50K     4K     512  1.50K  100.00  ZFS directory\n\tpath\t/home\n",
    )
    .unwrap();
    cli.execute(&Commands::Ingest {
        input: Some(input),
        grammar: None,
        format: "text".to_string(),
    })
    .unwrap();

    let found = cli
        .execute(&Commands::Find {
            path: PathBuf::from("/home"),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&found).unwrap();
    assert_eq!(parsed["inode"], 34);
    assert!(store_dir.exists());
}
