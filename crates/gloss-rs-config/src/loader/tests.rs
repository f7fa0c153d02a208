//! Tests for layered configuration loading.

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options rooted in a temp dir, without touching real system/user layers.
fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    let mut options = LayeredConfigOptions::new(cwd);
    options.system_config_path = None;
    options.user_config_path = None;
    options
}

#[test]
fn parse_minimal_config() {
    let config = GlossConfig::load_from_str("{}").expect("config");
    assert_eq!(config.options.msg_delimiter, ", ");
    assert_eq!(config.options.default_package, "DEFAULT");
    assert!(config.packages.is_empty());
}

#[test]
fn parse_packages_and_path_names() {
    let json5 = r#"{
        // Vietnamese package
        packages: {
            vi: {
                templates: { DEFAULT: "{path_name} không hợp lệ", required: "{path_name} là bắt buộc" },
                type_names: { number: "số" },
            },
        },
        path_names: { Users: { vi: { username: "tên đăng nhập", address: { country: "quốc gia" } } } },
        error_contexts: { minlength: { min_length: "properties.min" } },
    }"#;
    let config = GlossConfig::load_from_str(json5).expect("config");
    let vi = config.packages.get("vi").expect("vi");
    assert_eq!(
        vi.templates.as_ref().and_then(|set| set.get("required")),
        Some("{path_name} là bắt buộc")
    );
    assert_eq!(
        vi.type_names.as_ref().and_then(|names| names.get("number")),
        Some("số")
    );
    let names = config
        .path_names
        .get("Users")
        .and_then(|packages| packages.get("vi"))
        .expect("names");
    assert_eq!(names.resolve("address.country"), Some("quốc gia"));
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = GlossConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_non_string_template() {
    let err =
        GlossConfig::load_from_str(r#"{ packages: { en: { templates: { DEFAULT: 1 } } } }"#)
            .unwrap_err();
    assert!(format!("{err}").contains("packages.en.templates.DEFAULT"));
}

#[test]
fn rejects_empty_template_set() {
    let err = GlossConfig::load_from_str(r#"{ packages: { en: { templates: {} } } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("at least one template"));
}

#[test]
fn rejects_empty_default_package() {
    let err = GlossConfig::load_from_str(r#"{ options: { default_package: "" } }"#).unwrap_err();
    assert!(format!("{err}").contains("options.default_package"));
}

#[test]
fn layered_config_prefers_cwd_over_project() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("api");
    fs::create_dir_all(&cwd).expect("cwd");

    let user_config = root.join("user.json5");
    write_json5(
        &user_config,
        r#"{ options: { msg_delimiter: " | ", default_package: "en" } }"#,
    );
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ options: { msg_delimiter: "; " } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ options: { msg_delimiter: " / " } }"#,
    );

    let mut options = isolated_options(&cwd);
    options.user_config_path = Some(user_config);
    let layered = GlossConfig::load_layered_with_options(options).expect("layered");

    assert_eq!(layered.config.options.msg_delimiter, " / ");
    assert_eq!(layered.config.options.default_package, "en");
    let sources: Vec<_> = layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd
        ]
    );
}

#[test]
fn runtime_layer_overrides_everything() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("work");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ options: { upper_first: true, additional_error_fields: { code: "CWD" } } }"#,
    );
    let runtime = temp.path().join("runtime.json5");
    write_json5(
        &runtime,
        r#"{ options: { upper_first: false, additional_error_fields: { status: 422 } } }"#,
    );

    let options = isolated_options(&cwd).with_runtime_path(&runtime);
    let layered = GlossConfig::load_layered_with_options(options).expect("layered");
    let config = layered.config;

    assert!(!config.options.upper_first);
    assert_eq!(
        config.options.additional_error_fields.get("code"),
        Some(&json!("CWD"))
    );
    assert_eq!(
        config.options.additional_error_fields.get("status"),
        Some(&json!(422))
    );
    assert_eq!(
        layered.layers.last().map(|layer| layer.source),
        Some(ConfigLayerSource::Runtime)
    );
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_runtime_path(temp.path().join("nope.json5"));
    let err = GlossConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

#[test]
fn invalid_layer_reports_its_source() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        r#"{ options: { upper_first: "yes" } }"#,
    );
    let err = GlossConfig::load_layered_with_options(isolated_options(temp.path())).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("options.upper_first"));
}

#[test]
fn options_patch_merges_nested_fields() {
    let options = GlossOptions::default();
    let patched = options
        .patched(&json!({
            "msg_delimiter": "; ",
            "link_to_errors": null,
            "additional_error_fields": { "status": 422 },
        }))
        .expect("patched");

    assert_eq!(patched.msg_delimiter, "; ");
    assert_eq!(patched.link_to_errors, None);
    assert_eq!(
        patched.additional_error_fields.get("name"),
        Some(&json!("ValidationError"))
    );
    assert_eq!(
        patched.additional_error_fields.get("status"),
        Some(&json!(422))
    );
    assert_eq!(options.msg_delimiter, ", ");
}

#[test]
fn options_patch_rejects_unknown_key() {
    let err = GlossOptions::default()
        .patched(&json!({ "delimiter": "; " }))
        .unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}
