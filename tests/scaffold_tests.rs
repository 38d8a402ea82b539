//! End-to-end scaffolding tests
//!
//! Wizard, validation, template resolution and generation against the
//! built-in template library and small in-memory libraries.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;
use walkdir::WalkDir;

use scaffold::commands::{execute_new, NewOptions};
use scaffold::{
    embedded, ActionDescription, Answer, Config, ContainerPreset, DirectoryRegistry, Generator,
    MemoryStore, MetadataCollector, ParamType, Parameter, RuntimeType, ScaffoldError,
    ScriptedForm, TemplateResolver,
};

/// Relative paths of every file below `dir`
fn files_below(dir: &Path) -> BTreeSet<String> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn read_definition(dir: &Path) -> serde_yaml::Value {
    let content = std::fs::read_to_string(dir.join("action.yaml")).unwrap();
    serde_yaml::from_str(&content).unwrap()
}

fn batch_config(output: &Path) -> Config {
    Config {
        output: output.to_path_buf(),
        interactive: false,
        ..Default::default()
    }
}

fn shell_store() -> MemoryStore {
    MemoryStore::new()
        .with_file(
            "definition/action.yaml.tmpl",
            "{{#*inline \"action\"}}\naction:\n  title: {{yaml title}}\n{{/inline}}",
        )
        .with_file(
            "definition/shell.yaml.tmpl",
            "{{#*inline \"runtime\"}}\nruntime:\n  type: shell\n{{/inline}}",
        )
        .with_file("files/shell/main.sh.tmpl", "echo {{id}}\n")
        .with_file("files/shell/lib/util.sh.tmpl", "# util for {{id}}\n")
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

mod scenario_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shell_action_with_unsafe_id() {
        let temp = TempDir::new().unwrap();
        let config = batch_config(temp.path());

        let dir = execute_new(
            NewOptions {
                id: Some("My Action!".to_string()),
                title: Some("My Action".to_string()),
                runtime: Some(RuntimeType::Shell),
                yes: true,
                ..Default::default()
            },
            &config,
        )
        .unwrap();

        assert_eq!(dir, temp.path().join("actions").join("My-Action"));
        assert_eq!(
            files_below(&dir),
            set(&["README.md", "action.yaml", "main.sh"])
        );

        let definition = read_definition(&dir);
        assert_eq!(definition["runtime"]["type"].as_str(), Some("shell"));
        assert_eq!(definition["action"]["title"].as_str(), Some("My Action"));
    }

    #[test]
    fn test_container_py_action_with_integer_argument() {
        let temp = TempDir::new().unwrap();
        let existing: HashSet<String> = HashSet::new();

        let mut values = ActionDescription::new("counter", "Counter", RuntimeType::Container)
            .with_preset(ContainerPreset::Py);
        values.arguments.push(Parameter {
            name: "count".to_string(),
            title: "Count".to_string(),
            param_type: ParamType::Integer,
            required: true,
            default: json!(5),
            ..Default::default()
        });

        let values = MetadataCollector::new(&existing)
            .collect(values, None)
            .unwrap();
        let store = embedded::builtin();
        let dir = Generator::new(temp.path(), &store).generate(&values).unwrap();

        let content = std::fs::read_to_string(dir.join("action.yaml")).unwrap();
        assert!(content.contains("default: 5\n"), "{}", content);
        assert!(!content.contains("5.0"), "{}", content);

        let definition = read_definition(&dir);
        let arguments = definition["action"]["arguments"].as_sequence().unwrap();
        assert_eq!(arguments.len(), 1);
        assert_eq!(arguments[0]["name"].as_str(), Some("count"));
        assert_eq!(arguments[0]["default"].as_i64(), Some(5));
        assert_eq!(arguments[0]["required"].as_bool(), Some(true));
        assert_eq!(
            definition["runtime"]["image"].as_str(),
            Some("counter:latest")
        );

        assert_eq!(
            files_below(&dir),
            set(&[
                "Dockerfile",
                "README.md",
                "action.yaml",
                "action/__init__.py",
                "main.py",
                "requirements.txt",
            ])
        );
    }

    #[test]
    fn test_number_defaults_render_like_typed() {
        let temp = TempDir::new().unwrap();
        let existing: HashSet<String> = HashSet::new();

        let mut values = ActionDescription::new("ratio", "Ratio", RuntimeType::Shell);
        for (name, raw) in [("whole", "5"), ("half", "1.5"), ("zero", "0")] {
            values.options.push(Parameter {
                name: name.to_string(),
                param_type: ParamType::Number,
                default: scaffold::validate::coerce(raw, ParamType::Number, None).unwrap(),
                ..Default::default()
            });
        }

        let values = MetadataCollector::new(&existing)
            .collect(values, None)
            .unwrap();
        let store = embedded::builtin();
        let dir = Generator::new(temp.path(), &store).generate(&values).unwrap();

        let content = std::fs::read_to_string(dir.join("action.yaml")).unwrap();
        assert!(content.contains("default: 5\n"), "{}", content);
        assert!(content.contains("default: 1.5\n"), "{}", content);
        assert!(content.contains("default: 0.0\n"), "{}", content);
        assert!(!content.contains("5.0"), "{}", content);
    }

    #[test]
    fn test_plugin_goes_below_plugins() {
        let temp = TempDir::new().unwrap();
        let config = batch_config(temp.path());

        let dir = execute_new(
            NewOptions {
                id: Some("lint".to_string()),
                title: Some("Lint".to_string()),
                runtime: Some(RuntimeType::Plugin),
                yes: true,
                ..Default::default()
            },
            &config,
        )
        .unwrap();

        assert_eq!(dir, temp.path().join("plugins").join("lint"));
        assert_eq!(
            read_definition(&dir)["runtime"]["type"].as_str(),
            Some("plugin")
        );
    }

    #[test]
    fn test_existing_action_is_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let config = batch_config(temp.path());
        let options = NewOptions {
            id: Some("deploy".to_string()),
            runtime: Some(RuntimeType::Shell),
            yes: true,
            ..Default::default()
        };

        execute_new(options.clone(), &config).unwrap();
        let err = execute_new(options, &config).unwrap_err();
        assert!(err.to_string().contains("not valid"), "{}", err);

        let found = DirectoryRegistry::new(temp.path()).discover().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "deploy");
    }
}

// =============================================================================
// Template resolution
// =============================================================================

mod resolution_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_container_presets_share_base_only() {
        let store = embedded::builtin();
        let resolver = TemplateResolver::new(&store);

        let base: BTreeSet<PathBuf> = resolver
            .files_templates("container")
            .unwrap()
            .targets()
            .iter()
            .map(|name| PathBuf::from(name.trim_end_matches(".tmpl")))
            .collect();
        assert!(!base.is_empty());

        let go: BTreeSet<PathBuf> = resolver
            .resolve_files(RuntimeType::Container, ContainerPreset::Go)
            .unwrap()
            .output_paths()
            .into_iter()
            .collect();
        let py: BTreeSet<PathBuf> = resolver
            .resolve_files(RuntimeType::Container, ContainerPreset::Py)
            .unwrap()
            .output_paths()
            .into_iter()
            .collect();

        assert!(base.is_subset(&go));
        assert!(base.is_subset(&py));
        assert_ne!(go, py);

        let go_only: BTreeSet<_> = go.difference(&base).collect();
        let py_only: BTreeSet<_> = py.difference(&base).collect();
        assert!(!go_only.is_empty());
        assert!(!py_only.is_empty());
        assert!(go_only.is_disjoint(&py_only));
    }

    #[test]
    fn test_definition_is_stable() {
        let store = embedded::builtin();
        let resolver = TemplateResolver::new(&store);
        let mut values = ActionDescription::new("demo", "Demo", RuntimeType::Container);
        values.aliases = vec!["d".to_string()];
        values.runtime.container.image = "demo:1".to_string();

        let first = resolver
            .definition_template(RuntimeType::Container)
            .unwrap()
            .render_to_string("action.yaml", &values)
            .unwrap();
        let second = resolver
            .definition_template(RuntimeType::Container)
            .unwrap()
            .render_to_string("action.yaml", &values)
            .unwrap();
        assert_eq!(first, second);

        let parsed: serde_yaml::Value = serde_yaml::from_str(&first).unwrap();
        assert_eq!(parsed["runtime"]["image"].as_str(), Some("demo:1"));
        assert_eq!(parsed["action"]["alias"][0].as_str(), Some("d"));
    }
}

// =============================================================================
// Rollback
// =============================================================================

mod rollback_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn demo() -> ActionDescription {
        ActionDescription::new("demo", "Demo", RuntimeType::Shell)
    }

    fn assert_no_action(root: &Path) {
        assert!(!root.join("demo").exists(), "action directory was left behind");
    }

    #[test]
    fn test_directory_creation_failure() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("not-a-dir");
        std::fs::write(&root, "file").unwrap();

        let store = shell_store();
        let err = Generator::new(&root, &store).generate(&demo()).unwrap_err();
        assert!(matches!(err, ScaffoldError::CreateDir { .. }), "{:?}", err);
    }

    #[test]
    fn test_definition_render_failure() {
        let temp = TempDir::new().unwrap();
        let store = shell_store().with_file(
            "definition/shell.yaml.tmpl",
            "{{#*inline \"runtime\"}}\n{{missing_helper id}}\n{{/inline}}",
        );

        assert!(Generator::new(temp.path(), &store).generate(&demo()).is_err());
        assert_no_action(temp.path());
    }

    #[test]
    fn test_missing_definition_fragment() {
        let temp = TempDir::new().unwrap();
        let store = shell_store();
        let values = ActionDescription::new("demo", "Demo", RuntimeType::Plugin);

        let err = Generator::new(temp.path(), &store)
            .generate(&values)
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateNotFound(_)), "{:?}", err);
        assert_no_action(temp.path());
    }

    #[test]
    fn test_nested_file_render_failure() {
        let temp = TempDir::new().unwrap();
        let store = shell_store().with_file("files/shell/lib/broken.sh.tmpl", "{{missing_helper id}}");

        assert!(Generator::new(temp.path(), &store).generate(&demo()).is_err());
        assert_no_action(temp.path());
    }

    #[test]
    fn test_file_clashing_with_directory() {
        let temp = TempDir::new().unwrap();
        let store = shell_store().with_file("files/shell/lib.tmpl", "clash");

        let err = Generator::new(temp.path(), &store)
            .generate(&demo())
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::WriteFile { .. }), "{:?}", err);
        assert_no_action(temp.path());
    }

    #[test]
    fn test_pre_existing_directory_is_kept() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join("demo");
        std::fs::create_dir_all(&existing).unwrap();
        std::fs::write(existing.join("notes.txt"), "mine").unwrap();

        let store = shell_store().with_file("files/shell/z.tmpl", "{{missing_helper id}}");
        assert!(Generator::new(temp.path(), &store).generate(&demo()).is_err());

        assert_eq!(
            std::fs::read_to_string(existing.join("notes.txt")).unwrap(),
            "mine"
        );
    }

    #[test]
    fn test_nested_layout_is_mirrored() {
        let temp = TempDir::new().unwrap();
        let store = shell_store();

        let dir = Generator::new(temp.path(), &store).generate(&demo()).unwrap();
        assert_eq!(
            files_below(&dir),
            set(&["action.yaml", "lib/util.sh", "main.sh"])
        );
        assert_eq!(
            std::fs::read_to_string(dir.join("lib/util.sh")).unwrap(),
            "# util for demo\n"
        );
    }
}

// =============================================================================
// Validation before any filesystem change
// =============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_invalid_ids_create_nothing() {
        for id in ["", "123", "_private", "!!"] {
            let temp = TempDir::new().unwrap();
            let config = batch_config(temp.path());

            let result = execute_new(
                NewOptions {
                    id: Some(id.to_string()),
                    yes: true,
                    ..Default::default()
                },
                &config,
            );

            // "!!" sanitizes to the fallback ID and is accepted
            if id == "!!" {
                assert!(result.unwrap().ends_with("action"));
                continue;
            }
            assert!(result.is_err(), "{:?} should be rejected", id);
            assert!(!temp.path().join("actions").exists());
        }
    }

    #[test]
    fn test_invalid_parameter_creates_nothing() {
        let existing: HashSet<String> = HashSet::new();
        let mut values = ActionDescription::new("ok", "Ok", RuntimeType::Shell);
        values.options.push(Parameter {
            name: "has space".to_string(),
            ..Default::default()
        });

        let err = MetadataCollector::new(&existing)
            .collect(values, None)
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::Validation(_)));
    }
}

// =============================================================================
// Wizard driven generation
// =============================================================================

mod wizard_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scripted_wizard_to_disk() {
        let temp = TempDir::new().unwrap();
        let registry = DirectoryRegistry::new(temp.path());
        let collector = MetadataCollector::new(&registry);

        let mut form = ScriptedForm::new([
            Answer::text("Greet"),
            Answer::text("Say hello"),
            Answer::text("hi, hi, hello"),
            Answer::choice("Shell"),
            Answer::Default,
            Answer::Confirm(true),
            Answer::text("name"),
            Answer::text("Name"),
            Answer::text(""),
            Answer::choice("String"),
            Answer::choice("No"),
            Answer::text("world"),
            Answer::Confirm(false),
            Answer::Confirm(false),
            Answer::text("GREETING=hello"),
        ]);

        let values = collector
            .collect(ActionDescription::default(), Some(&mut form))
            .unwrap();
        assert_eq!(values.aliases, vec!["hi", "hello"]);

        let store = embedded::builtin();
        let root = temp.path().join("actions");
        let dir = Generator::new(&root, &store).generate(&values).unwrap();

        let definition = read_definition(&dir);
        assert_eq!(definition["action"]["title"].as_str(), Some("Greet"));
        assert_eq!(
            definition["action"]["arguments"][0]["default"].as_str(),
            Some("world")
        );
        assert_eq!(
            definition["runtime"]["env"][0].as_str(),
            Some("GREETING=hello")
        );
        let script = definition["runtime"]["script"].as_str().unwrap();
        assert!(script.contains("{{ .name }}"), "{}", script);

        // the registry sees the new action right away
        let mut again = ScriptedForm::new([
            Answer::text("Greet"),
            Answer::text(""),
            Answer::text(""),
            Answer::choice("Shell"),
            Answer::Default,
            Answer::text("greet2"),
            Answer::Confirm(false),
            Answer::Confirm(false),
            Answer::text(""),
        ]);
        let second = collector
            .collect(ActionDescription::default(), Some(&mut again))
            .unwrap();
        assert_eq!(second.id, "greet2");
        assert_eq!(again.rejected()[0].0, "Greet");
    }

    #[test]
    fn test_abort_leaves_no_directory() {
        let temp = TempDir::new().unwrap();
        let registry = DirectoryRegistry::new(temp.path());
        let collector = MetadataCollector::new(&registry);
        let mut form = ScriptedForm::new([
            Answer::text("Greet"),
            Answer::text(""),
            Answer::text(""),
            Answer::choice("Container"),
            Answer::Abort,
        ]);

        let err = collector
            .collect(ActionDescription::default(), Some(&mut form))
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::Aborted));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
