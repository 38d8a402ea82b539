//! @acp:module "Template Renderer"
//! @acp:summary "Handlebars registry setup and streaming of templates to files"
//! @acp:domain cli
//! @acp:layer output

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde::Serialize;

use crate::error::{Result, ScaffoldError};

/// Suffix stripped from template names to get output file names
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

// Values go into YAML and source files, so JSON encoding doubles as a safe
// YAML flow scalar/sequence.
handlebars_helper!(yaml: |v: Json| serde_json::to_string(v).unwrap_or_default());

// Placeholder resolved by the action host at run time, e.g. `{{ .count }}`.
handlebars_helper!(var_ref: |name: str| format!("{{{{ .{} }}}}", name));

/// Fresh registry with the scaffold helpers and escaping disabled
pub fn new_registry() -> Handlebars<'static> {
    let mut registry = Handlebars::new();
    registry.register_escape_fn(no_escape);
    registry.register_helper("yaml", Box::new(yaml));
    registry.register_helper("var_ref", Box::new(var_ref));
    registry
}

/// @acp:summary "A set of parsed templates sharing one registry"
///
/// `targets` are the registered names that produce an output file; any other
/// registered template is only reachable as a partial.
pub struct CompiledTemplates {
    registry: Handlebars<'static>,
    targets: Vec<String>,
}

impl CompiledTemplates {
    pub fn new(registry: Handlebars<'static>, targets: Vec<String>) -> Self {
        Self { registry, targets }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Render one target to a string
    pub fn render_to_string<T: Serialize>(&self, name: &str, model: &T) -> Result<String> {
        Ok(self.registry.render(name, model)?)
    }
}

impl std::fmt::Debug for CompiledTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTemplates")
            .field("targets", &self.targets)
            .finish()
    }
}

/// Output file name for a template name (`main.sh.tmpl` -> `main.sh`)
pub fn output_name(template_name: &str) -> &str {
    template_name
        .strip_suffix(TEMPLATE_SUFFIX)
        .unwrap_or(template_name)
}

/// Render every target into `output_dir`, one file per target.
///
/// Fails on the first template that errors. A partially written file stays on
/// disk; cleaning it up is the generator's job.
pub fn render<T: Serialize>(
    output_dir: &Path,
    model: &T,
    templates: &CompiledTemplates,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(templates.targets.len());

    for name in &templates.targets {
        let path = output_dir.join(output_name(name));
        let file = File::create(&path).map_err(|source| ScaffoldError::WriteFile {
            path: path.clone(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        templates.registry.render_to_write(name, model, &mut writer)?;
        writer.flush().map_err(|source| ScaffoldError::WriteFile {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Rendered {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn compiled(templates: &[(&str, &str)]) -> CompiledTemplates {
        let mut registry = new_registry();
        let mut targets = Vec::new();
        for (name, body) in templates {
            registry.register_template_string(name, body).unwrap();
            targets.push(name.to_string());
        }
        CompiledTemplates::new(registry, targets)
    }

    #[test]
    fn test_output_name() {
        assert_eq!(output_name("main.sh.tmpl"), "main.sh");
        assert_eq!(output_name("Dockerfile.tmpl"), "Dockerfile");
        assert_eq!(output_name("action.yaml"), "action.yaml");
    }

    #[test]
    fn test_helpers() {
        let t = compiled(&[("t", "{{yaml name}} {{yaml n}} {{yaml list}} {{var_ref arg}}")]);
        let out = t
            .render_to_string(
                "t",
                &json!({"name": "a \"b\"", "n": 0.0, "list": [1, 2], "arg": "count"}),
            )
            .unwrap();
        assert_eq!(out, r#""a \"b\"" 0.0 [1,2] {{ .count }}"#);
    }

    #[test]
    fn test_no_html_escaping() {
        let t = compiled(&[("t", "{{value}}")]);
        let out = t.render_to_string("t", &json!({"value": "<a & b>"})).unwrap();
        assert_eq!(out, "<a & b>");
    }

    #[test]
    fn test_render_writes_files() {
        let temp = TempDir::new().unwrap();
        let t = compiled(&[
            ("README.md.tmpl", "# {{title}}\n"),
            ("main.sh.tmpl", "echo {{id}}\n"),
        ]);

        let written = render(temp.path(), &json!({"title": "Demo", "id": "demo"}), &t).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(
            std::fs::read_to_string(temp.path().join("README.md")).unwrap(),
            "# Demo\n"
        );
        assert_eq!(
            std::fs::read_to_string(temp.path().join("main.sh")).unwrap(),
            "echo demo\n"
        );
    }

    #[test]
    fn test_render_fails_fast() {
        let temp = TempDir::new().unwrap();
        let t = compiled(&[
            ("a.txt.tmpl", "{{missing_helper id}}"),
            ("b.txt.tmpl", "never"),
        ]);

        let err = render(temp.path(), &json!({"id": "x"}), &t).unwrap_err();
        assert!(matches!(err, ScaffoldError::Render(_)));
        assert!(!temp.path().join("b.txt").exists());
    }
}
