//! @acp:module "Metadata Collector"
//! @acp:summary "Wizard that fills in an action description, plus final validation"
//! @acp:domain cli
//! @acp:layer service
//!
//! The wizard is a fixed list of [`Step`]s. Each step carries a visibility
//! predicate evaluated against the in-progress description right before the
//! step would run, so later groups can depend on earlier answers (the
//! container group only shows up once the runtime is `container`).
//!
//! Final validation runs whether or not the wizard ran and never touches the
//! filesystem.

pub mod form;
pub mod prompt;
pub mod scripted;

use std::collections::HashSet;

pub use form::{choose, Field, FieldValidator, FormEngine};
pub use prompt::TerminalForm;
pub use scripted::{Answer, ScriptedForm};

use crate::error::{Result, ScaffoldError};
use crate::model::{
    ActionDescription, ContainerPreset, ParamKind, ParamType, Parameter, RuntimeType,
    WORKING_DIRECTORIES,
};
use crate::registry::ActionRegistry;
use crate::validate::{
    coerce, sanitize_identifier, validate_action_id, validate_name, value_matches, zero_value,
};

/// Split comma-separated aliases, trim them, drop empties and collapse
/// adjacent duplicates. `"a, a, b"` gives `["a", "b"]`, `"a, b, a"` keeps all three.
pub fn parse_aliases(raw: &str) -> Vec<String> {
    let mut aliases: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    aliases.dedup();
    aliases
}

/// Keep the `KEY=VALUE` lines of a multi-line answer; anything else is dropped
pub fn parse_env_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| match line.split_once('=') {
            Some((key, _)) => !key.trim().is_empty(),
            None => false,
        })
        .map(str::to_string)
        .collect()
}

/// Comma-separated host entries, trimmed, empties dropped
pub fn parse_extra_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

type StepFn = fn(&dyn ActionRegistry, &mut dyn FormEngine, &mut ActionDescription) -> Result<()>;

/// @acp:summary "One group of wizard questions"
pub struct Step {
    pub name: &'static str,
    /// Evaluated right before the step would run
    pub visible: fn(&ActionDescription) -> bool,
    run: StepFn,
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

fn always(_: &ActionDescription) -> bool {
    true
}

fn has_runtime_config(values: &ActionDescription) -> bool {
    values.runtime_type() != RuntimeType::Plugin
}

const STEPS: &[Step] = &[
    Step {
        name: "core",
        visible: always,
        run: ask_core,
    },
    Step {
        name: "container",
        visible: ActionDescription::is_container,
        run: ask_container,
    },
    Step {
        name: "identity",
        visible: always,
        run: ask_identity,
    },
    Step {
        name: "arguments",
        visible: always,
        run: ask_arguments,
    },
    Step {
        name: "options",
        visible: always,
        run: ask_options,
    },
    Step {
        name: "runtime",
        visible: has_runtime_config,
        run: ask_runtime_config,
    },
];

/// @acp:summary "Drives the wizard and validates the result"
pub struct MetadataCollector<'r> {
    registry: &'r dyn ActionRegistry,
}

impl<'r> MetadataCollector<'r> {
    pub fn new(registry: &'r dyn ActionRegistry) -> Self {
        Self { registry }
    }

    /// The wizard steps in the order they run
    pub fn steps() -> &'static [Step] {
        STEPS
    }

    /// Fill in `values` and validate them.
    ///
    /// With `form` set to `None` no question is asked and the caller's values
    /// go straight to final validation.
    pub fn collect(
        &self,
        mut values: ActionDescription,
        form: Option<&mut dyn FormEngine>,
    ) -> Result<ActionDescription> {
        if let Some(form) = form {
            form.note("Describe the new action. Cancel at any prompt to abort.");
            for step in STEPS {
                if !(step.visible)(&values) {
                    tracing::debug!("Skipping wizard step '{}'", step.name);
                    continue;
                }
                tracing::debug!("Wizard step '{}'", step.name);
                (step.run)(self.registry, &mut *form, &mut values)?;
            }
        }

        self.validate(&mut values)?;
        Ok(values)
    }

    /// Final validation. Sanitizes the ID in place, fills parameter zero
    /// defaults and the container image default.
    pub fn validate(&self, values: &mut ActionDescription) -> Result<()> {
        values.id = check_id(self.registry, &values.id)?;

        for kind in [ParamKind::Argument, ParamKind::Option] {
            validate_params(values.params_mut(kind), kind)?;
        }

        if values.is_container() && values.runtime.container.image.trim().is_empty() {
            values.runtime.container.image = format!("{}:latest", values.id);
        }
        Ok(())
    }
}

/// Sanitized ID if it is valid and not taken
fn check_id(registry: &dyn ActionRegistry, raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(ScaffoldError::validation("action ID cannot be empty"));
    }

    let id = sanitize_identifier(raw);
    validate_action_id(&id)?;

    if registry.exists(&id) {
        return Err(ScaffoldError::validation(format!(
            "action '{}' already exists",
            id
        )));
    }
    Ok(id)
}

fn validate_params(params: &mut [Parameter], kind: ParamKind) -> Result<()> {
    let subject = format!("{} name", kind.singular());
    let mut seen = HashSet::new();

    for param in params.iter_mut() {
        validate_name(&subject, &param.name)?;
        if !seen.insert(param.name.to_lowercase()) {
            return Err(ScaffoldError::validation(format!(
                "duplicate {} '{}'",
                kind.singular(),
                param.name
            )));
        }

        match (param.param_type, param.items_type) {
            (ParamType::Array, None) => {
                return Err(ScaffoldError::validation(format!(
                    "array {} '{}' needs an items type",
                    kind.singular(),
                    param.name
                )))
            }
            (ParamType::Array, Some(ParamType::Array)) => {
                return Err(ScaffoldError::validation(format!(
                    "{} '{}': array items cannot themselves be arrays",
                    kind.singular(),
                    param.name
                )))
            }
            (ParamType::Array, Some(_)) | (_, None) => {}
            (_, Some(_)) => {
                return Err(ScaffoldError::validation(format!(
                    "{} '{}': items type is only allowed for arrays",
                    kind.singular(),
                    param.name
                )))
            }
        }

        if param.default.is_null() {
            param.default = zero_value(param.param_type);
        } else if !value_matches(&param.default, param.param_type, param.items_type) {
            return Err(ScaffoldError::validation(format!(
                "default of {} '{}' is not a valid {}",
                kind.singular(),
                param.name,
                param.param_type
            )));
        }
    }
    Ok(())
}

fn message(err: ScaffoldError) -> String {
    match err {
        ScaffoldError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

fn required(subject: &'static str) -> impl Fn(&str) -> std::result::Result<(), String> {
    move |value: &str| {
        if value.trim().is_empty() {
            Err(format!("{} is required", subject))
        } else {
            Ok(())
        }
    }
}

fn ask_core(
    _: &dyn ActionRegistry,
    form: &mut dyn FormEngine,
    values: &mut ActionDescription,
) -> Result<()> {
    let title_required: FieldValidator = &required("title");
    let title = form.input(
        &Field::new("Title")
            .description("Human readable name shown in help output")
            .placeholder("Deploy service")
            .initial(&values.title),
        Some(title_required),
    )?;
    values.title = title.trim().to_string();

    let description = form.text(
        &Field::new("Description")
            .description("What the action does")
            .initial(&values.description),
    )?;
    values.description = description.trim().to_string();

    let current = values.aliases.join(", ");
    let aliases = form.input(
        &Field::new("Aliases")
            .description("Alternative names, separated by commas")
            .initial(&current),
        None,
    )?;
    values.aliases = parse_aliases(&aliases);

    let runtimes: Vec<(&str, RuntimeType)> =
        RuntimeType::all().iter().map(|rt| (rt.label(), *rt)).collect();
    values.runtime.runtime_type = choose(
        form,
        &Field::new("Runtime").description("How the action is executed"),
        &runtimes,
        values.runtime_type(),
    )?;
    Ok(())
}

fn ask_container(
    _: &dyn ActionRegistry,
    form: &mut dyn FormEngine,
    values: &mut ActionDescription,
) -> Result<()> {
    let working_directory = choose(
        form,
        &Field::new("Working directory").description("Directory the container starts in"),
        WORKING_DIRECTORIES,
        values.working_directory.as_str(),
    )?
    .to_string();
    values.working_directory = working_directory;

    let presets: Vec<(&str, ContainerPreset)> = ContainerPreset::all()
        .iter()
        .map(|p| (p.label(), *p))
        .collect();
    values.container_preset = choose(
        form,
        &Field::new("Preset").description("Language of the generated container files"),
        &presets,
        values.container_preset,
    )?;
    Ok(())
}

fn ask_identity(
    registry: &dyn ActionRegistry,
    form: &mut dyn FormEngine,
    values: &mut ActionDescription,
) -> Result<()> {
    let suggestion = if values.id.is_empty() {
        sanitize_identifier(&values.title)
    } else {
        values.id.clone()
    };

    // Typed IDs must already be valid; only the registry lookup uses the sanitized form
    let validate: FieldValidator = &|raw: &str| {
        validate_action_id(raw).map_err(message)?;
        check_id(registry, raw).map(|_| ()).map_err(message)
    };
    let id = form.input(
        &Field::new("ID")
            .description("Unique identifier, also the directory name")
            .initial(&suggestion),
        Some(validate),
    )?;
    values.id = sanitize_identifier(&id);
    Ok(())
}

fn ask_arguments(
    _: &dyn ActionRegistry,
    form: &mut dyn FormEngine,
    values: &mut ActionDescription,
) -> Result<()> {
    ask_params(form, values, ParamKind::Argument)
}

fn ask_options(
    _: &dyn ActionRegistry,
    form: &mut dyn FormEngine,
    values: &mut ActionDescription,
) -> Result<()> {
    ask_params(form, values, ParamKind::Option)
}

/// Confirm, then collect one parameter per round until the user declines
fn ask_params(
    form: &mut dyn FormEngine,
    values: &mut ActionDescription,
    kind: ParamKind,
) -> Result<()> {
    if !form.confirm(&format!("Add {}?", kind.plural()), false)? {
        return Ok(());
    }

    loop {
        let param = ask_parameter(form, values.params(kind), kind)?;
        tracing::debug!("Added {} '{}'", kind.singular(), param.name);
        values.params_mut(kind).push(param);

        if !form.confirm(&format!("Add another {}?", kind.singular()), false)? {
            return Ok(());
        }
    }
}

fn ask_parameter(
    form: &mut dyn FormEngine,
    existing: &[Parameter],
    kind: ParamKind,
) -> Result<Parameter> {
    let subject = format!("{} name", kind.singular());
    let validate_param_name: FieldValidator = &|name: &str| {
        validate_name(&subject, name).map_err(message)?;
        if existing.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(format!("{} '{}' already exists", kind.singular(), name));
        }
        Ok(())
    };
    let name = form.input(
        &Field::new("Name").placeholder("count"),
        Some(validate_param_name),
    )?;

    let mut param = Parameter {
        name: name.to_lowercase(),
        ..Default::default()
    };

    param.title = form.input(&Field::new("Title"), None)?.trim().to_string();
    param.description = form.text(&Field::new("Description"))?.trim().to_string();

    let types: Vec<(&str, ParamType)> =
        ParamType::all().iter().map(|t| (t.label(), *t)).collect();
    param.param_type = choose(form, &Field::new("Type"), &types, ParamType::String)?;

    param.required = form.select(&Field::new("Required"), &["Yes", "No"], 1)? == 0;

    if param.param_type == ParamType::Array {
        let items: Vec<(&str, ParamType)> = ParamType::item_types()
            .iter()
            .map(|t| (t.label(), *t))
            .collect();
        param.items_type = Some(choose(
            form,
            &Field::new("Items type"),
            &items,
            ParamType::String,
        )?);
    }

    let (param_type, items_type) = (param.param_type, param.items_type);
    let validate_default: FieldValidator = &|raw: &str| {
        if raw.is_empty() {
            return Ok(());
        }
        coerce(raw, param_type, items_type)
            .map(|_| ())
            .map_err(message)
    };
    let default = form.input(
        &Field::new("Default").description("Leave empty for none"),
        Some(validate_default),
    )?;
    param.default = if default.is_empty() {
        zero_value(param_type)
    } else {
        coerce(&default, param_type, items_type)?
    };

    if param.param_type != ParamType::Array {
        param.items_type = None;
    }
    Ok(param)
}

fn ask_runtime_config(
    _: &dyn ActionRegistry,
    form: &mut dyn FormEngine,
    values: &mut ActionDescription,
) -> Result<()> {
    match values.runtime_type() {
        RuntimeType::Container => {
            let suggestion = if values.runtime.container.image.is_empty() {
                format!("{}:latest", values.id)
            } else {
                values.runtime.container.image.clone()
            };
            let image_required: FieldValidator = &required("image");
            let image = form.input(
                &Field::new("Image")
                    .description("Container image the action runs")
                    .initial(&suggestion),
                Some(image_required),
            )?;
            values.runtime.container.image = image.trim().to_string();

            let current_env = values.runtime.container.env.join("\n");
            let env = form.text(
                &Field::new("Environment variables")
                    .description("One KEY=VALUE per line")
                    .initial(&current_env),
            )?;
            values.runtime.container.env = parse_env_lines(&env);

            let current_hosts = values.runtime.container.extra_hosts.join(", ");
            let hosts = form.input(
                &Field::new("Extra hosts")
                    .description("host:ip entries, separated by commas")
                    .initial(&current_hosts),
                None,
            )?;
            values.runtime.container.extra_hosts = parse_extra_hosts(&hosts);
        }
        RuntimeType::Shell => {
            let current_env = values.runtime.shell.env.join("\n");
            let env = form.text(
                &Field::new("Environment variables")
                    .description("One KEY=VALUE per line")
                    .initial(&current_env),
            )?;
            values.runtime.shell.env = parse_env_lines(&env);
        }
        RuntimeType::Plugin => {}
    }
    Ok(())
}
