//! @acp:module "Embedded Templates"
//! @acp:summary "Built-in template library compiled into the binary"
//! @acp:domain cli
//! @acp:layer data
//!
//! Files under `templates/` are embedded with [`include_str!`]. Adding a file
//! there means adding a row here as well.

use super::store::MemoryStore;

/// `(store path, contents)` for every built-in template
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "definition/action.yaml.tmpl",
        include_str!("../../templates/definition/action.yaml.tmpl"),
    ),
    (
        "definition/container.yaml.tmpl",
        include_str!("../../templates/definition/container.yaml.tmpl"),
    ),
    (
        "definition/plugin.yaml.tmpl",
        include_str!("../../templates/definition/plugin.yaml.tmpl"),
    ),
    (
        "definition/shell.yaml.tmpl",
        include_str!("../../templates/definition/shell.yaml.tmpl"),
    ),
    (
        "files/container/Dockerfile.tmpl",
        include_str!("../../templates/files/container/Dockerfile.tmpl"),
    ),
    (
        "files/container/README.md.tmpl",
        include_str!("../../templates/files/container/README.md.tmpl"),
    ),
    (
        "files/container/go/go.mod.tmpl",
        include_str!("../../templates/files/container/go/go.mod.tmpl"),
    ),
    (
        "files/container/go/internal/action/action.go.tmpl",
        include_str!("../../templates/files/container/go/internal/action/action.go.tmpl"),
    ),
    (
        "files/container/go/main.go.tmpl",
        include_str!("../../templates/files/container/go/main.go.tmpl"),
    ),
    (
        "files/container/py/action/__init__.py.tmpl",
        include_str!("../../templates/files/container/py/action/__init__.py.tmpl"),
    ),
    (
        "files/container/py/main.py.tmpl",
        include_str!("../../templates/files/container/py/main.py.tmpl"),
    ),
    (
        "files/container/py/requirements.txt.tmpl",
        include_str!("../../templates/files/container/py/requirements.txt.tmpl"),
    ),
    (
        "files/container/sh/main.sh.tmpl",
        include_str!("../../templates/files/container/sh/main.sh.tmpl"),
    ),
    (
        "files/plugin/README.md.tmpl",
        include_str!("../../templates/files/plugin/README.md.tmpl"),
    ),
    (
        "files/plugin/plugin.go.tmpl",
        include_str!("../../templates/files/plugin/plugin.go.tmpl"),
    ),
    (
        "files/shell/README.md.tmpl",
        include_str!("../../templates/files/shell/README.md.tmpl"),
    ),
    (
        "files/shell/main.sh.tmpl",
        include_str!("../../templates/files/shell/main.sh.tmpl"),
    ),
];

/// The built-in library as a store
pub fn builtin() -> MemoryStore {
    let mut store = MemoryStore::new();
    for (path, content) in BUILTIN_TEMPLATES {
        store.insert(*path, content.as_bytes());
    }
    store
}
