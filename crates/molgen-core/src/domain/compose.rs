//! The infrastructure (docker-compose) document.

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::domain::module::{EnvironmentMap, InfrastructureService, RestartPolicy};

/// Externally reachable network.
pub const PUBLIC_NETWORK: &str = "publique";
/// Internal-only network shared by every service.
pub const BACKEND_NETWORK: &str = "backend";
/// Volume of the primary data store.
pub const DATA_VOLUME: &str = "db_data";

/// A compose document with top-level `services`, `networks` and `volumes`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeDocument {
    root: Mapping,
}

impl Default for ComposeDocument {
    fn default() -> Self {
        Self::baseline()
    }
}

impl ComposeDocument {
    /// Empty `services` plus the fixed network and volume declarations.
    pub fn baseline() -> Self {
        let mut public = Mapping::new();
        public.insert("name".into(), PUBLIC_NETWORK.into());
        public.insert("driver".into(), "bridge".into());

        let mut backend = Mapping::new();
        backend.insert("name".into(), BACKEND_NETWORK.into());
        backend.insert("internal".into(), Value::Bool(true));
        backend.insert("driver".into(), "bridge".into());

        let mut networks = Mapping::new();
        networks.insert(PUBLIC_NETWORK.into(), Value::Mapping(public));
        networks.insert(BACKEND_NETWORK.into(), Value::Mapping(backend));

        let mut volumes = Mapping::new();
        volumes.insert(DATA_VOLUME.into(), Value::Mapping(Mapping::new()));

        let mut root = Mapping::new();
        root.insert("services".into(), Value::Mapping(Mapping::new()));
        root.insert("networks".into(), Value::Mapping(networks));
        root.insert("volumes".into(), Value::Mapping(volumes));
        Self { root }
    }

    /// Wrap an existing document, e.g. one read back from disk.
    ///
    /// Fails when the top level is not a mapping. A missing `services`
    /// section is created.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Mapping(mut root) = value else {
            return Err("top level is not a mapping".into());
        };
        match root.get("services") {
            None | Some(Value::Null) => {
                root.insert("services".into(), Value::Mapping(Mapping::new()));
            }
            Some(Value::Mapping(_)) => {}
            Some(_) => return Err("'services' is not a mapping".into()),
        }
        Ok(Self { root })
    }

    /// Project `service` into `services`. A colliding `service_name` replaces
    /// the earlier entry in place.
    pub fn insert_service(&mut self, service: &InfrastructureService) {
        let entry = service_entry(service);
        if let Some(Value::Mapping(services)) = self.root.get_mut("services") {
            services.insert(service.service_name.clone().into(), entry);
        }
    }

    /// Deep-merge a module's `global` fragment into the top-level sections.
    /// See [`deep_merge`] for the exact semantics.
    ///
    /// Only a mapping fragment is merged, and a `services` key inside it
    /// must itself be a mapping. Anything else is skipped with a warning so
    /// the document keeps its services, networks and volumes.
    pub fn merge_global(&mut self, fragment: &Value) {
        let Value::Mapping(sections) = fragment else {
            warn!(fragment = ?fragment, "Global fragment is not a mapping, skipping");
            return;
        };
        for (key, value) in sections {
            if key.as_str() == Some("services") && !value.is_mapping() {
                warn!("Global fragment 'services' is not a mapping, skipping");
                continue;
            }
            match self.root.get_mut(key) {
                Some(existing) => deep_merge(existing, value.clone()),
                None => {
                    self.root.insert(key.clone(), value.clone());
                }
            }
        }
    }

    pub fn services(&self) -> Option<&Mapping> {
        self.root.get("services").and_then(Value::as_mapping)
    }

    pub fn service(&self, name: &str) -> Option<&Value> {
        self.services().and_then(|s| s.get(name))
    }

    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    pub fn to_value(&self) -> Value {
        Value::Mapping(self.root.clone())
    }
}

/// Merge `overlay` into `base` in place.
///
/// - mapping into mapping: recurse key by key; new keys are appended after
///   the existing ones.
/// - sequence into sequence: **positional**. Element `i` of the overlay is
///   merged into element `i` of the base, extra overlay elements are
///   appended, base elements past the overlay's length are kept. This is not
///   a set union: `[a, b]` merged with `[c]` gives `[c, b]`.
/// - anything else: the overlay value replaces the base value, including
///   `null` and type changes.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Sequence(base_seq), Value::Sequence(overlay_seq)) => {
            for (index, value) in overlay_seq.into_iter().enumerate() {
                match base_seq.get_mut(index) {
                    Some(existing) => deep_merge(existing, value),
                    None => base_seq.push(value),
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ── Service projection ───────────────────────────────────────────────────────

/// Serialisable view of one compose service. Empty collections are omitted.
#[derive(Serialize)]
struct ServiceEntry<'a> {
    image: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    container_name: Option<&'a str>,
    #[serde(skip_serializing_if = "no_items")]
    command: &'a [String],
    #[serde(skip_serializing_if = "no_env")]
    environment: &'a EnvironmentMap,
    #[serde(skip_serializing_if = "no_items")]
    env_file: &'a [String],
    #[serde(skip_serializing_if = "no_items")]
    networks: &'a [String],
    #[serde(skip_serializing_if = "no_items")]
    volumes: &'a [String],
    #[serde(skip_serializing_if = "no_items")]
    ports: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    expose: Option<[&'a str; 1]>,
    #[serde(skip_serializing_if = "no_items")]
    depends_on: &'a [String],
    #[serde(skip_serializing_if = "no_items")]
    labels: &'a [String],
    #[serde(skip_serializing_if = "no_items")]
    security_opt: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    restart: Option<RestartPolicy>,
}

fn no_items(items: &&[String]) -> bool {
    items.is_empty()
}

fn no_env(env: &&EnvironmentMap) -> bool {
    env.is_empty()
}

fn service_entry(service: &InfrastructureService) -> Value {
    let entry = ServiceEntry {
        image: &service.image,
        container_name: service.container_name.as_deref(),
        command: &service.command,
        environment: &service.environment,
        env_file: &service.env_file,
        networks: &service.networks,
        volumes: &service.volumes,
        ports: &service.ports,
        expose: service.expose.as_deref().map(|port| [port]),
        depends_on: &service.depends_on,
        labels: &service.labels,
        security_opt: &service.security_opt,
        restart: service.restart,
    };
    // Only strings, sequences and maps of strings: cannot fail.
    serde_yaml::to_value(entry).unwrap_or(Value::Null)
}
