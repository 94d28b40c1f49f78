use crate::domain::model::{EntityDef, FieldDef, FieldKind, MethodDef};
use crate::utils::combos::exclude_names;
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Catalog of testable entities. The built-in set covers the standard
/// Satellite-flavored API surface; a JSON file can replace it for other
/// targets.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    entities: BTreeMap<String, EntityDef>,
}

impl EntityRegistry {
    pub fn builtin() -> Self {
        Self::from_defs(builtin_defs())
    }

    pub fn from_defs(defs: Vec<EntityDef>) -> Self {
        let entities = defs.into_iter().map(|def| (def.name.clone(), def)).collect();
        Self { entities }
    }

    /// 從 JSON 檔案載入自訂的 entity 目錄
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let defs: Vec<EntityDef> = serde_json::from_str(&content)?;
        Ok(Self::from_defs(defs))
    }

    pub fn names(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    pub fn names_excluding(&self, exclude: Option<&[String]>) -> Vec<String> {
        exclude_names(self.names(), exclude)
    }

    pub fn get(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn field(name: &str, kind: FieldKind, required: bool) -> FieldDef {
    FieldDef {
        name: name.to_string(),
        kind,
        required,
    }
}

fn method(name: &str, args: &[&str]) -> MethodDef {
    MethodDef {
        name: name.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
    }
}

fn crud_methods() -> Vec<MethodDef> {
    vec![
        method("create", &[]),
        method("read", &["entity_id"]),
        method("update", &["entity_id"]),
        method("delete", &["entity_id"]),
        method("search", &["search"]),
    ]
}

fn entity(name: &str, endpoint: &str, payload_root: &str, fields: Vec<FieldDef>) -> EntityDef {
    EntityDef {
        name: name.to_string(),
        endpoint: endpoint.to_string(),
        payload_root: Some(payload_root.to_string()),
        fields,
        methods: crud_methods(),
    }
}

fn builtin_defs() -> Vec<EntityDef> {
    vec![
        entity(
            "Organization",
            "/katello/api/v2/organizations",
            "organization",
            vec![
                field("name", FieldKind::String, true),
                field("label", FieldKind::String, false),
                field("description", FieldKind::String, false),
            ],
        ),
        entity(
            "Location",
            "/api/v2/locations",
            "location",
            vec![
                field("name", FieldKind::String, true),
                field("description", FieldKind::String, false),
            ],
        ),
        entity(
            "Product",
            "/katello/api/v2/products",
            "product",
            vec![
                field("name", FieldKind::String, true),
                field("label", FieldKind::String, false),
                field("description", FieldKind::String, false),
            ],
        ),
        entity(
            "Repository",
            "/katello/api/v2/repositories",
            "repository",
            vec![
                field("name", FieldKind::String, true),
                field("label", FieldKind::String, false),
                field("url", FieldKind::Url, false),
                field("content_type", FieldKind::String, true),
                field("description", FieldKind::String, false),
            ],
        ),
        entity(
            "ContentView",
            "/katello/api/v2/content_views",
            "content_view",
            vec![
                field("name", FieldKind::String, true),
                field("label", FieldKind::String, false),
                field("description", FieldKind::String, false),
                field("composite", FieldKind::Boolean, false),
            ],
        ),
        entity(
            "ActivationKey",
            "/katello/api/v2/activation_keys",
            "activation_key",
            vec![
                field("name", FieldKind::String, true),
                field("description", FieldKind::String, false),
                field("max_hosts", FieldKind::Integer, false),
                field("unlimited_hosts", FieldKind::Boolean, false),
            ],
        ),
        entity(
            "Host",
            "/api/v2/hosts",
            "host",
            vec![
                field("name", FieldKind::String, true),
                field("ip", FieldKind::IpAddr, false),
                field("mac", FieldKind::MacAddr, false),
                field("comment", FieldKind::String, false),
                field("build", FieldKind::Boolean, false),
            ],
        ),
        entity(
            "User",
            "/api/v2/users",
            "user",
            vec![
                field("login", FieldKind::String, true),
                field("firstname", FieldKind::String, false),
                field("lastname", FieldKind::String, false),
                field("mail", FieldKind::Email, true),
                field("password", FieldKind::String, true),
            ],
        ),
        entity(
            "Role",
            "/api/v2/roles",
            "role",
            vec![
                field("name", FieldKind::String, true),
                field("description", FieldKind::String, false),
            ],
        ),
        entity(
            "Domain",
            "/api/v2/domains",
            "domain",
            vec![
                field("name", FieldKind::String, true),
                field("fullname", FieldKind::String, false),
            ],
        ),
        entity(
            "Subnet",
            "/api/v2/subnets",
            "subnet",
            vec![
                field("name", FieldKind::String, true),
                field("network", FieldKind::IpAddr, true),
                field("mask", FieldKind::IpAddr, true),
                field("gateway", FieldKind::IpAddr, false),
            ],
        ),
    ]
}
