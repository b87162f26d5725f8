use planguard_types::UnknownTracking;
use std::collections::BTreeMap;

static NULL: Value = Value::Null;
static UNKNOWN: Value = Value::Unknown;

/// A planned attribute value.
///
/// `Unknown` is a value that only exists after apply. It is never the same thing as `Null`:
/// key-absent and explicit-null both read as `Null`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Unknown,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

/// Navigation stepped into a value that cannot have children (or a list with a key, an object
/// with an index). Predicates treat this as "not applicable".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub path: String,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Child by object key. Unknown parents yield `Unknown`, null parents and missing keys yield
    /// `Null`.
    pub fn get(&self, key: &str) -> Result<&Value, ShapeMismatch> {
        self.step(key)
    }

    /// Dotted-path navigation, e.g. `rule.0.apply_server_side_encryption_by_default.0.sse_algorithm`.
    /// Numeric segments index into lists.
    pub fn lookup(&self, path: &str) -> Result<&Value, ShapeMismatch> {
        let mut current = self;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = current.step(segment).map_err(|_| ShapeMismatch {
                path: path.to_string(),
            })?;
        }
        Ok(current)
    }

    fn step(&self, segment: &str) -> Result<&Value, ShapeMismatch> {
        match self {
            Value::Unknown => Ok(&UNKNOWN),
            Value::Null => Ok(&NULL),
            Value::Object(map) => Ok(map.get(segment).unwrap_or(&NULL)),
            Value::List(items) => match segment.parse::<usize>() {
                Ok(idx) => Ok(items.get(idx).unwrap_or(&NULL)),
                Err(_) => Err(ShapeMismatch {
                    path: segment.to_string(),
                }),
            },
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Err(ShapeMismatch {
                path: segment.to_string(),
            }),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// How a resource's identifying attribute reads in the plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Identity<'a> {
    Literal(&'a str),
    Unknown,
    Absent,
}

/// `managed` resources are what the plan creates or updates; `data` sources only read
/// existing infrastructure and are never subject to rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResourceMode {
    #[default]
    Managed,
    Data,
}

/// One planned infrastructure object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resource {
    /// Full plan address, including any `module.` prefix.
    pub address: String,
    pub mode: ResourceMode,
    /// Local name from the configuration (`logs` in `aws_s3_bucket.logs`).
    pub name: String,
    pub resource_type: String,
    pub values: BTreeMap<String, Value>,
    /// Reference expressions per attribute, from the plan's configuration section, qualified
    /// with the enclosing module path
    /// (e.g. `bucket -> ["module.store.aws_s3_bucket.logs.id", "module.store.aws_s3_bucket.logs"]`).
    pub references: BTreeMap<String, Vec<String>>,
}

impl Resource {
    pub fn new(resource_type: &str, name: &str, values: BTreeMap<String, Value>) -> Self {
        Self {
            address: format!("{resource_type}.{name}"),
            mode: ResourceMode::Managed,
            name: name.to_string(),
            resource_type: resource_type.to_string(),
            values,
            references: BTreeMap::new(),
        }
    }

    /// Attribute by dotted path; see [`Value::lookup`].
    pub fn attr(&self, path: &str) -> Result<&Value, ShapeMismatch> {
        let (head, rest) = path.split_once('.').unwrap_or((path, ""));
        let top = self.values.get(head).unwrap_or(&NULL);
        top.lookup(rest)
    }

    pub fn identity(&self, key: &str) -> Identity<'_> {
        match self.values.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Identity::Literal(s.as_str()),
            Some(Value::Unknown) => Identity::Unknown,
            _ => Identity::Absent,
        }
    }

    /// Identity for messages: the literal value when known, otherwise the address.
    pub fn display_identity(&self, key: Option<&str>) -> String {
        match key.map(|k| self.identity(k)) {
            Some(Identity::Literal(s)) => s.to_string(),
            _ => self.address.clone(),
        }
    }

    /// The address as the configuration spells it: no instance keys.
    pub fn config_address(&self) -> String {
        config_address(&self.address)
    }

    pub fn references_for(&self, key: &str) -> &[String] {
        self.references
            .get(key)
            .map(|r| r.as_slice())
            .unwrap_or(&[])
    }
}

/// The planned resource set. Order is preserved from the source document but rules do not
/// depend on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    pub resources: Vec<Resource>,
    pub unknown_tracking: UnknownTracking,
}

impl Plan {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            resources,
            unknown_tracking: UnknownTracking::Available,
        }
    }

    /// Resources the plan creates or updates. Data sources are never evaluated.
    pub fn managed(&self) -> impl Iterator<Item = &Resource> {
        self.resources
            .iter()
            .filter(|r| r.mode == ResourceMode::Managed)
    }

    pub fn of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a Resource> {
        self.managed()
            .filter(move |r| r.resource_type == resource_type)
    }

    pub fn count_of_type(&self, resource_type: &str) -> usize {
        self.of_type(resource_type).count()
    }
}

/// Drops instance keys so planned addresses line up with configuration addresses:
/// `module.a[0].aws_s3_bucket.b["x"]` -> `module.a.aws_s3_bucket.b`.
pub fn config_address(address: &str) -> String {
    let mut out = String::with_capacity(address.len());
    let mut depth = 0usize;
    let mut quoted = false;
    for c in address.chars() {
        match c {
            '"' if depth > 0 => quoted = !quoted,
            '[' if !quoted => depth += 1,
            ']' if !quoted && depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
