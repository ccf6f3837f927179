use std::{
    collections::BTreeMap,
    env, fmt, fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{definition::EndpointDefinition, registry::Registry};

const ENDPOINT_EXTENSION: &str = ".json";
// Three-digit codes only; anything else cannot go on a status line.
const MIN_STATUS: u16 = 100;
const MAX_STATUS: u16 = 999;

#[derive(Debug)]
pub enum ConfigError {
    ReadDir(PathBuf, io::Error),
    ReadFile(PathBuf, io::Error),
    Parse(PathBuf, serde_json::Error),
    Invalid(PathBuf, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadDir(path, e) => {
                if e.kind() == io::ErrorKind::NotFound {
                    write!(f, "Endpoints directory '{}' not found.", path.display())
                } else {
                    write!(f, "Failed to read endpoints directory '{}': {}", path.display(), e)
                }
            }
            ConfigError::ReadFile(path, e) => {
                write!(f, "Failed to read endpoint file '{}': {}", path.display(), e)
            }
            ConfigError::Parse(path, e) => {
                write!(f, "Failed to parse endpoint file '{}': {}", path.display(), e)
            }
            ConfigError::Invalid(path, reason) => {
                write!(f, "Invalid endpoint file '{}': {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadDir(_, e) | ConfigError::ReadFile(_, e) => Some(e),
            ConfigError::Parse(_, e) => Some(e),
            ConfigError::Invalid(..) => None,
        }
    }
}

/// Makes a relative path absolute against the current working directory.
pub fn path_from_cwd(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Registry key for an endpoint file: the file name without its extension,
/// with a leading `/`.
pub fn endpoint_path(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(ENDPOINT_EXTENSION)
        .unwrap_or(file_name);
    if stem.starts_with('/') {
        stem.to_string()
    } else {
        format!("/{}", stem)
    }
}

fn validate_definition(def: &EndpointDefinition) -> Result<(), String> {
    if def.method.trim().is_empty() {
        return Err("'method' must not be empty".to_string());
    }
    if let Some(idx) = def
        .responses
        .iter()
        .position(|r| !(MIN_STATUS..=MAX_STATUS).contains(&r.status))
    {
        return Err(format!(
            "responses[{}].status must be between {} and {}",
            idx, MIN_STATUS, MAX_STATUS
        ));
    }
    Ok(())
}

pub fn load_definition(path: &Path) -> Result<EndpointDefinition, ConfigError> {
    let content =
        fs::read_to_string(path).map_err(|e| ConfigError::ReadFile(path.to_path_buf(), e))?;
    let def: EndpointDefinition = serde_json::from_str(&content)
        .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    validate_definition(&def).map_err(|reason| ConfigError::Invalid(path.to_path_buf(), reason))?;
    Ok(def)
}

/// Loads every `*.json` file directly inside `dir` into a [`Registry`].
///
/// Sub-directories are not descended into. Any unreadable or malformed file
/// fails the whole load.
pub fn load_registry(dir: &Path) -> Result<Registry, ConfigError> {
    let entries = fs::read_dir(dir).map_err(|e| ConfigError::ReadDir(dir.to_path_buf(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::ReadDir(dir.to_path_buf(), e))?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.ends_with(ENDPOINT_EXTENSION) && path.is_file() {
            files.push((name, path));
        }
    }
    files.sort();

    let mut endpoints = BTreeMap::new();
    for (name, path) in files {
        let def = load_definition(&path)?;
        let key = endpoint_path(&name);
        debug!(path = %key, file = %path.display(), method = %def.method, "loaded endpoint");
        endpoints.insert(key, def);
    }

    Ok(Registry::new(endpoints))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    const USERS: &str = r#"{"method": "GET", "responses": [{"status": 200, "body": []}]}"#;

    #[test]
    fn endpoint_path_from_file_name() {
        assert_eq!(endpoint_path("users.json"), "/users");
        assert_eq!(endpoint_path("create-user.json"), "/create-user");
        assert_eq!(endpoint_path("v1.users.json"), "/v1.users");
        assert_eq!(endpoint_path("/already.json"), "/already");
    }

    #[test]
    fn loads_one_entry_per_json_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "users.json", USERS);
        write(
            tmp.path(),
            "create-user.json",
            r#"{"method": "POST", "responses": [{"status": 201, "body": {"ok": true}}]}"#,
        );
        write(tmp.path(), "orders.json", USERS);
        write(tmp.path(), "README.md", "not an endpoint");

        let registry = load_registry(tmp.path()).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("/create-user").unwrap().method, "POST");
        assert!(registry.get("/users").is_some());
        assert!(registry.get("/orders").is_some());
        assert!(registry.get("/README").is_none());
    }

    #[test]
    fn does_not_descend_into_subdirectories() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "users.json", USERS);
        let nested = tmp.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write(&nested, "hidden.json", USERS);

        let registry = load_registry(tmp.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("/hidden").is_none());
    }

    #[test]
    fn empty_directory_yields_empty_registry() {
        let tmp = TempDir::new().unwrap();
        let registry = load_registry(tmp.path()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn malformed_file_aborts_the_load() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "users.json", USERS);
        write(tmp.path(), "broken.json", "{ not json");

        let err = load_registry(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(ref p, _) if p.ends_with("broken.json")));
    }

    #[test]
    fn zero_status_is_rejected() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "bad.json",
            r#"{"method": "GET", "responses": [{"status": 200, "body": 1}, {"status": 0, "body": 2}]}"#,
        );

        let err = load_registry(tmp.path()).unwrap_err();
        match err {
            ConfigError::Invalid(_, reason) => assert!(reason.contains("responses[1]")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn status_outside_three_digits_is_rejected() {
        for status in [1, 99, 1000, 65535] {
            let tmp = TempDir::new().unwrap();
            write(
                tmp.path(),
                "bad.json",
                &format!(r#"{{"method": "GET", "responses": [{{"status": {}, "body": 1}}]}}"#, status),
            );
            let err = load_registry(tmp.path()).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(..)), "status {}", status);
        }

        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "edge.json",
            r#"{"method": "GET", "responses": [{"status": 100, "body": 1}, {"status": 999, "body": 2}]}"#,
        );
        assert_eq!(load_registry(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_registry(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadDir(..)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn empty_responses_is_accepted() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "empty.json", r#"{"method": "GET", "responses": []}"#);
        let registry = load_registry(tmp.path()).unwrap();
        assert!(registry.get("/empty").unwrap().responses.is_empty());
    }
}
