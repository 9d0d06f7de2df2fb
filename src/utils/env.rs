use std::collections::HashMap;
use std::env;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use eyre::Result;
use tracing::{debug, warn};

/// Source of environment variables for the config loader.
///
/// Keeping this behind a trait lets tests feed a fixed snapshot instead of
/// touching the real process environment.
pub trait EnvProvider {
    fn var(&self, name: &str) -> Option<String>;

    /// Unset variables interpolate to an empty string
    fn var_or_empty(&self, name: &str) -> String {
        self.var(name).unwrap_or_default()
    }
}

impl<E: EnvProvider + ?Sized> EnvProvider for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

/// Fixed in-memory environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = MapEnv::new();
        for (name, value) in iter {
            env.insert(name, value);
        }
        env
    }
}

impl EnvProvider for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// A base environment with the contents of a `.env` file layered underneath.
///
/// Variables already defined by the base always win over the file.
#[derive(Debug, Clone, Default)]
pub struct DotenvEnv<E> {
    base: E,
    file: MapEnv,
}

impl<E: EnvProvider> DotenvEnv<E> {
    /// Wraps `base` without any file overlay
    pub fn new(base: E) -> Self {
        Self { base, file: MapEnv::new() }
    }

    /// Parses `path` into an overlay. A missing file yields an empty overlay.
    ///
    /// `dotenv` expands `$VAR`/`${VAR}` references inside file values against
    /// the process environment, not against `base`. Only the values written
    /// in the file are affected; lookups through `base` stay isolated.
    pub fn try_load<P: AsRef<Path>>(base: E, path: P) -> Result<Self> {
        let path = path.as_ref();
        let iter = match dotenv::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no env file found");
                return Ok(Self::new(base));
            }
            Err(e) => return Err(e.into()),
        };

        // The file handle is owned by the iterator and closed when it drops
        let mut file = MapEnv::new();
        for item in iter {
            let (name, value) = item?;
            file.insert(name, value);
        }
        debug!(path = %path.display(), variables = file.len(), "loaded env file");

        Ok(Self { base, file })
    }

    /// Same as [`DotenvEnv::try_load`] but never fails: a broken file is
    /// logged and ignored.
    pub fn load<P: AsRef<Path>>(base: E, path: P) -> Self
    where
        E: Clone,
    {
        let path = path.as_ref();
        match Self::try_load(base.clone(), path) {
            Ok(env) => env,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable env file");
                Self::new(base)
            }
        }
    }
}

impl<E: EnvProvider> EnvProvider for DotenvEnv<E> {
    fn var(&self, name: &str) -> Option<String> {
        self.base.var(name).or_else(|| self.file.var(name))
    }
}

/// Replaces known secret values in text with [`REDACTED`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redactor {
    secrets: Vec<String>,
}

pub const REDACTED: &str = "<redacted>";

impl Redactor {
    pub fn new<I: IntoIterator<Item = String>>(secrets: I) -> Self {
        let mut secrets: Vec<String> = secrets.into_iter().filter(|s| !s.is_empty()).collect();
        // Longest first so a secret containing another is replaced whole
        secrets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        secrets.dedup();
        Self { secrets }
    }

    pub fn scrub(&self, text: &str) -> String {
        self.secrets
            .iter()
            .fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), REDACTED))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(String),
}

/// A string with `${VAR}` placeholders, resolved against an [`EnvProvider`]
/// only when needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvTemplate {
    segments: Vec<Segment>,
}

impl EnvTemplate {
    pub fn literal(text: impl Into<String>) -> Self {
        Self { segments: vec![Segment::Literal(text.into())] }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self { segments: vec![Segment::Var(name.into())] }
    }

    pub fn then_literal(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Literal(text.into()));
        self
    }

    pub fn then_var(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Var(name.into()));
        self
    }

    /// Names of every variable referenced, in order of appearance
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Var(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn resolve<E: EnvProvider + ?Sized>(&self, env: &E) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Var(name) => {
                    let value = env.var(name);
                    if value.as_deref().map_or(true, str::is_empty) {
                        debug!(variable = %name, "environment variable unset, interpolating empty string");
                    }
                    out.push_str(&value.unwrap_or_default());
                }
            }
        }
        out
    }
}

/// Renders the unresolved form, e.g. `https://host/v2/${API_KEY}`
impl fmt::Display for EnvTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Var(name) => write!(f, "${{{}}}", name)?,
            }
        }
        Ok(())
    }
}
