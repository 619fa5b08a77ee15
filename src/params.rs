//! Query-string style key/value persistence.
//!
//! Every piece of comparison state that survives a reload lives here as a
//! string value under a stable key. Backends only move strings around; typed
//! access goes through [`ParamKey`] and a [`ParamCodec`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::error::CompareError;

/// A batch of key changes applied as a whole. `None` removes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamUpdate {
    entries: Vec<(String, Option<String>)>,
}

impl ParamUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), Some(value.into())));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.entries.push((key.into(), None));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, Option<String>)] {
        &self.entries
    }
}

pub trait ParamStore {
    fn get(&self, key: &str) -> Option<String>;
    fn update(&mut self, update: ParamUpdate) -> Result<(), CompareError>;
}

pub trait ParamCodec {
    type Value;

    fn decode(raw: &str) -> Result<Self::Value, String>;
    fn encode(value: &Self::Value) -> Result<String, String>;
}

/// Stores the value's `Display` form and rebuilds it with `From<String>`.
pub struct Text<T>(PhantomData<T>);

impl<T> ParamCodec for Text<T>
where
    T: From<String> + fmt::Display,
{
    type Value = T;

    fn decode(raw: &str) -> Result<T, String> {
        Ok(T::from(raw.to_string()))
    }

    fn encode(value: &T) -> Result<String, String> {
        Ok(value.to_string())
    }
}

/// Stores the value as compact JSON.
pub struct Json<T>(PhantomData<T>);

impl<T> ParamCodec for Json<T>
where
    T: Serialize + DeserializeOwned,
{
    type Value = T;

    fn decode(raw: &str) -> Result<T, String> {
        serde_json::from_str(raw).map_err(|err| err.to_string())
    }

    fn encode(value: &T) -> Result<String, String> {
        serde_json::to_string(value).map_err(|err| err.to_string())
    }
}

pub struct ParamKey<C> {
    name: &'static str,
    _codec: PhantomData<C>,
}

impl<C> ParamKey<C> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _codec: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<C> fmt::Debug for ParamKey<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParamKey").field(&self.name).finish()
    }
}

/// Typed accessors available on every [`ParamStore`].
pub trait ParamStoreExt: ParamStore {
    /// An empty value reads the same as an absent key.
    fn read<C: ParamCodec>(&self, key: &ParamKey<C>) -> Result<Option<C::Value>, CompareError> {
        match self.get(key.name()) {
            Some(raw) if !raw.is_empty() => C::decode(&raw).map(Some).map_err(|message| {
                CompareError::MalformedPersistedState {
                    key: key.name().to_string(),
                    message,
                }
            }),
            _ => Ok(None),
        }
    }

    /// Like [`read`](Self::read), but a malformed value is logged and read as absent.
    fn read_soft<C: ParamCodec>(&self, key: &ParamKey<C>) -> Option<C::Value> {
        match self.read(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key = key.name(), "ignoring persisted value: {err}");
                None
            }
        }
    }

    fn write<C: ParamCodec>(
        &mut self,
        key: &ParamKey<C>,
        value: &C::Value,
    ) -> Result<(), CompareError> {
        let encoded = C::encode(value).map_err(|message| CompareError::ParamEncode {
            key: key.name().to_string(),
            message,
        })?;
        self.update(ParamUpdate::new().set(key.name(), encoded))
    }
}

impl<S: ParamStore + ?Sized> ParamStoreExt for S {}

/// In-memory store that round-trips through a URL query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later occurrences of a key override earlier ones.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let values = form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self { values }
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.values.iter())
            .finish()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn apply(&mut self, update: ParamUpdate) {
        for (key, value) in update.entries {
            match value {
                Some(value) => {
                    self.values.insert(key, value);
                }
                None => {
                    self.values.remove(&key);
                }
            }
        }
    }
}

impl ParamStore for QueryParams {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn update(&mut self, update: ParamUpdate) -> Result<(), CompareError> {
        self.apply(update);
        Ok(())
    }
}

/// Parameters kept as a flat JSON object on disk, rewritten atomically on
/// every update.
#[derive(Debug, Clone)]
pub struct FileParams {
    path: Utf8PathBuf,
    params: QueryParams,
}

impl FileParams {
    /// A missing file opens as an empty store.
    pub fn open(path: impl Into<Utf8PathBuf>) -> Result<Self, CompareError> {
        let path = path.into();
        if !path.as_std_path().exists() {
            return Ok(Self {
                path,
                params: QueryParams::new(),
            });
        }
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|err| CompareError::Filesystem(format!("read {path}: {err}")))?;
        let values: BTreeMap<String, String> = serde_json::from_str(&content)
            .map_err(|err| CompareError::StateParse(format!("{path}: {err}")))?;
        Ok(Self {
            path,
            params: QueryParams { values },
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    fn persist(&self, params: &QueryParams) -> Result<(), CompareError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        let content = serde_json::to_vec_pretty(&params.values)
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        let mut temp = tempfile::Builder::new()
            .prefix("kira-gc-params")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        temp.persist(self.path.as_std_path())
            .map_err(|err| CompareError::Filesystem(err.to_string()))?;
        tracing::debug!(path = %self.path, keys = params.len(), "parameters written");
        Ok(())
    }
}

impl ParamStore for FileParams {
    fn get(&self, key: &str) -> Option<String> {
        self.params.get(key)
    }

    fn update(&mut self, update: ParamUpdate) -> Result<(), CompareError> {
        if update.is_empty() {
            return Ok(());
        }
        let mut next = self.params.clone();
        next.apply(update);
        self.persist(&next)?;
        self.params = next;
        Ok(())
    }
}
