use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

/// Identity of a job; at most one live executor exists per identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobIdentity(u64);

impl JobIdentity {
    #[inline]
    pub const fn of(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for JobIdentity {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// What to run.
///
/// Parameters and properties are opaque to the supervision layer and are handed
/// to the worker untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobContext {
    pub job_identity: JobIdentity,
    /// Worker-side entry point; the in-process launcher resolves functions by it.
    #[serde(default)]
    pub job_class: String,
    #[serde(default)]
    pub job_parameters: HashMap<String, String>,
    #[serde(default)]
    pub job_properties: HashMap<String, String>,
}

impl JobContext {
    pub fn new(job_identity: JobIdentity, job_class: impl Into<String>) -> Self {
        Self {
            job_identity,
            job_class: job_class.into(),
            job_parameters: HashMap::new(),
            job_properties: HashMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.job_parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.job_properties.insert(key.into(), value.into());
        self
    }
}
