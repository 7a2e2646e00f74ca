use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::DomainError;

/// An authoritative zone and its SOA metadata.
///
/// `name`, `ns` and `admin` are absolute, lower-cased names with a trailing dot.
/// `version` only ever grows; it changes whenever metadata or the record set changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(default)]
    pub id: Option<i64>,

    pub name: Arc<str>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    pub ttl: u32,

    pub ns: Arc<str>,

    pub admin: Arc<str>,

    pub serial: u32,

    pub refresh: u32,

    pub retry: u32,

    pub expire: u32,

    #[serde(default)]
    pub version: i64,
}

impl Zone {
    pub fn new(name: &str, ns: &str, admin: &str, ttl: u32) -> Result<Self, DomainError> {
        Ok(Self {
            id: None,
            name: Arc::from(Self::normalize_name(name)?),
            enabled: true,
            ttl,
            ns: Arc::from(Self::normalize_name(ns)?),
            admin: Arc::from(Self::normalize_admin(admin)?),
            serial: 1,
            refresh: 3600,
            retry: 600,
            expire: 604800,
            version: 0,
        })
    }

    /// Lower-case, trailing-dot form of a domain name.
    pub fn normalize_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim().trim_end_matches('.');
        if trimmed.is_empty() {
            return Err(DomainError::InvalidDomainName(name.to_string()));
        }
        if trimmed.len() > 253 {
            return Err(DomainError::InvalidDomainName(name.to_string()));
        }
        for label in trimmed.split('.') {
            if label.is_empty() || label.len() > 63 {
                return Err(DomainError::InvalidDomainName(name.to_string()));
            }
            if !label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(DomainError::InvalidDomainName(name.to_string()));
            }
        }
        Ok(format!("{}.", trimmed.to_ascii_lowercase()))
    }

    /// Accepts both `hostmaster.example.com.` and `hostmaster@example.com`.
    pub fn normalize_admin(admin: &str) -> Result<String, DomainError> {
        let admin = admin.trim();
        match admin.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !local.contains('.') => {
                Self::normalize_name(&format!("{}.{}", local, domain))
            }
            Some(_) => Err(DomainError::InvalidZone(format!(
                "Invalid admin mailbox: {}",
                admin
            ))),
            None => Self::normalize_name(admin),
        }
    }

    /// Copy with `name`, `ns` and `admin` in their canonical form.
    pub fn canonicalized(&self) -> Result<Self, DomainError> {
        if self.version < 0 {
            return Err(DomainError::InvalidZone(format!(
                "Zone '{}' has a negative version",
                self.name
            )));
        }
        Ok(Self {
            name: Arc::from(Self::normalize_name(&self.name)?),
            ns: Arc::from(Self::normalize_name(&self.ns)?),
            admin: Arc::from(Self::normalize_admin(&self.admin)?),
            ..self.clone()
        })
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        Self::normalize_name(&self.name)?;
        Self::normalize_name(&self.ns)?;
        Self::normalize_name(&self.admin)?;
        if self.version < 0 {
            return Err(DomainError::InvalidZone(format!(
                "Zone '{}' has a negative version",
                self.name
            )));
        }
        Ok(())
    }

    /// True when SOA metadata differs, ignoring identity and version.
    pub fn metadata_differs(&self, other: &Zone) -> bool {
        self.name != other.name
            || self.enabled != other.enabled
            || self.ttl != other.ttl
            || self.ns != other.ns
            || self.admin != other.admin
            || self.serial != other.serial
            || self.refresh != other.refresh
            || self.retry != other.retry
            || self.expire != other.expire
    }
}

fn default_true() -> bool {
    true
}
