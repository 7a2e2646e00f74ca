//! Typed record payloads.
//!
//! Stored records keep their value as free text (`"10.0.0.1"`, `"mail.example.com."`,
//! `"5 5060 sip.example.com."`). `RecordData::parse` is the single place where that
//! text is interpreted; the DNS layer converts the result into wire RDATA.

use super::RecordType;
use crate::errors::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

const MAX_TXT_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(Arc<str>),
    NS(Arc<str>),
    PTR(Arc<str>),
    MX {
        preference: u16,
        exchange: Arc<str>,
    },
    TXT(Arc<str>),
    SRV {
        priority: u16,
        weight: u16,
        port: u16,
        target: Arc<str>,
    },
}

impl RecordData {
    /// Parse a stored value for the given type.
    ///
    /// `priority` carries the MX preference and the SRV priority. An SRV value may
    /// also spell the priority inline as `"priority weight port target"`.
    pub fn parse(
        record_type: RecordType,
        value: &str,
        priority: Option<u16>,
    ) -> Result<Self, DomainError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::InvalidRecord(format!(
                "{} record has an empty value",
                record_type
            )));
        }

        match record_type {
            RecordType::A => value
                .parse::<Ipv4Addr>()
                .map(RecordData::A)
                .map_err(|_| DomainError::InvalidIpAddress(value.to_string())),
            RecordType::AAAA => value
                .parse::<Ipv6Addr>()
                .map(RecordData::AAAA)
                .map_err(|_| DomainError::InvalidIpAddress(value.to_string())),
            RecordType::CNAME => Ok(RecordData::CNAME(qualify_target(value)?)),
            RecordType::NS => Ok(RecordData::NS(qualify_target(value)?)),
            RecordType::PTR => Ok(RecordData::PTR(qualify_target(value)?)),
            RecordType::MX => Ok(RecordData::MX {
                preference: priority.unwrap_or(10),
                exchange: qualify_target(value)?,
            }),
            RecordType::TXT => {
                if value.len() > MAX_TXT_LEN {
                    return Err(DomainError::InvalidRecord(format!(
                        "TXT value exceeds {} bytes",
                        MAX_TXT_LEN
                    )));
                }
                Ok(RecordData::TXT(Arc::from(unquote(value))))
            }
            RecordType::SRV => parse_srv(value, priority),
            RecordType::SOA => Err(DomainError::InvalidRecord(
                "SOA records are synthesized from zone metadata".to_string(),
            )),
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::AAAA(_) => RecordType::AAAA,
            RecordData::CNAME(_) => RecordType::CNAME,
            RecordData::NS(_) => RecordType::NS,
            RecordData::PTR(_) => RecordType::PTR,
            RecordData::MX { .. } => RecordType::MX,
            RecordData::TXT(_) => RecordType::TXT,
            RecordData::SRV { .. } => RecordType::SRV,
        }
    }
}

fn parse_srv(value: &str, priority: Option<u16>) -> Result<RecordData, DomainError> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let (priority, rest) = match parts.len() {
        3 => (priority.unwrap_or(0), &parts[..]),
        4 => (parse_u16(parts[0], "SRV priority")?, &parts[1..]),
        _ => {
            return Err(DomainError::InvalidRecord(format!(
                "SRV value must be 'weight port target', got '{}'",
                value
            )))
        }
    };

    Ok(RecordData::SRV {
        priority,
        weight: parse_u16(rest[0], "SRV weight")?,
        port: parse_u16(rest[1], "SRV port")?,
        target: qualify_target(rest[2])?,
    })
}

fn parse_u16(s: &str, what: &str) -> Result<u16, DomainError> {
    s.parse::<u16>()
        .map_err(|_| DomainError::InvalidRecord(format!("{} '{}' is not a valid number", what, s)))
}

/// Target names are always absolute; a missing trailing dot is added.
fn qualify_target(value: &str) -> Result<Arc<str>, DomainError> {
    if value.contains(char::is_whitespace) {
        return Err(DomainError::InvalidDomainName(value.to_string()));
    }
    if value == "." {
        return Ok(Arc::from("."));
    }
    if value.len() > 254 {
        return Err(DomainError::InvalidDomainName(value.to_string()));
    }
    if value.ends_with('.') {
        Ok(Arc::from(value))
    } else {
        Ok(Arc::from(format!("{}.", value)))
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
