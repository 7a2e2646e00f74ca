//! Conversion of stored zone data into wire records.

use ferrous_zones_domain::{DomainError, Record as ZoneRecord, RecordData, Zone};
use hickory_proto::rr::rdata::{self, CNAME, MX, NS, PTR, SOA, SRV, TXT};
use hickory_proto::rr::{Name, RData, Record};
use std::str::FromStr;

/// Longest character-string a TXT record may carry.
const TXT_CHUNK_LEN: usize = 255;

pub fn parse_name(name: &str) -> Result<Name, DomainError> {
    Name::from_str(name)
        .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", name, e)))
}

/// SOA refresh/retry/expire are 31-bit on the wire.
fn soa_interval<T: TryFrom<u32> + Default>(value: u32) -> T {
    T::try_from(value.min(i32::MAX as u32)).unwrap_or_default()
}

pub fn soa_record(zone: &Zone) -> Result<Record, DomainError> {
    let soa = SOA::new(
        parse_name(&zone.ns)?,
        parse_name(&zone.admin)?,
        zone.serial,
        soa_interval(zone.refresh),
        soa_interval(zone.retry),
        soa_interval(zone.expire),
        zone.ttl,
    );
    Ok(Record::from_rdata(
        parse_name(&zone.name)?,
        zone.ttl,
        RData::SOA(soa),
    ))
}

pub fn ns_record(zone: &Zone) -> Result<Record, DomainError> {
    Ok(Record::from_rdata(
        parse_name(&zone.name)?,
        zone.ttl,
        RData::NS(NS(parse_name(&zone.ns)?)),
    ))
}

pub fn to_rdata(data: &RecordData) -> Result<RData, DomainError> {
    let rdata = match data {
        RecordData::A(ip) => RData::A(rdata::A(*ip)),
        RecordData::AAAA(ip) => RData::AAAA(rdata::AAAA(*ip)),
        RecordData::CNAME(target) => RData::CNAME(CNAME(parse_name(target)?)),
        RecordData::NS(target) => RData::NS(NS(parse_name(target)?)),
        RecordData::PTR(target) => RData::PTR(PTR(parse_name(target)?)),
        RecordData::MX {
            preference,
            exchange,
        } => RData::MX(MX::new(*preference, parse_name(exchange)?)),
        RecordData::TXT(text) => RData::TXT(TXT::new(txt_chunks(text))),
        RecordData::SRV {
            priority,
            weight,
            port,
            target,
        } => RData::SRV(SRV::new(*priority, *weight, *port, parse_name(target)?)),
    };
    Ok(rdata)
}

/// Wire record for a stored record of `zone`.
pub fn to_wire_record(zone: &Zone, record: &ZoneRecord) -> Result<Record, DomainError> {
    let owner = parse_name(&record.owner_fqdn(&zone.name))?;
    let rdata = to_rdata(&record.data()?)?;
    Ok(Record::from_rdata(
        owner,
        record.effective_ttl(zone.ttl),
        rdata,
    ))
}

/// Split text into character-strings of at most 255 bytes without breaking a
/// UTF-8 sequence.
pub fn txt_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if current.len() + ch.len_utf8() > TXT_CHUNK_LEN {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
