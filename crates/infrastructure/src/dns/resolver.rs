use super::forwarding::UpstreamForwarder;
use super::zone_index::ZoneIndex;
use hickory_proto::op::{Query, ResponseCode};
use hickory_proto::rr::{Record, RecordType};
use std::sync::Arc;
use tracing::debug;

/// Result of answering one question.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub answers: Vec<Record>,

    pub response_code: ResponseCode,

    pub authoritative: bool,

    pub recursion_available: bool,

    /// True when the answer came from an upstream.
    pub forwarded: bool,
}

/// Answers from the zone index first and falls back to the upstream forwarder.
pub struct ZoneResolver {
    index: Arc<ZoneIndex>,
    forwarder: Arc<UpstreamForwarder>,
}

impl ZoneResolver {
    pub fn new(index: Arc<ZoneIndex>, forwarder: Arc<UpstreamForwarder>) -> Self {
        Self { index, forwarder }
    }

    /// Index key for a query name: lower-cased, absolute.
    pub fn lookup_key(query: &Query) -> String {
        let mut key = query.name().to_ascii().to_ascii_lowercase();
        if !key.ends_with('.') {
            key.push('.');
        }
        key
    }

    /// Stored records answering `query_type`. `ANY` takes everything; an `A`
    /// question also takes co-located CNAMEs, which are not chased.
    pub fn matching_records(records: &[Record], query_type: RecordType) -> Vec<Record> {
        records
            .iter()
            .filter(|record| {
                let record_type = record.record_type();
                query_type == RecordType::ANY
                    || record_type == query_type
                    || (query_type == RecordType::A && record_type == RecordType::CNAME)
            })
            .cloned()
            .collect()
    }

    pub async fn resolve(&self, query: &Query, recursion_desired: bool) -> Resolution {
        let recursion_available = self.forwarder.has_upstreams();
        let key = Self::lookup_key(query);

        let local = self
            .index
            .lookup(&key)
            .map(|records| Self::matching_records(&records, query.query_type()))
            .unwrap_or_default();

        if !local.is_empty() {
            debug!(name = %key, query_type = ?query.query_type(), answers = local.len(), "Answered from zone index");
            return Resolution {
                answers: local,
                response_code: ResponseCode::NoError,
                authoritative: true,
                recursion_available,
                forwarded: false,
            };
        }

        if recursion_available {
            match self.forwarder.forward(query, recursion_desired).await {
                Ok(response) => {
                    debug!(
                        name = %key,
                        upstream = %response.upstream,
                        answers = response.answers.len(),
                        "Answered by upstream"
                    );
                    return Resolution {
                        answers: response.answers,
                        response_code: response.response_code,
                        authoritative: true,
                        recursion_available,
                        forwarded: true,
                    };
                }
                Err(e) => {
                    debug!(name = %key, error = %e, "Forwarding failed");
                }
            }
        }

        Resolution {
            answers: Vec::new(),
            response_code: ResponseCode::NXDomain,
            authoritative: true,
            recursion_available,
            forwarded: false,
        }
    }
}
