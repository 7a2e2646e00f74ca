//! Wire-level request handling shared by the UDP and TCP listeners.

use super::forwarding::MessageBuilder;
use super::resolver::ZoneResolver;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::sync::Arc;
use tracing::{debug, error};

/// Largest UDP response sent without EDNS.
pub const MAX_UDP_PAYLOAD: usize = 512;

pub struct DnsRequestHandler {
    resolver: Arc<ZoneResolver>,
}

impl DnsRequestHandler {
    pub fn new(resolver: Arc<ZoneResolver>) -> Self {
        Self { resolver }
    }

    /// Answer one raw DNS message.
    ///
    /// Returns `None` when the bytes are not a parsable query; such packets are
    /// dropped. When `max_len` is set and the answer does not fit, a truncated
    /// reply without answers is returned instead.
    pub async fn handle_raw(&self, bytes: &[u8], max_len: Option<usize>) -> Option<Vec<u8>> {
        let request = match Message::from_vec(bytes) {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, len = bytes.len(), "Dropping unparsable DNS message");
                return None;
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(id = request.id(), "Dropping DNS message that is not a query");
            return None;
        }

        let response = self.respond(&request).await;

        let encoded = match MessageBuilder::serialize_message(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, id = request.id(), "Failed to encode response");
                return None;
            }
        };

        match max_len {
            Some(limit) if encoded.len() > limit => {
                debug!(id = request.id(), size = encoded.len(), limit, "Truncating response");
                let mut truncated = Self::response_header(&request, &response);
                truncated.set_response_code(response.response_code());
                truncated.set_truncated(true);
                MessageBuilder::serialize_message(&truncated).ok()
            }
            _ => Some(encoded),
        }
    }

    async fn respond(&self, request: &Message) -> Message {
        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response.set_authoritative(true);
        response.set_recursion_desired(request.recursion_desired());

        if request.op_code() != OpCode::Query {
            response.set_response_code(ResponseCode::NotImp);
            return response;
        }

        let Some(query) = request.queries().first() else {
            response.set_response_code(ResponseCode::FormErr);
            return response;
        };

        let resolution = self
            .resolver
            .resolve(query, request.recursion_desired())
            .await;

        debug!(
            id = request.id(),
            name = %query.name(),
            query_type = ?query.query_type(),
            rcode = ?resolution.response_code,
            answers = resolution.answers.len(),
            forwarded = resolution.forwarded,
            "DNS query answered"
        );

        response.set_authoritative(resolution.authoritative);
        response.set_recursion_available(resolution.recursion_available);
        response.set_response_code(resolution.response_code);
        response.add_query(query.clone());
        response.add_answers(resolution.answers);
        response
    }

    /// Header and question of `response`, without any records.
    fn response_header(request: &Message, response: &Message) -> Message {
        let mut header = Message::new(request.id(), MessageType::Response, request.op_code());
        header.set_authoritative(response.authoritative());
        header.set_recursion_desired(response.recursion_desired());
        header.set_recursion_available(response.recursion_available());
        for query in response.queries() {
            header.add_query(query.clone());
        }
        header
    }
}
