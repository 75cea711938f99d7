use bytes::Bytes;
use serde::Deserialize;

use crate::broker::{BrokerMessage, MessageHeaders, MSG_ID_HEADER};

const CONTENT_TYPE_HEADER: &str = "content-type";
const SPEC_VERSION_HEADER: &str = "ce-specversion";
const TYPE_HEADER: &str = "ce-type";
const STRUCTURED_CONTENT_TYPE_PREFIX: &str = "application/cloudevents+";

/// How the event is laid out inside the broker message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Attributes in `ce-` headers, data in the payload.
    Binary,
    /// The whole event serialized in the payload.
    Structured,
    Unknown,
}

/// A CloudEvent read from a raw broker message.
#[derive(Debug, Clone)]
pub struct EventMessage {
    subject: String,
    headers: MessageHeaders,
    payload: Bytes,
    encoding: Encoding,
}

#[derive(Deserialize)]
struct StructuredAttributes {
    #[serde(rename = "type")]
    event_type: Option<String>,
}

impl EventMessage {
    pub fn new(msg: &dyn BrokerMessage) -> Self {
        let headers = msg.headers().clone();
        let encoding = detect_encoding(&headers);
        Self {
            subject: msg.subject().to_string(),
            headers,
            payload: msg.payload().clone(),
            encoding,
        }
    }

    pub fn read_encoding(&self) -> Encoding {
        self.encoding
    }

    /// The CloudEvent `type` attribute, if the message carries one.
    pub fn event_type(&self) -> Option<String> {
        match self.encoding {
            Encoding::Binary => self.headers.get(TYPE_HEADER).map(str::to_string),
            Encoding::Structured => serde_json::from_slice::<StructuredAttributes>(&self.payload)
                .ok()
                .and_then(|attrs| attrs.event_type),
            Encoding::Unknown => None,
        }
    }

    pub fn msg_id(&self) -> Option<&str> {
        self.headers.get(MSG_ID_HEADER)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn headers(&self) -> &MessageHeaders {
        &self.headers
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

fn detect_encoding(headers: &MessageHeaders) -> Encoding {
    let structured = headers
        .get(CONTENT_TYPE_HEADER)
        .map(|ct| ct.trim().to_ascii_lowercase())
        .is_some_and(|ct| ct.starts_with(STRUCTURED_CONTENT_TYPE_PREFIX));

    if structured {
        Encoding::Structured
    } else if headers.contains(SPEC_VERSION_HEADER) {
        Encoding::Binary
    } else {
        Encoding::Unknown
    }
}
