//! DevTools wire messages.
//!
//! Only the slice of the protocol that page loading, element lookup and
//! clicking touches is modelled here; every other payload stays a `Value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::CdpError;

/// Outgoing command frame.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Any frame read off the socket, before it is routed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbound {
    id: Option<u64>,
    result: Option<Value>,
    error: Option<Fault>,
    method: Option<String>,
    params: Option<Value>,
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Fault {
    code: i64,
    message: String,
}

/// Where an inbound frame goes.
#[derive(Debug)]
pub enum Routed {
    /// Reply to command `id`.
    Reply {
        id: u64,
        result: Result<Value, CdpError>,
    },
    /// Event for a page session; browser-level events carry an empty session id.
    Event { session_id: String, event: PageEvent },
    /// Neither an id nor a method.
    Ignored,
}

impl Inbound {
    pub fn route(self) -> Routed {
        if let Some(id) = self.id {
            let result = match self.error {
                Some(fault) => Err(CdpError::Protocol {
                    code: fault.code,
                    message: fault.message,
                }),
                None => Ok(self.result.unwrap_or(Value::Null)),
            };
            return Routed::Reply { id, result };
        }
        match self.method {
            Some(method) => Routed::Event {
                session_id: self.session_id.unwrap_or_default(),
                event: PageEvent {
                    method,
                    params: self.params.unwrap_or(Value::Null),
                },
            },
            None => Routed::Ignored,
        }
    }
}

/// Event delivered to a page session.
#[derive(Debug, Clone)]
pub struct PageEvent {
    pub method: String,
    pub params: Value,
}

/// Body of `GET /json/version`. Chrome uses header-style keys here.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Handle to a JS value living in the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    pub subtype: Option<String>,
    pub object_id: Option<String>,
}

impl RemoteObject {
    /// Object id of a non-null object reference.
    pub fn into_object_id(self) -> Option<String> {
        if self.subtype.as_deref() == Some("null") {
            return None;
        }
        self.object_id
    }
}

/// Own property of a remote object, from `Runtime.getProperties`.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub value: Option<RemoteObject>,
}

/// `Input.dispatchMouseEvent` phases used by a left click.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventType {
    MouseMoved,
    MousePressed,
    MouseReleased,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
