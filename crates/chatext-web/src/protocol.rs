//! JSON messages exchanged with browser clients over `/ws`.
//!
//! Both directions are discriminated on the `type` field.

use chatext::booking::BookingAction;
use chatext::ext::ExtensionDescriptor;
use chatext::host::{Interaction, Trace};
use chatext::input::InputState;
use chatext::log::LogLine;
use chatext::view::View;
use serde::{Deserialize, Serialize};

/// Identifies one activation (one rendered container) within a connection.
pub type InstanceId = u64;

/// A message sent from the server to a client.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Sent once on connect.
    Ready {
        extensions: Vec<ExtensionDescriptor>,
    },
    /// Replace the content of an instance's container.
    Render { instance: InstanceId, view: View },
    /// Show or hide an instance's container.
    Hidden { instance: InstanceId, hidden: bool },
    /// An extension called the host's interaction callback.
    Interact {
        instance: InstanceId,
        interaction: Interaction,
    },
    /// Bring an instance's latest render into view.
    Scroll { instance: InstanceId },
    /// Restyle the chat input.
    Input { state: InputState },
    /// A log line captured from tracing.
    Log { line: LogLine },
    /// A client message could not be served.
    Error { message: String },
}

/// A message received from a client.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Dispatch a trace to the extension set.
    Trace { trace: Trace },
    /// User input for the booking session of `instance`.
    Action {
        instance: InstanceId,
        action: BookingAction,
    },
    /// The client removed the instance's container.
    Close { instance: InstanceId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_messages_deserialize() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"trace","trace":{"type":"ext_waitingAnimation","payload":{"delay":500}}}"#,
        )
        .unwrap();
        let ClientMessage::Trace { trace } = msg else {
            panic!("expected trace");
        };
        assert_eq!(trace.kind, "ext_waitingAnimation");

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"action","instance":2,"action":{"type":"select_vehicle","id":"r5t"}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Action {
                instance: 2,
                action: BookingAction::SelectVehicle { id: "r5t".into() }
            }
        );

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"close","instance":7}"#).unwrap();
        assert_eq!(msg, ClientMessage::Close { instance: 7 });
    }

    #[test]
    fn server_messages_are_type_tagged() {
        let value = serde_json::to_value(WsMessage::Interact {
            instance: 1,
            interaction: Interaction::Continue,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"type": "interact", "instance": 1, "interaction": {"type": "continue"}})
        );
        let value = serde_json::to_value(WsMessage::Hidden {
            instance: 3,
            hidden: true,
        })
        .unwrap();
        assert_eq!(value["type"], "hidden");
    }
}
