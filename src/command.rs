//! Configuration messages understood by the client.
//!
//! [`Command`] enumerates the acknowledged requests the client can send and
//! [`Response`] the status messages that answer them. Several requests share
//! one response (add, update and delete of an application key all answer with
//! an AppKey Status), so correlation always uses the response side.

use crate::opcode::Opcode;

/// An acknowledged configuration request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Store a new application key.
    AppKeyAdd,
    /// Remove an application key.
    AppKeyDelete,
    /// List the application keys of a network key.
    AppKeyGet,
    /// Replace an application key during key refresh.
    AppKeyUpdate,
    /// Read the secure network beacon state.
    BeaconGet,
    /// Write the secure network beacon state.
    BeaconSet,
    /// Read a composition data page.
    CompositionDataGet,
    /// Read the default TTL.
    DefaultTtlGet,
    /// Write the default TTL.
    DefaultTtlSet,
    /// Read the friend feature state.
    FriendGet,
    /// Write the friend feature state.
    FriendSet,
    /// Read the GATT proxy state.
    GattProxyGet,
    /// Write the GATT proxy state.
    GattProxySet,
    /// Bind an application key to a model.
    ModelAppBind,
    /// Remove a model's application key binding.
    ModelAppUnbind,
    /// Remove the node from the network.
    NodeReset,
    /// Read the relay state and retransmit parameters.
    RelayGet,
    /// Write the relay state and retransmit parameters.
    RelaySet,
}

/// A status message answering a [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Response {
    /// Application key indices bound to a network key.
    AppKeyList,
    /// Outcome of an application key add, update or delete.
    AppKeyStatus,
    /// Secure network beacon state.
    BeaconStatus,
    /// Composition data page.
    CompositionDataStatus,
    /// Default TTL.
    DefaultTtlStatus,
    /// Friend feature state.
    FriendStatus,
    /// GATT proxy state.
    GattProxyStatus,
    /// Outcome of a model bind or unbind.
    ModelAppStatus,
    /// Acknowledgement of a node reset.
    NodeResetStatus,
    /// Relay state and retransmit parameters.
    RelayStatus,
}

impl Command {
    /// Every command, in opcode order.
    pub const ALL: [Command; 18] = [
        Command::AppKeyAdd,
        Command::AppKeyUpdate,
        Command::AppKeyDelete,
        Command::AppKeyGet,
        Command::CompositionDataGet,
        Command::BeaconGet,
        Command::BeaconSet,
        Command::DefaultTtlGet,
        Command::DefaultTtlSet,
        Command::FriendGet,
        Command::FriendSet,
        Command::GattProxyGet,
        Command::GattProxySet,
        Command::RelayGet,
        Command::RelaySet,
        Command::ModelAppBind,
        Command::ModelAppUnbind,
        Command::NodeReset,
    ];

    /// Wire opcode of the request.
    #[must_use]
    pub const fn opcode(self) -> Opcode {
        Opcode::new(match self {
            Command::AppKeyAdd => 0x00,
            Command::AppKeyUpdate => 0x01,
            Command::AppKeyDelete => 0x8000,
            Command::AppKeyGet => 0x8001,
            Command::CompositionDataGet => 0x8008,
            Command::BeaconGet => 0x8009,
            Command::BeaconSet => 0x800A,
            Command::DefaultTtlGet => 0x800C,
            Command::DefaultTtlSet => 0x800D,
            Command::FriendGet => 0x800F,
            Command::FriendSet => 0x8010,
            Command::GattProxyGet => 0x8012,
            Command::GattProxySet => 0x8013,
            Command::RelayGet => 0x8026,
            Command::RelaySet => 0x8027,
            Command::ModelAppBind => 0x803D,
            Command::ModelAppUnbind => 0x803F,
            Command::NodeReset => 0x8049,
        })
    }

    /// Status message expected in reply.
    #[must_use]
    pub const fn response(self) -> Response {
        match self {
            Command::AppKeyAdd | Command::AppKeyUpdate | Command::AppKeyDelete => {
                Response::AppKeyStatus
            }
            Command::AppKeyGet => Response::AppKeyList,
            Command::CompositionDataGet => Response::CompositionDataStatus,
            Command::BeaconGet | Command::BeaconSet => Response::BeaconStatus,
            Command::DefaultTtlGet | Command::DefaultTtlSet => Response::DefaultTtlStatus,
            Command::FriendGet | Command::FriendSet => Response::FriendStatus,
            Command::GattProxyGet | Command::GattProxySet => Response::GattProxyStatus,
            Command::RelayGet | Command::RelaySet => Response::RelayStatus,
            Command::ModelAppBind | Command::ModelAppUnbind => Response::ModelAppStatus,
            Command::NodeReset => Response::NodeResetStatus,
        }
    }

    /// Human-readable tag recorded with pending requests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Command::AppKeyAdd => "AppKeyAdd",
            Command::AppKeyDelete => "AppKeyDelete",
            Command::AppKeyGet => "AppKeyGet",
            Command::AppKeyUpdate => "AppKeyUpdate",
            Command::BeaconGet => "BeaconGet",
            Command::BeaconSet => "BeaconSet",
            Command::CompositionDataGet => "DeviceCompositionGet",
            Command::DefaultTtlGet => "DefaultTTLGet",
            Command::DefaultTtlSet => "DefaultTTLSet",
            Command::FriendGet => "FriendGet",
            Command::FriendSet => "FriendSet",
            Command::GattProxyGet => "GATTProxyGet",
            Command::GattProxySet => "GATTProxySet",
            Command::ModelAppBind => "ModelAppBind",
            Command::ModelAppUnbind => "ModelAppUnbind",
            Command::NodeReset => "NodeReset",
            Command::RelayGet => "RelayGet",
            Command::RelaySet => "RelaySet",
        }
    }

    /// Look up the command for a request opcode.
    ///
    /// The unreliable flag is masked before matching. Opcodes that expect no
    /// reply return `None`.
    #[must_use]
    pub fn from_opcode(opcode: Opcode) -> Option<Self> {
        let opcode = opcode.reliable();
        Self::ALL.into_iter().find(|command| command.opcode() == opcode)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}

impl Response {
    /// Every response, in opcode order.
    pub const ALL: [Response; 10] = [
        Response::CompositionDataStatus,
        Response::AppKeyList,
        Response::AppKeyStatus,
        Response::BeaconStatus,
        Response::DefaultTtlStatus,
        Response::FriendStatus,
        Response::GattProxyStatus,
        Response::RelayStatus,
        Response::ModelAppStatus,
        Response::NodeResetStatus,
    ];

    /// Wire opcode of the status message.
    #[must_use]
    pub const fn opcode(self) -> Opcode {
        Opcode::new(match self {
            Response::CompositionDataStatus => 0x02,
            Response::AppKeyList => 0x8002,
            Response::AppKeyStatus => 0x8003,
            Response::BeaconStatus => 0x800B,
            Response::DefaultTtlStatus => 0x800E,
            Response::FriendStatus => 0x8011,
            Response::GattProxyStatus => 0x8014,
            Response::RelayStatus => 0x8028,
            Response::ModelAppStatus => 0x803E,
            Response::NodeResetStatus => 0x804A,
        })
    }

    /// Look up the response for a status opcode, ignoring the unreliable flag.
    #[must_use]
    pub fn from_opcode(opcode: Opcode) -> Option<Self> {
        let opcode = opcode.reliable();
        Self::ALL.into_iter().find(|response| response.opcode() == opcode)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::{Command, Response};
    use crate::opcode::Opcode;

    #[test]
    fn opcodes_are_unique_across_requests_and_responses() {
        let mut seen = HashSet::new();
        for opcode in Command::ALL
            .iter()
            .map(|c| c.opcode())
            .chain(Response::ALL.iter().map(|r| r.opcode()))
        {
            assert!(seen.insert(opcode), "duplicate opcode {opcode}");
        }
    }

    #[test]
    fn every_opcode_round_trips_through_lookup() {
        for command in Command::ALL {
            assert_eq!(Command::from_opcode(command.opcode()), Some(command));
        }
        for response in Response::ALL {
            assert_eq!(Response::from_opcode(response.opcode()), Some(response));
        }
    }

    #[rstest]
    #[case(Command::AppKeyAdd)]
    #[case(Command::AppKeyUpdate)]
    #[case(Command::AppKeyDelete)]
    fn app_key_mutations_share_status(#[case] command: Command) {
        assert_eq!(command.response(), Response::AppKeyStatus);
    }

    #[test]
    fn status_opcodes_have_no_command() {
        assert_eq!(Command::from_opcode(Response::AppKeyStatus.opcode()), None);
        assert_eq!(Command::from_opcode(Opcode::new(0x00C0_0001)), None);
    }

    #[test]
    fn lookup_masks_unreliable_flag() {
        assert_eq!(Response::from_opcode(Opcode::new(0x8108)), None);
        assert_eq!(
            Response::from_opcode(Opcode::new(0x8103)),
            Some(Response::AppKeyStatus)
        );
        assert_eq!(
            Command::from_opcode(Opcode::new(0x8108)),
            Some(Command::CompositionDataGet)
        );
    }
}
