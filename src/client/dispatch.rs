//! Inbound access message handling.

use tracing::{debug, info};

use super::ConfigClient;
use crate::{
    byte_order::le_u16_at,
    command::Response,
    composition,
    configuration::{
        Configuration,
        FeatureState,
        MAX_KEY_INDEX,
        ModelId,
        RelayRetransmit,
        StatusCode,
        unpack_key_indices,
    },
    metrics::{self, DropReason},
    observer::{ConfigEvent, ConfigObserver},
    opcode,
    transport::AccessTransport,
};

impl<T, O> ConfigClient<T, O>
where
    T: AccessTransport,
    O: ConfigObserver,
{
    /// Feed an access message received from `source` to the client.
    ///
    /// A status message that answers an outstanding request resolves it: the
    /// request's timer is cancelled and the decoded status is passed to the
    /// observer. Messages that answer nothing, carry an undecodable opcode or
    /// have parameters of the wrong length are dropped without notifying the
    /// observer. A matched request whose status is malformed is still
    /// resolved and will not time out.
    pub fn handle_access_message(&self, source: u16, payload: &[u8]) {
        let (opcode, consumed) = match opcode::decode(payload) {
            Ok(decoded) => decoded,
            Err(err) => {
                debug!(source, error = %err, "dropping access message with undecodable opcode");
                metrics::inc_dropped(DropReason::Opcode);
                return;
            }
        };
        let opcode = opcode.reliable();

        let Some(resolved) = self.pending.remove(opcode, source).into_iter().next() else {
            debug!(%opcode, source, "dropping unsolicited access message");
            metrics::inc_dropped(DropReason::Unsolicited);
            return;
        };
        let request = resolved.request();
        let params = payload.get(consumed..).unwrap_or_default();

        let Some(configuration) = decode_status(resolved.response(), params) else {
            debug!(
                %request,
                source,
                len = params.len(),
                "dropping malformed status message"
            );
            metrics::inc_dropped(DropReason::Malformed);
            return;
        };

        metrics::inc_matched(request);
        info!(%request, address = source, "configuration request resolved");
        self.observer.on_config_result(ConfigEvent {
            request,
            address: source,
            outcome: Ok(configuration),
        });
    }
}

fn exact<const N: usize>(params: &[u8]) -> Option<[u8; N]> { params.try_into().ok() }

/// Decode the parameters of a status message.
///
/// Returns `None` when the length or content does not fit the message.
pub(crate) fn decode_status(response: Response, params: &[u8]) -> Option<Configuration> {
    match response {
        Response::CompositionDataStatus => composition::decode(params)
            .ok()
            .map(Configuration::Composition),
        Response::DefaultTtlStatus => {
            exact::<1>(params).map(|[ttl]| Configuration::DefaultTtl(ttl))
        }
        Response::GattProxyStatus => {
            let [state] = exact::<1>(params)?;
            FeatureState::try_from(state).ok().map(Configuration::GattProxy)
        }
        Response::FriendStatus => {
            let [state] = exact::<1>(params)?;
            FeatureState::try_from(state).ok().map(Configuration::Friend)
        }
        Response::RelayStatus => {
            let [state, retransmit] = exact::<2>(params)?;
            Some(Configuration::Relay {
                state: FeatureState::try_from(state).ok()?,
                retransmit: RelayRetransmit::decode(retransmit),
            })
        }
        Response::BeaconStatus => match exact::<1>(params)? {
            [0x00] => Some(Configuration::Beacon(false)),
            [0x01] => Some(Configuration::Beacon(true)),
            _ => None,
        },
        Response::AppKeyStatus => {
            let [status, packed @ ..] = exact::<4>(params)?;
            let (net_idx, app_idx) = unpack_key_indices(&packed)?;
            Some(Configuration::AppKeyStatus {
                status: StatusCode::from(status),
                net_idx,
                app_idx,
            })
        }
        Response::AppKeyList => decode_app_key_list(params),
        Response::ModelAppStatus => {
            let (&status, rest) = params.split_first()?;
            let model = rest.get(4..)?;
            if !matches!(model.len(), 2 | 4) {
                return None;
            }
            Some(Configuration::ModelApp {
                status: StatusCode::from(status),
                element: le_u16_at(rest, 0)?,
                app_idx: le_u16_at(rest, 2)?,
                model: ModelId::read(model)?,
            })
        }
        Response::NodeResetStatus => params.is_empty().then_some(Configuration::NodeReset),
    }
}

/// Application key indices are packed two per three bytes; an odd count
/// ends with a two-byte index.
fn decode_app_key_list(params: &[u8]) -> Option<Configuration> {
    let (&status, rest) = params.split_first()?;
    let net_idx = le_u16_at(rest, 0)?;
    let packed = rest.get(2..)?;

    let mut chunks = packed.chunks_exact(3);
    let mut app_keys = Vec::with_capacity(packed.len() * 2 / 3 + 1);
    for chunk in chunks.by_ref() {
        let (first, second) = unpack_key_indices(chunk)?;
        app_keys.push(first);
        app_keys.push(second);
    }
    match chunks.remainder() {
        [] => {}
        tail @ [_, _] => app_keys.push(le_u16_at(tail, 0)? & MAX_KEY_INDEX),
        _ => return None,
    }

    Some(Configuration::AppKeyList {
        status: StatusCode::from(status),
        net_idx,
        app_keys,
    })
}
