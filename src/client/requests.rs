//! Request builders for each supported configuration message.
//!
//! Every method returns as soon as the message has been handed to the
//! transport. The decoded reply, or a timeout, reaches the observer later.
//!
//! # Errors
//!
//! All methods fail with [`ConfigError::Busy`](crate::ConfigError::Busy)
//! when a request awaiting the same status message from the node is still
//! outstanding, with [`ConfigError::ParamInvalid`](crate::ConfigError::ParamInvalid)
//! when a parameter is out of range, and with
//! [`ConfigError::Transport`](crate::ConfigError::Transport) when the
//! transport refuses the message. Nothing is transmitted in the first two
//! cases.

use super::ConfigClient;
use crate::{
    byte_order::write_le_u16,
    command::Command,
    configuration::{
        APP_KEY_LEN,
        FeatureState,
        ModelId,
        RelayRetransmit,
        check_key_index,
        check_ttl,
        pack_key_indices,
    },
    error::Result,
    observer::ConfigObserver,
    transport::AccessTransport,
};

/// Composition data page requested from nodes.
const COMPOSITION_PAGE: u8 = 0x00;

#[expect(
    clippy::missing_errors_doc,
    reason = "error conditions are shared and documented at module level"
)]
impl<T, O> ConfigClient<T, O>
where
    T: AccessTransport,
    O: ConfigObserver,
{
    /// Request page zero of the node's composition data.
    pub async fn get_composition(&self, destination: u16) -> Result<()> {
        self.send_request(Command::CompositionDataGet, destination, &[COMPOSITION_PAGE])
            .await
    }

    /// Request the node's default TTL.
    pub async fn get_default_ttl(&self, destination: u16) -> Result<()> {
        self.send_request(Command::DefaultTtlGet, destination, &[])
            .await
    }

    /// Set the node's default TTL. Valid values are 0 and 2 through 127.
    pub async fn set_default_ttl(&self, destination: u16, ttl: u8) -> Result<()> {
        let ttl = check_ttl(ttl)?;
        self.send_request(Command::DefaultTtlSet, destination, &[ttl])
            .await
    }

    /// Request the node's GATT proxy state.
    pub async fn get_gatt_proxy(&self, destination: u16) -> Result<()> {
        self.send_request(Command::GattProxyGet, destination, &[])
            .await
    }

    /// Enable or disable the node's GATT proxy.
    pub async fn set_gatt_proxy(&self, destination: u16, state: FeatureState) -> Result<()> {
        let state = state.settable()?;
        self.send_request(Command::GattProxySet, destination, &[state])
            .await
    }

    /// Request the node's relay state and retransmission parameters.
    pub async fn get_relay(&self, destination: u16) -> Result<()> {
        self.send_request(Command::RelayGet, destination, &[]).await
    }

    /// Set the node's relay state and retransmission parameters.
    pub async fn set_relay(
        &self,
        destination: u16,
        state: FeatureState,
        retransmit: RelayRetransmit,
    ) -> Result<()> {
        let params = [state.settable()?, retransmit.encode()?];
        self.send_request(Command::RelaySet, destination, &params)
            .await
    }

    /// Request the node's secure network beacon state.
    pub async fn get_beacon(&self, destination: u16) -> Result<()> {
        self.send_request(Command::BeaconGet, destination, &[]).await
    }

    /// Enable or disable the node's secure network beacon.
    pub async fn set_beacon(&self, destination: u16, enabled: bool) -> Result<()> {
        self.send_request(Command::BeaconSet, destination, &[u8::from(enabled)])
            .await
    }

    /// Request the node's friend feature state.
    pub async fn get_friend(&self, destination: u16) -> Result<()> {
        self.send_request(Command::FriendGet, destination, &[]).await
    }

    /// Enable or disable the node's friend feature.
    pub async fn set_friend(&self, destination: u16, state: FeatureState) -> Result<()> {
        let state = state.settable()?;
        self.send_request(Command::FriendSet, destination, &[state])
            .await
    }

    /// List the application keys bound to network key `net_idx`.
    pub async fn get_app_keys(&self, destination: u16, net_idx: u16) -> Result<()> {
        let net_idx = check_key_index(net_idx)?;
        self.send_request(Command::AppKeyGet, destination, &write_le_u16(net_idx))
            .await
    }

    /// Add an application key bound to network key `net_idx`.
    pub async fn add_app_key(
        &self,
        destination: u16,
        net_idx: u16,
        app_idx: u16,
        key: &[u8; APP_KEY_LEN],
    ) -> Result<()> {
        let params = app_key_params(net_idx, app_idx, Some(key))?;
        self.send_request(Command::AppKeyAdd, destination, &params)
            .await
    }

    /// Replace an application key during a key refresh.
    pub async fn update_app_key(
        &self,
        destination: u16,
        net_idx: u16,
        app_idx: u16,
        key: &[u8; APP_KEY_LEN],
    ) -> Result<()> {
        let params = app_key_params(net_idx, app_idx, Some(key))?;
        self.send_request(Command::AppKeyUpdate, destination, &params)
            .await
    }

    /// Remove an application key from the node.
    pub async fn delete_app_key(&self, destination: u16, net_idx: u16, app_idx: u16) -> Result<()> {
        let params = app_key_params(net_idx, app_idx, None)?;
        self.send_request(Command::AppKeyDelete, destination, &params)
            .await
    }

    /// Bind application key `app_idx` to `model` on the element at
    /// `element`.
    pub async fn bind_model_app(
        &self,
        destination: u16,
        element: u16,
        app_idx: u16,
        model: ModelId,
    ) -> Result<()> {
        let params = model_app_params(element, app_idx, model)?;
        self.send_request(Command::ModelAppBind, destination, &params)
            .await
    }

    /// Remove the binding between application key `app_idx` and `model`.
    pub async fn unbind_model_app(
        &self,
        destination: u16,
        element: u16,
        app_idx: u16,
        model: ModelId,
    ) -> Result<()> {
        let params = model_app_params(element, app_idx, model)?;
        self.send_request(Command::ModelAppUnbind, destination, &params)
            .await
    }

    /// Ask the node to leave the network.
    pub async fn reset_node(&self, destination: u16) -> Result<()> {
        self.send_request(Command::NodeReset, destination, &[]).await
    }
}

fn app_key_params(net_idx: u16, app_idx: u16, key: Option<&[u8; APP_KEY_LEN]>) -> Result<Vec<u8>> {
    let packed = pack_key_indices(check_key_index(net_idx)?, check_key_index(app_idx)?);
    let mut params = Vec::with_capacity(packed.len() + APP_KEY_LEN);
    params.extend_from_slice(&packed);
    if let Some(key) = key {
        params.extend_from_slice(key);
    }
    Ok(params)
}

fn model_app_params(element: u16, app_idx: u16, model: ModelId) -> Result<Vec<u8>> {
    let mut params = Vec::with_capacity(8);
    params.extend_from_slice(&write_le_u16(element));
    params.extend_from_slice(&write_le_u16(check_key_index(app_idx)?));
    model.write(&mut params);
    Ok(params)
}
