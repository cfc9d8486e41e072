// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet discovery for one PDU.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use crate::device::{HubId, Outlet};
use crate::error::Result;
use crate::protocol::{HttpClient, PduConfig, Protocol};
use crate::types::OutletNumber;

/// A PDU and the outlets discovered on it.
///
/// [`connect`](Self::connect) asks the device for its outlet names and
/// creates one [`Outlet`] per name, numbered from 1 in the order the device
/// lists them. Each successful connect replaces the whole outlet list.
///
/// # Examples
///
/// ```no_run
/// use dlpdu_lib::device::PduHub;
/// use dlpdu_lib::protocol::PduConfig;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> dlpdu_lib::Result<()> {
/// let hub = PduHub::http(PduConfig::new("192.168.1.20", "admin", "1234"))?;
///
/// if hub.connect(&CancellationToken::new()).await {
///     for outlet in hub.outlets() {
///         println!("{}: {}", outlet.number(), outlet.name());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PduHub<P: Protocol> {
    id: HubId,
    server_address: String,
    protocol: Arc<P>,
    outlets: RwLock<Vec<Arc<Outlet<P>>>>,
    connected: AtomicBool,
}

impl PduHub<HttpClient> {
    /// Creates a hub for the PDU described by `config`.
    ///
    /// No request is sent until [`connect`](Self::connect).
    ///
    /// # Errors
    ///
    /// Returns error if a setting is empty or the HTTP client cannot be
    /// created.
    pub fn http(config: PduConfig) -> Result<Self> {
        let server_address = config.server_address().to_string();
        let client = config.into_client()?;
        Ok(Self::new(server_address, client))
    }
}

impl<P: Protocol> PduHub<P> {
    /// Creates a disconnected hub using `protocol` for all requests.
    pub fn new(server_address: impl Into<String>, protocol: P) -> Self {
        Self {
            id: HubId::new(),
            server_address: server_address.into(),
            protocol: Arc::new(protocol),
            outlets: RwLock::new(Vec::new()),
            connected: AtomicBool::new(false),
        }
    }

    /// Returns the hub id.
    #[must_use]
    pub fn id(&self) -> HubId {
        self.id
    }

    /// Returns the display name, derived from the server address.
    #[must_use]
    pub fn name(&self) -> String {
        format!("DlLink {}", self.server_address)
    }

    /// Returns a short description of the device family.
    #[must_use]
    pub fn description(&self) -> &'static str {
        "Digital Logger Outlets"
    }

    /// Returns the server address.
    #[must_use]
    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    /// Returns the protocol client shared with the outlets.
    #[must_use]
    pub fn protocol(&self) -> &Arc<P> {
        &self.protocol
    }

    /// Returns `true` after a successful [`connect`](Self::connect).
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Returns the discovered outlets in outlet-number order.
    #[must_use]
    pub fn outlets(&self) -> Vec<Arc<Outlet<P>>> {
        self.outlets.read().clone()
    }

    /// Returns the number of discovered outlets.
    #[must_use]
    pub fn outlet_count(&self) -> usize {
        self.outlets.read().len()
    }

    /// Looks up an outlet by its one-based number.
    #[must_use]
    pub fn outlet(&self, number: u32) -> Option<Arc<Outlet<P>>> {
        self.outlets
            .read()
            .iter()
            .find(|outlet| outlet.number().value() == number)
            .cloned()
    }

    /// Discovers the outlets on the device.
    ///
    /// On success the outlet list is replaced by one outlet per name and
    /// `true` is returned; an empty name list is a success with zero
    /// outlets. On any failure, cancellation included, the list is cleared
    /// and the hub is marked disconnected.
    pub async fn connect(&self, cancel: &CancellationToken) -> bool {
        match self.protocol.outlet_names(cancel).await {
            Ok(names) => {
                let outlets: Vec<_> = (0_u32..)
                    .zip(names)
                    .map(|(position, name)| {
                        let number = OutletNumber::from_position(position);
                        tracing::debug!(outlet = number.value(), name = %name, "Discovered outlet");
                        Arc::new(Outlet::new(Arc::clone(&self.protocol), name, number))
                    })
                    .collect();

                tracing::debug!(
                    server = %self.server_address,
                    count = outlets.len(),
                    "Connected to PDU"
                );

                *self.outlets.write() = outlets;
                self.connected.store(true, Ordering::Release);
                true
            }
            Err(e) => {
                tracing::error!(
                    server = %self.server_address,
                    error = %e,
                    "Failed to connect to PDU"
                );
                self.outlets.write().clear();
                self.connected.store(false, Ordering::Release);
                false
            }
        }
    }

    /// Drops all discovered outlets.
    ///
    /// The connected flag is left as it is; call [`connect`](Self::connect)
    /// again to repopulate the outlets.
    pub fn disconnect(&self) {
        self.outlets.write().clear();
        tracing::debug!(server = %self.server_address, "Cleared PDU outlets");
    }
}
