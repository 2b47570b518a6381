//! The autoconfiguration controller.
//!
//! Drives one complete claim: open the device, derive candidates from its
//! identity, probe them for conflicts, install the surviving address,
//! announce it, and persist the resulting configuration. Failures after
//! the address is installed never roll earlier steps back.

use std::{net::Ipv4Addr, sync::Arc};

use linklocal_core::{
    constants,
    device::{LinkDevice, RouteTable, SettingsStore},
    error::{AutoconfError, AutoconfResult},
    jitter::{JitterSource, ThreadJitter},
    time::{Clock, SystemClock},
};

use crate::{
    announce::announce_claim,
    candidate::candidate_address,
    claim_state::ClaimState,
    probe::{probe_candidate, ProbeVerdict},
};

/// Inputs of one autoconfiguration run beyond the device itself.
#[derive(Debug, Clone, Default)]
pub struct ClaimRequest {
    /// Default gateway to install and persist.
    ///
    /// `None` and 0.0.0.0 both mean no gateway.
    pub gateway: Option<Ipv4Addr>,

    /// Additional settings persisted after the standard ones, as
    /// (name, value) pairs in order.
    pub settings: Vec<(String, String)>,
}

/// The configuration produced by a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfiguredAddress {
    /// The claimed link-local address.
    pub address: Ipv4Addr,
    /// Netmask of the link-local network.
    pub netmask: Ipv4Addr,
    /// Gateway that was installed, if any.
    pub gateway: Option<Ipv4Addr>,
}

/// Autoconfiguration controller.
///
/// Owns the time and jitter sources; the device, route table and settings
/// store are borrowed per run. [`state`](Autoconf::state) reports how far
/// the most recent run got, which on failure tells the caller which side
/// effects are already in place.
pub struct Autoconf {
    clock: Arc<dyn Clock>,
    jitter: Box<dyn JitterSource>,
    state: ClaimState,
}

impl Autoconf {
    /// Creates a controller on the system clock and thread-local jitter.
    pub fn new() -> Self {
        Self::with_sources(Arc::new(SystemClock), Box::new(ThreadJitter))
    }

    /// Creates a controller with explicit time and jitter sources.
    pub fn with_sources(clock: Arc<dyn Clock>, jitter: Box<dyn JitterSource>) -> Self {
        Autoconf {
            clock,
            jitter,
            state: ClaimState::Idle,
        }
    }

    /// Returns how far the most recent run got.
    pub fn state(&self) -> ClaimState {
        self.state
    }

    /// Claims, announces and persists a link-local address on `device`.
    ///
    /// Tries up to [`constants::MAX_ATTEMPTS`] candidate addresses; a
    /// conflicting or untransmittable probe moves on to the next candidate.
    /// The first candidate that survives probing is installed in `routes`,
    /// announced on the link, and written to `store` along with the netmask,
    /// the gateway when present, and the request's extra settings, in that
    /// order.
    pub fn run<D: LinkDevice>(
        &mut self,
        device: &mut D,
        routes: &mut dyn RouteTable,
        store: &mut dyn SettingsStore,
        request: &ClaimRequest,
    ) -> AutoconfResult<ConfiguredAddress> {
        self.state = ClaimState::Idle;
        let started = self.clock.now();

        // Snapshot the identity; later steps borrow the device mutably
        let mut identity_buf = [0u8; constants::MAX_LINK_ADDR_LEN];
        let identity_len = match device.link_addr() {
            Some(addr) if !addr.is_empty() => {
                let len = addr.len().min(constants::MAX_LINK_ADDR_LEN);
                identity_buf[..len].copy_from_slice(&addr[..len]);
                len
            }
            _ => {
                return Err(AutoconfError::DeviceUnready {
                    device: device.name().to_string(),
                })
            }
        };
        let identity = &identity_buf[..identity_len];

        if !device.is_open() {
            if let Err(err) = device.open() {
                return Err(AutoconfError::OpenFailed {
                    device: device.name().to_string(),
                    source: err,
                });
            }
        }

        if !device.is_link_up() {
            return Err(AutoconfError::LinkDown {
                device: device.name().to_string(),
            });
        }

        tracing::info!("Configuring {} with a link-local address", device.name());

        let netmask = Ipv4Addr::from(constants::LINK_LOCAL_NETMASK);
        let gateway = request.gateway.filter(|gateway| !gateway.is_unspecified());

        // RFC 3927 section 2.1: wait up to a second before the first probe
        let delay = self.jitter.sample(constants::JITTER_BOUND);
        self.clock.sleep(delay);

        let mut claimed = None;
        for attempt in 0..constants::MAX_ATTEMPTS {
            self.state = ClaimState::Probing;
            let candidate = candidate_address(identity, attempt);
            match probe_candidate(
                device,
                self.clock.as_ref(),
                self.jitter.as_mut(),
                identity,
                candidate,
            ) {
                ProbeVerdict::Clear => {
                    claimed = Some((attempt, candidate));
                    break;
                }
                ProbeVerdict::Conflict => {
                    tracing::debug!(
                        "{} candidate {} is already in use",
                        device.name(),
                        candidate
                    );
                }
                ProbeVerdict::TransmitFailed(err) => {
                    tracing::warn!("{} probe for {} failed: {}", device.name(), candidate, err);
                }
            }
        }

        let (attempt, address) = match claimed {
            Some(claim) => claim,
            None => {
                return Err(AutoconfError::AddressInUse {
                    device: device.name().to_string(),
                    attempts: constants::MAX_ATTEMPTS,
                })
            }
        };

        if let Err(err) = routes.install(device.name(), address, netmask, gateway) {
            return Err(AutoconfError::InstallFailed {
                device: device.name().to_string(),
                address,
                source: err,
            });
        }
        self.state = ClaimState::Claimed;

        if let Err(err) = announce_claim(device, self.clock.as_ref(), identity, address) {
            return Err(AutoconfError::AnnounceFailed {
                address,
                source: err,
            });
        }
        self.state = ClaimState::Announced;

        match gateway {
            Some(gateway) => {
                tracing::info!("{} configured with {} gw {}", device.name(), address, gateway)
            }
            None => tracing::info!("{} configured with {}", device.name(), address),
        }

        persist(
            store,
            device.name(),
            constants::SETTING_ADDRESS,
            &address.to_string(),
        )?;
        persist(
            store,
            device.name(),
            constants::SETTING_NETMASK,
            &netmask.to_string(),
        )?;
        if let Some(gateway) = gateway {
            persist(
                store,
                device.name(),
                constants::SETTING_GATEWAY,
                &gateway.to_string(),
            )?;
        }
        for (name, value) in &request.settings {
            persist(store, device.name(), name, value)?;
        }
        self.state = ClaimState::Persisted;

        tracing::debug!(
            "{} configured on attempt {} in {:?}",
            device.name(),
            attempt + 1,
            self.clock.now().duration_since(started)
        );

        Ok(ConfiguredAddress {
            address,
            netmask,
            gateway,
        })
    }
}

impl Default for Autoconf {
    fn default() -> Self {
        Self::new()
    }
}

fn persist(
    store: &mut dyn SettingsStore,
    device: &str,
    name: &str,
    value: &str,
) -> AutoconfResult<()> {
    store
        .store(name, value)
        .map_err(|err| AutoconfError::PersistFailed {
            setting: name.to_string(),
            source: err,
        })?;
    tracing::debug!("{} stored setting {} = {}", device, name, value);
    Ok(())
}
