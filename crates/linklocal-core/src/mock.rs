//! In-memory test doubles for the contracts in this crate.
//!
//! These doubles are shipped as a regular module rather than test-only code
//! so that every crate in the workspace (and downstream users writing their
//! own tests) can drive an autoconfiguration run without a real network:
//!
//! - [`MockDevice`]: scripted link state, recorded transmissions, and
//!   inbound frames delivered once a configured number of transmit calls
//!   has been made (mimicking replies that arrive while waiting).
//! - [`ManualClock`]: advances a synthetic instant and records every sleep.
//! - [`FixedJitter`]: returns a constant offset.
//! - [`MemoryRoutes`] / [`MemoryStore`]: record collaborator calls.

use std::{
    io,
    net::Ipv4Addr,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::{
    device::{InboundQueue, LinkDevice, LinkParams, RouteTable, SettingsStore},
    jitter::JitterSource,
    time::Clock,
};

/// Scripted [`LinkDevice`] implementation.
#[derive(Debug)]
pub struct MockDevice {
    name: String,
    link_addr: Option<Vec<u8>>,
    params: LinkParams,
    open: bool,
    link_up: bool,
    fail_open: Option<io::ErrorKind>,
    transmit_failures: Vec<usize>,
    transmit_calls: usize,
    sent: Vec<Vec<u8>>,
    queue: Vec<Vec<u8>>,
    pending: Vec<(usize, Vec<u8>)>,
    polls: usize,
    drained: usize,
}

impl MockDevice {
    /// Creates a closed Ethernet device with the given hardware address and
    /// its link up.
    pub fn ethernet(name: &str, addr: [u8; 6]) -> Self {
        Self::with_link(name, &addr, LinkParams::ETHERNET)
    }

    /// Creates a closed device with an arbitrary link layer.
    pub fn with_link(name: &str, addr: &[u8], params: LinkParams) -> Self {
        MockDevice {
            name: name.to_string(),
            link_addr: Some(addr.to_vec()),
            params,
            open: false,
            link_up: true,
            fail_open: None,
            transmit_failures: Vec::new(),
            transmit_calls: 0,
            sent: Vec::new(),
            queue: Vec::new(),
            pending: Vec::new(),
            polls: 0,
            drained: 0,
        }
    }

    /// Creates a device without a link-layer address.
    pub fn headless(name: &str) -> Self {
        let mut device = Self::with_link(name, &[], LinkParams::ETHERNET);
        device.link_addr = None;
        device
    }

    /// Sets whether the device is open.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Sets the link carrier state.
    pub fn set_link_up(&mut self, up: bool) {
        self.link_up = up;
    }

    /// Makes every subsequent `open` call fail with the given kind.
    pub fn fail_open(&mut self, kind: io::ErrorKind) {
        self.fail_open = Some(kind);
    }

    /// Makes the transmit call with the given zero-based index fail.
    pub fn fail_transmit_call(&mut self, call: usize) {
        self.transmit_failures.push(call);
    }

    /// Queues a frame immediately.
    ///
    /// Note that probing flushes the queue before each transmission, so a
    /// frame queued this way is drained before the first inspection; use
    /// [`inject_after`](MockDevice::inject_after) for frames that should
    /// look like replies.
    pub fn push_frame(&mut self, frame: Vec<u8>) {
        self.queue.push(frame);
    }

    /// Queues a frame that becomes visible once at least `calls` transmit
    /// calls have been made.
    pub fn inject_after(&mut self, calls: usize, frame: Vec<u8>) {
        self.pending.push((calls, frame));
    }

    /// Returns every successfully transmitted frame, in order.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Returns the total number of transmit calls, including failed ones.
    pub fn transmit_calls(&self) -> usize {
        self.transmit_calls
    }

    /// Returns how many times the queue was drained.
    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Returns how many frames draining has removed in total.
    pub fn drained(&self) -> usize {
        self.drained
    }

    fn deliver_pending(&mut self) {
        let calls = self.transmit_calls;
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].0 <= calls {
                let (_, frame) = self.pending.remove(index);
                self.queue.push(frame);
            } else {
                index += 1;
            }
        }
    }
}

impl InboundQueue for MockDevice {
    fn queued_len(&self) -> usize {
        self.queue.len()
    }

    fn frame(&self, index: usize) -> Option<&[u8]> {
        self.queue.get(index).map(Vec::as_slice)
    }

    fn poll(&mut self) {
        self.polls += 1;
        self.drained += self.queue.len();
        self.queue.clear();
    }
}

impl LinkDevice for MockDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn link_addr(&self) -> Option<&[u8]> {
        self.link_addr.as_deref()
    }

    fn link_params(&self) -> LinkParams {
        self.params
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn open(&mut self) -> io::Result<()> {
        if let Some(kind) = self.fail_open {
            return Err(io::Error::new(kind, "open failure"));
        }
        self.open = true;
        Ok(())
    }

    fn is_link_up(&self) -> bool {
        self.link_up
    }

    fn transmit(&mut self, frame: &[u8]) -> io::Result<()> {
        let call = self.transmit_calls;
        self.transmit_calls += 1;
        self.deliver_pending();
        if self.transmit_failures.contains(&call) {
            return Err(io::Error::new(io::ErrorKind::Other, "transmit failure"));
        }
        self.sent.push(frame.to_vec());
        Ok(())
    }
}

/// Clock that advances a synthetic instant and records every sleep.
#[derive(Debug)]
pub struct ManualClock {
    inner: Mutex<ManualClockInner>,
}

#[derive(Debug)]
struct ManualClockInner {
    now: Instant,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    /// Creates a clock starting at the current real instant.
    pub fn new() -> Self {
        ManualClock {
            inner: Mutex::new(ManualClockInner {
                now: Instant::now(),
                sleeps: Vec::new(),
            }),
        }
    }

    /// Returns every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.lock().unwrap().sleeps.clone()
    }

    /// Returns the sum of all sleeps requested so far.
    pub fn total_slept(&self) -> Duration {
        self.inner.lock().unwrap().sleeps.iter().sum()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.inner.lock().unwrap().now
    }

    fn sleep(&self, duration: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.now += duration;
        inner.sleeps.push(duration);
    }
}

/// Jitter source returning a constant offset, clamped to the bound.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub Duration);

impl FixedJitter {
    /// A jitter source that always returns zero.
    pub const ZERO: FixedJitter = FixedJitter(Duration::ZERO);
}

impl JitterSource for FixedJitter {
    fn sample(&mut self, bound: Duration) -> Duration {
        self.0.min(bound)
    }
}

/// One route recorded by [`MemoryRoutes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledRoute {
    /// Interface name the route was installed on.
    pub device: String,
    /// Installed address.
    pub address: Ipv4Addr,
    /// Installed netmask.
    pub netmask: Ipv4Addr,
    /// Installed gateway, if any.
    pub gateway: Option<Ipv4Addr>,
}

/// Route table recording installations in memory.
#[derive(Debug, Default)]
pub struct MemoryRoutes {
    /// Routes installed so far, in order.
    pub installed: Vec<InstalledRoute>,
    fail_next: bool,
}

impl MemoryRoutes {
    /// Creates an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next install call fail.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }
}

impl RouteTable for MemoryRoutes {
    fn install(
        &mut self,
        device: &str,
        address: Ipv4Addr,
        netmask: Ipv4Addr,
        gateway: Option<Ipv4Addr>,
    ) -> io::Result<()> {
        if self.fail_next {
            self.fail_next = false;
            return Err(io::Error::new(io::ErrorKind::Other, "route table full"));
        }
        self.installed.push(InstalledRoute {
            device: device.to_string(),
            address,
            netmask,
            gateway,
        });
        Ok(())
    }
}

/// Settings store recording values in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Stored (name, value) pairs, in order.
    pub values: Vec<(String, String)>,
    fail_on: Option<String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the store call for the given setting name fail.
    pub fn fail_on(&mut self, name: &str) {
        self.fail_on = Some(name.to_string());
    }
}

impl SettingsStore for MemoryStore {
    fn store(&mut self, name: &str, value: &str) -> io::Result<()> {
        if self.fail_on.as_deref() == Some(name) {
            return Err(io::Error::new(io::ErrorKind::Other, "store rejected value"));
        }
        self.values.push((name.to_string(), value.to_string()));
        Ok(())
    }
}
