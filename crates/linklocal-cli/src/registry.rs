//! Device lookup for command execution.

use linklocal_core::device::LinkDevice;

/// Access to the devices a command can act on.
pub trait DeviceRegistry {
    /// Concrete device type managed by this registry.
    type Device: LinkDevice;

    /// Finds a device by interface name.
    fn find(&mut self, name: &str) -> Option<&mut Self::Device>;

    /// Returns the device used when no interface name is given: the most
    /// recently added device that is currently open.
    fn last_opened(&mut self) -> Option<&mut Self::Device>;
}

/// Registry over an ordered list of devices.
#[derive(Debug, Default)]
pub struct DeviceList<D> {
    devices: Vec<D>,
}

impl<D: LinkDevice> DeviceList<D> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        DeviceList {
            devices: Vec::new(),
        }
    }

    /// Adds a device to the end of the list.
    pub fn add(&mut self, device: D) {
        self.devices.push(device);
    }

    /// Returns the devices in insertion order.
    pub fn devices(&self) -> &[D] {
        &self.devices
    }
}

impl<D: LinkDevice> DeviceRegistry for DeviceList<D> {
    type Device = D;

    fn find(&mut self, name: &str) -> Option<&mut D> {
        self.devices.iter_mut().find(|device| device.name() == name)
    }

    fn last_opened(&mut self) -> Option<&mut D> {
        self.devices.iter_mut().rev().find(|device| device.is_open())
    }
}
