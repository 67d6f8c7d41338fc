use crate::{
    codec::PCA9539R_PINS,
    project::ProjectHandle,
    sim::Sim,
    types::{StoreAddress, StoreType},
};

/// PCA9539R 16-pin I/O expander.
///
/// Mirrors the pin states of one expander store. Until that store is first
/// seen the mirror is empty.
#[derive(Debug, Clone, Default)]
pub struct Pca9539rSim {
    instance: u16,
    state: Option<[bool; PCA9539R_PINS]>,
}

impl Pca9539rSim {
    /// Sim for expander `instance`.
    pub fn new(instance: u16) -> Self {
        Self {
            instance,
            state: None,
        }
    }

    pub fn address(&self) -> StoreAddress {
        StoreAddress::new(StoreType::Pca9539r, self.instance)
    }

    /// Last mirrored pin states.
    pub fn state(&self) -> Option<&[bool; PCA9539R_PINS]> {
        self.state.as_ref()
    }

    pub fn pin(&self, pin: usize) -> Option<bool> {
        self.state.and_then(|state| state.get(pin).copied())
    }

    /// True once a store has been mirrored and every pin equals `level`.
    pub fn all_pins_equal(&self, level: bool) -> bool {
        self.state
            .is_some_and(|state| state.iter().all(|&pin| pin == level))
    }
}

impl Sim for Pca9539rSim {
    fn handle_update(&mut self, project: &dyn ProjectHandle) {
        let stores = project.stores();
        let Some(store) = stores.get(self.address()) else {
            return;
        };

        let mut state = [false; PCA9539R_PINS];
        for (pin, entry) in state.iter_mut().zip(store.entries()) {
            *pin = *entry != 0;
        }
        self.state = Some(state);
    }
}
