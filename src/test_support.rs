//! Test support utilities - only compiled in test builds.

use std::{cell::RefCell, rc::Rc};

use crate::{
    builder::ProjectBuilder,
    payload::Payload,
    project::{Project, ProjectHandle},
    sim::Sim,
    snapshot::StoreSnapshot,
    types::{StoreAddress, StoreType},
};

pub const GPIO0: StoreAddress = StoreAddress::new(StoreType::Gpio, 0);
pub const PCA0: StoreAddress = StoreAddress::new(StoreType::Pca9539r, 0);
pub const ADS0: StoreAddress = StoreAddress::new(StoreType::Ads1015, 0);

/// 96-wide GPIO payload with the listed indices high.
pub fn gpio_payload(high: &[usize]) -> Payload {
    let mut entries = [0u32; 96];
    for &index in high {
        entries[index] = 1;
    }
    Payload::new(StoreType::Gpio, &entries).unwrap()
}

/// Project with the standard registry and no stores.
pub fn test_project() -> Project {
    ProjectBuilder::new().name("test").build().unwrap()
}

/// What a [`RecordingSim`] has seen.
#[derive(Debug, Default)]
pub struct Recorded {
    pub updates: Vec<StoreSnapshot>,
    pub logs: Vec<String>,
}

/// Sim that records every callback into shared state.
pub struct RecordingSim {
    pub seen: Rc<RefCell<Recorded>>,
}

impl RecordingSim {
    pub fn new() -> (Self, Rc<RefCell<Recorded>>) {
        let seen = Rc::new(RefCell::new(Recorded::default()));
        (Self { seen: seen.clone() }, seen)
    }
}

impl Sim for RecordingSim {
    fn handle_update(&mut self, project: &dyn ProjectHandle) {
        self.seen.borrow_mut().updates.push(project.stores());
    }

    fn handle_log(&mut self, project: &dyn ProjectHandle, message: &str) {
        self.seen
            .borrow_mut()
            .logs
            .push(crate::sim::log_line(project.name(), message));
    }
}
