//! Simulated peripherals.
//!
//! A sim sees its project only through [`ProjectHandle`]: it reads snapshots
//! when notified and writes back through masked updates.

mod ads1015;
mod pca9539r;

pub use ads1015::Ads1015Sim;
pub use pca9539r::Pca9539rSim;

use std::{cell::RefCell, rc::Rc};

use crate::{
    StoreError,
    gpio::{GpioPin, MaskMode, single_pin_update},
    project::ProjectHandle,
    types::StoreType,
};

/// Formats a project log line as `[<project>] <message>`.
pub fn log_line(project: &str, message: &str) -> String {
    format!("[{project}] {message}")
}

/// Reactive model of one peripheral.
pub trait Sim {
    /// Called after the project's stores changed.
    ///
    /// Implementations read [`ProjectHandle::stores`] and must give the same
    /// result when called twice with the same snapshot.
    fn handle_update(&mut self, _project: &dyn ProjectHandle) {}

    /// Called with each log line the project emits.
    fn handle_log(&mut self, project: &dyn ProjectHandle, message: &str) {
        println!("{}", log_line(project.name(), message));
    }

    /// Mask construction used by [`Self::set_pin`].
    fn mask_mode(&self) -> MaskMode {
        MaskMode::default()
    }

    /// Drives one GPIO pin through the project's `write_store`.
    ///
    /// # Errors
    /// * [`StoreError::InvalidPin`] - port outside `A..=F` or pin above 15
    /// * [`StoreError::InvalidPinState`] - `state` is neither 0 nor 1
    /// * any error from the project's write, e.g. [`StoreError::UnknownStore`]
    ///   when no GPIO store has been published yet
    fn set_pin(
        &self,
        project: &dyn ProjectHandle,
        port: char,
        pin: u8,
        state: u32,
    ) -> Result<(), StoreError> {
        let pin = GpioPin::new(port, pin)?;
        let update = single_pin_update(pin, state, self.mask_mode())?;
        tracing::trace!(project = project.name(), %pin, state, "set pin");
        project.write_store(StoreType::Gpio, update.value, update.mask)
    }
}

/// Lets a caller keep a handle on a sim it has given to a harness.
impl<S: Sim + ?Sized> Sim for Rc<RefCell<S>> {
    fn handle_update(&mut self, project: &dyn ProjectHandle) {
        self.borrow_mut().handle_update(project);
    }

    fn handle_log(&mut self, project: &dyn ProjectHandle, message: &str) {
        self.borrow_mut().handle_log(project, message);
    }

    fn mask_mode(&self) -> MaskMode {
        self.borrow().mask_mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GPIO0, gpio_payload, test_project};

    struct Quiet;
    impl Sim for Quiet {}

    struct Legacy;
    impl Sim for Legacy {
        fn mask_mode(&self) -> MaskMode {
            MaskMode::MirrorState
        }
    }

    #[test]
    fn log_line_format() {
        assert_eq!(log_line("smoke_pca9539r", "started"), "[smoke_pca9539r] started");
    }

    #[test]
    fn default_hooks_do_not_touch_stores() {
        let project = test_project();
        project.publish(GPIO0, gpio_payload(&[4])).unwrap();

        let mut sim = Quiet;
        sim.handle_update(&project);
        sim.handle_log(&project, "hello");

        assert_eq!(project.version(GPIO0), Some(1));
        assert_eq!(sim.mask_mode(), MaskMode::Indicator);
    }

    #[test]
    fn set_pin_writes_one_entry() {
        let project = test_project();
        project.publish(GPIO0, gpio_payload(&[0, 95])).unwrap();

        Quiet.set_pin(&project, 'b', 5, 1).unwrap();

        assert_eq!(project.store(GPIO0), Some(gpio_payload(&[0, 21, 95])));
        assert_eq!(project.version(GPIO0), Some(2));
    }

    #[test]
    fn set_pin_low_with_indicator_mask_clears_pin() {
        let project = test_project();
        project.publish(GPIO0, gpio_payload(&[21])).unwrap();

        Quiet.set_pin(&project, 'B', 5, 0).unwrap();

        assert_eq!(project.store(GPIO0), Some(gpio_payload(&[])));
    }

    #[test]
    fn set_pin_low_with_mirrored_mask_is_a_no_op() {
        let project = test_project();
        project.publish(GPIO0, gpio_payload(&[21])).unwrap();
        project.with_view(|view| view.clear_all_dirty());

        Legacy.set_pin(&project, 'B', 5, 0).unwrap();

        assert_eq!(project.store(GPIO0), Some(gpio_payload(&[21])));
        assert!(!project.with_view(|view| view.any_dirty()));
    }

    #[test]
    fn set_pin_high_agrees_in_both_modes() {
        let sims: [&dyn Sim; 2] = [&Quiet, &Legacy];
        for sim in sims {
            let project = test_project();
            project.publish(GPIO0, gpio_payload(&[])).unwrap();
            sim.set_pin(&project, 'F', 15, 1).unwrap();
            assert_eq!(project.store(GPIO0), Some(gpio_payload(&[95])));
        }
    }

    #[test]
    fn set_pin_rejects_bad_pins_before_writing() {
        let project = test_project();
        project.publish(GPIO0, gpio_payload(&[])).unwrap();

        assert_eq!(
            Quiet.set_pin(&project, 'G', 0, 1),
            Err(StoreError::InvalidPin { port: 'G', pin: 0 })
        );
        assert_eq!(
            Quiet.set_pin(&project, 'A', 16, 1),
            Err(StoreError::InvalidPin { port: 'A', pin: 16 })
        );
        assert_eq!(project.version(GPIO0), Some(1));
    }

    #[test]
    fn shared_sim_forwards_mask_mode() {
        let shared = Rc::new(RefCell::new(Legacy));
        assert_eq!(shared.mask_mode(), MaskMode::MirrorState);
    }

    #[test]
    fn set_pin_without_gpio_store() {
        let project = test_project();
        assert_eq!(
            Quiet.set_pin(&project, 'A', 0, 1),
            Err(StoreError::UnknownStore(GPIO0))
        );
    }
}
