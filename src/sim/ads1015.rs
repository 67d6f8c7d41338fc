use crate::{
    codec::ADS1015_CHANNELS,
    project::ProjectHandle,
    sim::Sim,
    types::{StoreAddress, StoreType},
};

/// ADS1015 four channel ADC. Mirrors the raw conversion codes of one store.
#[derive(Debug, Clone, Default)]
pub struct Ads1015Sim {
    instance: u16,
    readings: Option<[u16; ADS1015_CHANNELS]>,
}

impl Ads1015Sim {
    pub fn new(instance: u16) -> Self {
        Self {
            instance,
            readings: None,
        }
    }

    pub fn address(&self) -> StoreAddress {
        StoreAddress::new(StoreType::Ads1015, self.instance)
    }

    pub fn readings(&self) -> Option<&[u16; ADS1015_CHANNELS]> {
        self.readings.as_ref()
    }

    /// Last code seen on `channel`.
    pub fn channel(&self, channel: usize) -> Option<u16> {
        self.readings.and_then(|readings| readings.get(channel).copied())
    }
}

impl Sim for Ads1015Sim {
    fn handle_update(&mut self, project: &dyn ProjectHandle) {
        let stores = project.stores();
        let Some(store) = stores.get(self.address()) else {
            return;
        };

        let mut readings = [0u16; ADS1015_CHANNELS];
        for (reading, entry) in readings.iter_mut().zip(store.entries()) {
            *reading = u16::try_from(*entry).unwrap_or(u16::MAX);
        }
        self.readings = Some(readings);
    }
}
