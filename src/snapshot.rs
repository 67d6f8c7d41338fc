use std::collections::BTreeMap;

use crate::{
    payload::Payload,
    types::{StoreAddress, StoreType},
};

/// Immutable copy of every store in a project at one instant.
///
/// Sims read from a snapshot; later writes to the project never show up in a
/// snapshot already handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    stores: BTreeMap<StoreAddress, Payload>,
}

impl StoreSnapshot {
    pub fn get(&self, addr: StoreAddress) -> Option<&Payload> {
        self.stores.get(&addr)
    }

    /// Shorthand for `get(StoreAddress::new(store_type, instance))`.
    pub fn store(&self, store_type: StoreType, instance: u16) -> Option<&Payload> {
        self.get(StoreAddress::new(store_type, instance))
    }

    pub fn contains(&self, addr: StoreAddress) -> bool {
        self.stores.contains_key(&addr)
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Stores in address order.
    pub fn iter(&self) -> impl Iterator<Item = (StoreAddress, &Payload)> {
        self.stores.iter().map(|(addr, payload)| (*addr, payload))
    }

    /// Instances present for one store type, in ascending order.
    pub fn instances(&self, store_type: StoreType) -> impl Iterator<Item = u16> + '_ {
        self.stores
            .keys()
            .filter(move |addr| addr.store_type == store_type)
            .map(|addr| addr.instance)
    }
}

impl FromIterator<(StoreAddress, Payload)> for StoreSnapshot {
    fn from_iter<I: IntoIterator<Item = (StoreAddress, Payload)>>(iter: I) -> Self {
        Self {
            stores: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_type_and_instance() {
        let pca = Payload::zeroed(StoreType::Pca9539r, 16).unwrap();
        let adc = Payload::zeroed(StoreType::Ads1015, 4).unwrap();
        let snapshot: StoreSnapshot = [
            (StoreAddress::new(StoreType::Pca9539r, 1), pca.clone()),
            (StoreAddress::new(StoreType::Ads1015, 0), adc.clone()),
            (StoreAddress::new(StoreType::Pca9539r, 0), pca.clone()),
        ]
        .into_iter()
        .collect();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.store(StoreType::Ads1015, 0), Some(&adc));
        assert_eq!(snapshot.store(StoreType::Ads1015, 1), None);
        assert!(snapshot.contains(StoreAddress::new(StoreType::Pca9539r, 1)));
        assert_eq!(
            snapshot.instances(StoreType::Pca9539r).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert!(StoreSnapshot::default().is_empty());
    }
}
