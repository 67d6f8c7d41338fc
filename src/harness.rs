//! In-process fan-out from a [`Project`] to its sims.

use crate::{
    StoreError,
    project::{Project, ProjectHandle},
    sim::Sim,
    types::{StoreAddress, StoreInfo},
};

/// Rounds [`Harness::settle`] runs before giving up on a project whose sims
/// keep rewriting stores.
pub const MAX_SETTLE_ROUNDS: usize = 16;

/// Outcome of delivering a batch of envelopes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Stores each accepted envelope landed in, in input order.
    pub delivered: Vec<StoreAddress>,
    /// Index into the batch and the error for every dropped envelope.
    pub dropped: Vec<(usize, StoreError)>,
}

/// Owns one project and the sims attached to it.
pub struct Harness {
    project: Project,
    sims: Vec<Box<dyn Sim>>,
}

impl core::fmt::Debug for Harness {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Harness")
            .field("project", &self.project)
            .field("sims", &self.sims.len())
            .finish()
    }
}

impl Harness {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            sims: Vec::new(),
        }
    }

    pub fn add_sim(&mut self, sim: impl Sim + 'static) {
        self.sims.push(Box::new(sim));
    }

    pub fn sim_count(&self) -> usize {
        self.sims.len()
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Ingests one envelope into store `instance` and notifies every sim.
    ///
    /// A rejected envelope changes nothing and notifies nobody.
    pub fn deliver(&mut self, instance: u16, info: &StoreInfo) -> Result<StoreAddress, StoreError> {
        let addr = self.project.ingest(instance, info).inspect_err(|err| {
            tracing::warn!(instance, tag = info.tag, error = %err, "dropping envelope");
        })?;
        self.notify();
        Ok(addr)
    }

    /// Like [`Self::deliver`] for framed envelope bytes.
    pub fn deliver_bytes(
        &mut self,
        instance: u16,
        bytes: &[u8],
    ) -> Result<StoreAddress, StoreError> {
        let info = StoreInfo::from_bytes(bytes)?;
        self.deliver(instance, &info)
    }

    /// Ingests a batch, dropping bad envelopes, then notifies sims once.
    pub fn deliver_all<'a, I>(&mut self, envelopes: I) -> DeliveryReport
    where
        I: IntoIterator<Item = (u16, &'a StoreInfo)>,
    {
        let mut report = DeliveryReport::default();
        for (index, (instance, info)) in envelopes.into_iter().enumerate() {
            match self.project.ingest(instance, info) {
                Ok(addr) => report.delivered.push(addr),
                Err(err) => {
                    tracing::warn!(
                        index,
                        instance,
                        tag = info.tag,
                        error = %err,
                        "dropping envelope"
                    );
                    report.dropped.push((index, err));
                }
            }
        }
        if !report.delivered.is_empty() {
            self.notify();
        }
        report
    }

    /// Calls [`Sim::handle_update`] on every sim, in the order they were added.
    pub fn notify(&mut self) {
        tracing::trace!(
            project = self.project.name(),
            sims = self.sims.len(),
            "fan out"
        );
        for sim in &mut self.sims {
            sim.handle_update(&self.project);
        }
    }

    /// Notifies sims until a round leaves every store as it was.
    ///
    /// Returns the number of rounds run. Sims that write stores from
    /// `handle_update` see each other's writes this way.
    pub fn settle(&mut self) -> usize {
        for round in 1..=MAX_SETTLE_ROUNDS {
            let before = self.project.stores();
            self.notify();
            if self.project.stores() == before {
                return round;
            }
        }
        tracing::warn!(
            project = self.project.name(),
            rounds = MAX_SETTLE_ROUNDS,
            "sims did not settle"
        );
        MAX_SETTLE_ROUNDS
    }

    /// Hands a project log line to every sim.
    pub fn log(&mut self, message: &str) {
        for sim in &mut self.sims {
            sim.handle_log(&self.project, message);
        }
    }
}
