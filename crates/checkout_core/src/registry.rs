//! Server registry: owns the counters and the customer generator, answers routing queries.

use bevy_ecs::prelude::Resource;

use crate::clock::SimTime;
use crate::entities::{Server, ServerClass, ServerId};
use crate::generator::CustomerGenerator;

/// True if the server has no cap, or the basket fits under it.
pub fn is_eligible(server: &Server, item_count: u32) -> bool {
    server.accepts(item_count)
}

#[derive(Debug, Resource)]
pub struct Registry {
    servers: Vec<Server>,
    generator: CustomerGenerator,
}

impl Registry {
    pub fn new(generator: CustomerGenerator) -> Self {
        Self {
            servers: Vec::new(),
            generator,
        }
    }

    /// Adds a counter; ids start at 1 and follow insertion order.
    pub fn add_server(
        &mut self,
        class: ServerClass,
        scan_duration: SimTime,
        item_cap: Option<u32>,
    ) -> ServerId {
        let id = ServerId(self.servers.len() as u32 + 1);
        self.servers
            .push(Server::new(id, class, scan_duration, item_cap));
        id
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn servers_mut(&mut self) -> &mut [Server] {
        &mut self.servers
    }

    pub fn server(&self, id: ServerId) -> Option<&Server> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.servers.get(index)
    }

    pub fn server_mut(&mut self, id: ServerId) -> Option<&mut Server> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.servers.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn generator(&self) -> &CustomerGenerator {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut CustomerGenerator {
        &mut self.generator
    }

    /// Join-least-workload: the eligible counter with the smallest queued service time.
    ///
    /// The customer in service is counted at full length even if partly served. Ties go to the
    /// lowest id. `None` when no counter accepts the basket.
    pub fn select_best(&self, item_count: u32) -> Option<ServerId> {
        let mut best: Option<(ServerId, SimTime)> = None;
        for server in self.servers.iter().filter(|s| is_eligible(s, item_count)) {
            let workload = server.projected_workload();
            match best {
                Some((_, best_workload)) if workload >= best_workload => {}
                _ => best = Some((server.id, workload)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Customers queued behind a head-of-line customer, summed over counters.
    pub fn total_waiting(&self) -> usize {
        self.servers.iter().map(Server::waiting_count).sum()
    }

    /// Everyone still in a queue, including those being served.
    pub fn total_in_system(&self) -> usize {
        self.servers.iter().map(Server::queue_len).sum()
    }
}
