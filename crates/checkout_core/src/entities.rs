//! Customers and checkout counters.
//!
//! Both are plain records owned by the [crate::registry::Registry]; a customer lives in
//! exactly one server queue from routing until departure.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::clock::SimTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CustomerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ServerId(pub u32);

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServerClass {
    Standard,
    Express,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub item_count: u32,
    /// Fixed payment/bagging time added to every checkout regardless of basket size.
    pub overhead: SimTime,
    pub arrival_time: SimTime,
    pub service_start: Option<SimTime>,
    pub service_end: Option<SimTime>,
}

impl Customer {
    pub fn new(id: CustomerId, item_count: u32, overhead: SimTime) -> Self {
        Self {
            id,
            item_count,
            overhead,
            arrival_time: 0.0,
            service_start: None,
            service_end: None,
        }
    }

    pub fn arriving_at(mut self, time: SimTime) -> Self {
        self.arrival_time = time;
        self
    }

    /// Checkout duration at a counter that scans one item every `scan_duration`.
    pub fn service_duration(&self, scan_duration: SimTime) -> SimTime {
        self.item_count as f64 * scan_duration + self.overhead
    }

    pub fn waiting_time(&self) -> Option<SimTime> {
        self.service_start.map(|start| start - self.arrival_time)
    }

    pub fn time_in_system(&self) -> Option<SimTime> {
        self.service_end.map(|end| end - self.arrival_time)
    }
}

#[derive(Debug, Clone)]
pub struct Server {
    pub id: ServerId,
    pub class: ServerClass,
    pub scan_duration: SimTime,
    /// Maximum basket size accepted. Only express counters carry one.
    pub item_cap: Option<u32>,
    queue: VecDeque<Customer>,
    busy_time: SimTime,
    busy_since: Option<SimTime>,
    served: u64,
}

impl Server {
    pub fn new(id: ServerId, class: ServerClass, scan_duration: SimTime, item_cap: Option<u32>) -> Self {
        Self {
            id,
            class,
            scan_duration,
            item_cap,
            queue: VecDeque::new(),
            busy_time: 0.0,
            busy_since: None,
            served: 0,
        }
    }

    pub fn standard(id: ServerId, scan_duration: SimTime) -> Self {
        Self::new(id, ServerClass::Standard, scan_duration, None)
    }

    pub fn express(id: ServerId, scan_duration: SimTime, item_cap: u32) -> Self {
        Self::new(id, ServerClass::Express, scan_duration, Some(item_cap))
    }

    pub fn accepts(&self, item_count: u32) -> bool {
        self.item_cap.map_or(true, |cap| item_count <= cap)
    }

    pub fn service_time(&self, customer: &Customer) -> SimTime {
        customer.service_duration(self.scan_duration)
    }

    /// Total service time of everything queued, counting the customer in service in full.
    pub fn projected_workload(&self) -> SimTime {
        self.queue.iter().map(|c| self.service_time(c)).sum()
    }

    pub fn queue(&self) -> &VecDeque<Customer> {
        &self.queue
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Customers waiting behind the head of the queue.
    pub fn waiting_count(&self) -> usize {
        self.queue.len().saturating_sub(1)
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn head(&self) -> Option<&Customer> {
        self.queue.front()
    }

    /// Appends a customer; returns `true` when it landed at the head of an empty queue.
    pub fn enqueue(&mut self, customer: Customer) -> bool {
        debug_assert!(
            self.accepts(customer.item_count),
            "capped server received an oversized basket"
        );
        self.queue.push_back(customer);
        self.queue.len() == 1
    }

    /// Starts serving the head of the queue if it has not started yet.
    /// Returns the customer and its completion time.
    pub fn begin_service(&mut self, now: SimTime) -> Option<(CustomerId, SimTime)> {
        let scan_duration = self.scan_duration;
        let head = self.queue.front_mut()?;
        if head.service_start.is_some() {
            return None;
        }
        head.service_start = Some(now);
        let completion = now + head.service_duration(scan_duration);
        self.busy_since = Some(now);
        Some((head.id, completion))
    }

    /// Removes a finished customer, stamping its completion time and closing the busy interval.
    pub fn complete(&mut self, customer: CustomerId, now: SimTime) -> Option<Customer> {
        let position = if self.queue.front().map(|c| c.id) == Some(customer) {
            0
        } else {
            self.queue.iter().position(|c| c.id == customer)?
        };
        let mut finished = self.queue.remove(position)?;
        self.close_busy_interval(now);
        finished.service_end = Some(now);
        self.served += 1;
        Some(finished)
    }

    pub fn close_busy_interval(&mut self, at: SimTime) {
        if let Some(since) = self.busy_since.take() {
            self.busy_time += (at - since).max(0.0);
        }
    }

    pub fn is_serving(&self) -> bool {
        self.busy_since.is_some()
    }

    pub fn busy_time(&self) -> SimTime {
        self.busy_time
    }

    pub fn served(&self) -> u64 {
        self.served
    }

    /// Fraction of `horizon` spent serving, clamped to [0, 1].
    pub fn utilization(&self, horizon: SimTime) -> f64 {
        if horizon <= 0.0 {
            return 0.0;
        }
        (self.busy_time / horizon).clamp(0.0, 1.0)
    }
}
