//! Single-flight request deduplication.
//!
//! Concurrent calls for the same key collapse into one computation: the
//! first caller (leader) runs the closure, everyone else blocks until
//! the leader publishes its result. The in-flight entry is removed on
//! completion — success, error value, or panic — so later calls always
//! start a fresh computation. Removal lives in a `Drop` guard, which is
//! what makes the cleanup structural rather than best-effort.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Condvar, Mutex};

enum FlightState<V> {
    Pending,
    Done(V),
    /// Leader unwound without publishing a value.
    Poisoned,
}

struct Flight<V> {
    state: Mutex<FlightState<V>>,
    ready: Condvar,
}

pub struct SingleFlightGroup<K, V> {
    flights: Mutex<HashMap<K, Arc<Flight<V>>>>,
}

impl<K, V> Default for SingleFlightGroup<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SingleFlightGroup<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Number of computations currently in flight.
    pub fn in_flight(&self) -> usize {
        self.flights.lock().unwrap().len()
    }

    /// Run `compute` for `key`, or wait for the in-flight computation.
    ///
    /// Errors propagate to every waiter because `V` is typically a
    /// `Result`: the leader's value, whatever it is, is what everyone
    /// receives.
    ///
    /// # Panics
    /// If the leader panics, waiting followers panic too — a poisoned
    /// flight has no value to share, and silently recomputing would hide
    /// the original failure.
    pub fn run(&self, key: K, compute: impl FnOnce() -> V) -> V {
        let flight = {
            let mut flights = self.flights.lock().unwrap();
            if let Some(existing) = flights.get(&key) {
                let flight = Arc::clone(existing);
                drop(flights);
                return Self::wait(&flight);
            }
            let flight = Arc::new(Flight {
                state: Mutex::new(FlightState::Pending),
                ready: Condvar::new(),
            });
            flights.insert(key.clone(), Arc::clone(&flight));
            flight
        };

        // Guard removes the map entry and wakes waiters no matter how
        // `compute` exits.
        let guard = CompletionGuard {
            group: self,
            key,
            flight: Arc::clone(&flight),
        };

        let value = compute();

        *flight.state.lock().unwrap() = FlightState::Done(value.clone());
        flight.ready.notify_all();
        drop(guard);

        value
    }

    fn wait(flight: &Flight<V>) -> V {
        let mut state = flight.state.lock().unwrap();
        loop {
            match &*state {
                FlightState::Pending => {
                    state = flight.ready.wait(state).unwrap();
                }
                FlightState::Done(value) => return value.clone(),
                FlightState::Poisoned => {
                    panic!("single-flight leader panicked before publishing a result")
                }
            }
        }
    }
}

struct CompletionGuard<'a, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    group: &'a SingleFlightGroup<K, V>,
    key: K,
    flight: Arc<Flight<V>>,
}

impl<K, V> Drop for CompletionGuard<'_, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn drop(&mut self) {
        {
            let mut state = self.flight.state.lock().unwrap();
            if matches!(*state, FlightState::Pending) {
                *state = FlightState::Poisoned;
            }
        }
        self.flight.ready.notify_all();
        self.group.flights.lock().unwrap().remove(&self.key);
    }
}
