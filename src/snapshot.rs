//! Parameter snapshot seam between the monitor and its host
//!
//! The monitor never touches model weights directly. Hosts that want
//! best-weights restoration supply a [`ParameterStore`]: an opaque
//! capture/restore capability over whatever parameter representation the
//! host uses. The monitor holds at most one snapshot at a time and drops it
//! when a run resets.

/// Capture/restore capability supplied by the host training loop
pub trait ParameterStore {
    /// Opaque snapshot of the host's current parameters
    type Snapshot;

    /// Copy the current parameters into a snapshot
    fn capture(&self) -> Self::Snapshot;

    /// Overwrite the current parameters from a snapshot
    fn restore(&mut self, snapshot: &Self::Snapshot);
}

/// Reference store over a flat parameter buffer
///
/// Suitable for hosts that keep their trainable parameters in a single
/// `Vec<f32>`; also the store used throughout this crate's tests.
#[derive(Clone, Debug, Default)]
pub struct BufferStore {
    params: Vec<f32>,
}

impl BufferStore {
    /// Create a store over an initial parameter buffer
    pub fn new(params: Vec<f32>) -> Self {
        Self { params }
    }

    /// Current parameter values
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Overwrite the current parameter values
    pub fn set_params(&mut self, params: Vec<f32>) {
        self.params = params;
    }
}

impl ParameterStore for BufferStore {
    type Snapshot = Vec<f32>;

    fn capture(&self) -> Vec<f32> {
        self.params.clone()
    }

    fn restore(&mut self, snapshot: &Vec<f32>) {
        self.params.clone_from(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_store_capture_restore() {
        let mut store = BufferStore::new(vec![1.0, 2.0, 3.0]);
        let snapshot = store.capture();

        store.set_params(vec![9.0, 9.0, 9.0]);
        assert_eq!(store.params(), &[9.0, 9.0, 9.0]);

        store.restore(&snapshot);
        assert_eq!(store.params(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let mut store = BufferStore::new(vec![1.0]);
        let snapshot = store.capture();
        store.set_params(vec![2.0]);
        // Mutating the store must not touch the snapshot
        assert_eq!(snapshot, vec![1.0]);
    }
}
