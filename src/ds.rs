/// A fixed-capacity ring buffer that overwrites its oldest element once full
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    capacity: usize,
    i: usize,
}

impl<T> RingBuffer<T> {
    /// Constructs an empty `RingBuffer` holding at most `capacity` elements
    ///
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be positive");
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
            i: 0,
        }
    }

    /// Returns the number of stored elements
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    /// Insert an element into the buffer, overwriting the oldest element
    pub fn push(&mut self, item: T) {
        if self.is_full() {
            self.buffer[self.i] = item;
        } else {
            self.buffer.push(item);
        }
        self.i = (self.i + 1) % self.capacity;
    }

    /// Get a slice view of the stored elements, in storage order
    pub fn view(&self) -> &[T] {
        &self.buffer
    }
}

impl<T: Copy + Into<f64>> RingBuffer<T> {
    /// Arithmetic mean of the stored elements
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let sum: f64 = self.buffer.iter().map(|&x| x.into()).sum();
        Some(sum / self.len() as f64)
    }
}
