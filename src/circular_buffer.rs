use crate::error::Error;
use log::debug;

/// Fixed-capacity byte window with a wrapping cursor.
///
/// Every index and movement amount is taken modulo the capacity, so any
/// `isize` is a valid position: `-1` is the last slot, `capacity` is the first.
/// The cursor always sits in `[0, capacity)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularBuffer {
    buffer: Vec<u8>,
    capacity: usize,
    cursor: usize,
}

impl CircularBuffer {
    /// Creates a zero-filled window of `capacity` bytes with the cursor at 0.
    ///
    /// `capacity` must be in `1..=isize::MAX`.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        debug!("Allocating circular buffer of {} bytes", capacity);
        Ok(Self {
            buffer: allocate(capacity)?,
            capacity,
            cursor: 0,
        })
    }

    /// Returns the byte under the cursor, then advances the cursor by one.
    pub fn read(&mut self) -> u8 {
        let value = self.buffer[self.cursor];
        self.move_forward();
        value
    }

    /// Returns the byte at `index`. Out-of-range indices wrap.
    pub fn read_at(&self, index: isize) -> u8 {
        self.buffer[self.normalize(index)]
    }

    /// Stores `value` under the cursor, then advances the cursor by one.
    pub fn write(&mut self, value: u8) {
        self.buffer[self.cursor] = value;
        self.move_forward();
    }

    /// Stores `value` at `index`. Out-of-range indices wrap.
    pub fn write_at(&mut self, value: u8, index: isize) {
        let pos = self.normalize(index);
        self.buffer[pos] = value;
    }

    /// Writes every byte of `data` in order through the cursor.
    ///
    /// Slices longer than the capacity overwrite themselves; only the last
    /// `capacity` bytes remain.
    pub fn write_slice(&mut self, data: &[u8]) {
        for &byte in data {
            self.write(byte);
        }
    }

    pub fn move_forward(&mut self) {
        self.move_forward_by(1);
    }

    /// Advances the cursor by `amount`. A negative amount moves it back.
    pub fn move_forward_by(&mut self, amount: isize) {
        let delta = self.normalize(amount);
        self.cursor = (self.cursor + delta) % self.capacity;
    }

    pub fn move_back(&mut self) {
        self.move_back_by(1);
    }

    /// Moves the cursor back by `amount`. A negative amount moves it forward.
    pub fn move_back_by(&mut self, amount: isize) {
        let delta = self.normalize(amount);
        self.cursor = (self.cursor + self.capacity - delta) % self.capacity;
    }

    pub fn get_cursor(&self) -> usize {
        self.cursor
    }

    /// Places the cursor at `index`. Out-of-range indices wrap.
    pub fn set_cursor(&mut self, index: isize) {
        self.cursor = self.normalize(index);
    }

    pub fn size(&self) -> usize {
        self.capacity
    }

    /// Replaces the store with `new_capacity` zero bytes and resets the cursor.
    ///
    /// Existing content is discarded. On error the buffer is left untouched.
    pub fn set_size(&mut self, new_capacity: usize) -> Result<(), Error> {
        debug!(
            "Resizing circular buffer from {} to {} bytes",
            self.capacity, new_capacity
        );
        self.buffer = allocate(new_capacity)?;
        self.capacity = new_capacity;
        self.cursor = 0;
        Ok(())
    }

    /// Returns up to `len` bytes immediately behind the cursor, oldest first.
    ///
    /// The request is capped at the capacity. The cursor does not move.
    pub fn recent(&self, len: usize) -> Vec<u8> {
        let len = len.min(self.capacity);
        let start = (self.cursor + self.capacity - len) % self.capacity;
        let mut result = Vec::with_capacity(len);

        if start + len <= self.capacity {
            result.extend_from_slice(&self.buffer[start..start + len]);
        } else {
            // Wraps: tail of the store, then its head
            let second_chunk = len - (self.capacity - start);
            result.extend_from_slice(&self.buffer[start..]);
            result.extend_from_slice(&self.buffer[..second_chunk]);
        }

        result
    }

    /// The raw store in physical order, ignoring the cursor.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    // allocate() keeps capacity within isize::MAX.
    fn normalize(&self, index: isize) -> usize {
        index.rem_euclid(self.capacity as isize) as usize
    }
}

/// Zero-filled store of exactly `capacity` bytes, without panicking on
/// oversized requests.
fn allocate(capacity: usize) -> Result<Vec<u8>, Error> {
    if capacity == 0 || capacity > isize::MAX as usize {
        return Err(Error::InvalidCapacity(capacity));
    }
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|_| Error::AllocationFailed(capacity))?;
    buffer.resize(capacity, 0);
    Ok(buffer)
}
