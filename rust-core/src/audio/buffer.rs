//! Lock-free ring buffer for mono 16-bit samples
//!
//! Carries downmixed audio from the host's audio thread to the analysis thread

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

use crate::spectrum::FFT_BUFFER_SIZE;

/// Thread-safe sample ring buffer
pub struct AudioRingBuffer {
    producer: HeapProducer<i16>,
    consumer: HeapConsumer<i16>,
    capacity: usize,
}

impl AudioRingBuffer {
    /// Create new ring buffer with given capacity
    ///
    /// # Arguments
    /// * `capacity` - Buffer capacity in samples
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::<i16>::new(capacity);
        let (producer, consumer) = rb.split();

        Self {
            producer,
            consumer,
            capacity,
        }
    }

    /// Split into producer and consumer ends
    pub fn split(self) -> (AudioProducer, AudioConsumer) {
        (
            AudioProducer {
                producer: self.producer,
                capacity: self.capacity,
            },
            AudioConsumer {
                consumer: self.consumer,
                capacity: self.capacity,
            },
        )
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Producer end of the ring buffer (audio thread side)
pub struct AudioProducer {
    producer: HeapProducer<i16>,
    capacity: usize,
}

impl AudioProducer {
    /// Write samples to buffer
    ///
    /// # Returns
    /// Number of samples actually written (may be less if buffer is full)
    pub fn write(&mut self, samples: &[i16]) -> usize {
        self.producer.push_slice(samples)
    }

    /// Get number of free slots
    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Consumer end of the ring buffer (analysis thread side)
pub struct AudioConsumer {
    consumer: HeapConsumer<i16>,
    capacity: usize,
}

impl AudioConsumer {
    /// Read samples from buffer
    ///
    /// # Returns
    /// Number of samples actually read
    pub fn read(&mut self, buffer: &mut [i16]) -> usize {
        self.consumer.pop_slice(buffer)
    }

    /// Read one full FFT block if enough samples are buffered
    ///
    /// Leaves the buffer untouched and returns `false` otherwise, so blocks
    /// are never split across calls.
    pub fn read_block(&mut self, block: &mut [i16; FFT_BUFFER_SIZE]) -> bool {
        if self.consumer.len() < FFT_BUFFER_SIZE {
            return false;
        }
        self.consumer.pop_slice(block) == FFT_BUFFER_SIZE
    }

    /// Get number of available samples
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
