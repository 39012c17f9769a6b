use core::fmt;

use esp_idf_svc::sys;

/// Below this the largest free block cannot hold a framebuffer copy plus a
/// rotated scratch frame.
const LOW_BLOCK_BYTES: usize = 16 * 1024;

/// Heap and stack headroom at one point in time
#[derive(Clone, Copy, Debug)]
pub struct MemorySnapshot {
    pub free: u32,
    pub min_free: u32,
    pub largest_block: usize,
    pub stack_headroom: usize,
}

impl MemorySnapshot {
    pub fn capture() -> Self {
        let (free, min_free, largest_block, stack_words) = unsafe {
            (
                sys::esp_get_free_heap_size(),
                sys::esp_get_minimum_free_heap_size(),
                sys::heap_caps_get_largest_free_block(sys::MALLOC_CAP_8BIT),
                sys::uxTaskGetStackHighWaterMark(core::ptr::null_mut()),
            )
        };
        Self {
            free,
            min_free,
            largest_block,
            stack_headroom: stack_words as usize * core::mem::size_of::<sys::StackType_t>(),
        }
    }
}

impl fmt::Display for MemorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "heap free={} min={} block={} stack={}B",
            self.free, self.min_free, self.largest_block, self.stack_headroom
        )
    }
}

/// Log current memory use under `label`.
pub fn log_memory(label: &str) {
    let snapshot = MemorySnapshot::capture();
    if snapshot.largest_block < LOW_BLOCK_BYTES {
        log::warn!("[mem] {}: {} (fragmented)", label, snapshot);
    } else {
        log::info!("[mem] {}: {}", label, snapshot);
    }
}
