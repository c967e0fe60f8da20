use bytemuck::Pod;

/// Growable uniform buffer holding one aligned slot per value pushed this frame.
///
/// Values are staged on the CPU with `push`, which returns the dynamic offset
/// to bind for that value, then written to the GPU in one `upload` before any
/// pass that reads them is encoded.
pub struct UniformArena {
    label: &'static str,
    item_size: u64,
    stride: u64,

    staging: Vec<u8>,
    buffer: Option<wgpu::Buffer>,
    capacity: u64, // slots
}

impl UniformArena {
    /// `item_size` is the size of the uniform struct; `min_alignment` is the
    /// device's `min_uniform_buffer_offset_alignment`.
    pub fn new(label: &'static str, item_size: u64, min_alignment: u32) -> Self {
        let alignment = (min_alignment as u64).max(1);
        Self {
            label,
            item_size,
            stride: wgpu::util::align_to(item_size.max(1), alignment),
            staging: Vec::new(),
            buffer: None,
            capacity: 0,
        }
    }

    #[inline]
    pub fn stride(&self) -> u64 {
        self.stride
    }

    #[inline]
    pub fn item_size(&self) -> u64 {
        self.item_size
    }

    /// Number of values staged since the last `clear`.
    #[inline]
    pub fn len(&self) -> usize {
        (self.staging.len() as u64 / self.stride) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.staging.is_empty()
    }

    pub fn clear(&mut self) {
        self.staging.clear();
    }

    /// Stages `value` and returns its dynamic offset.
    pub fn push<T: Pod>(&mut self, value: &T) -> u32 {
        let bytes = bytemuck::bytes_of(value);
        debug_assert!(bytes.len() as u64 <= self.item_size);

        let offset = self.staging.len();
        self.staging.extend_from_slice(bytes);
        self.staging.resize(offset + self.stride as usize, 0);
        offset as u32
    }

    /// Staged bytes for the slot at `offset`, as pushed.
    pub fn slot(&self, offset: u32) -> Option<&[u8]> {
        let start = offset as usize;
        self.staging.get(start..start + self.item_size as usize)
    }

    /// Writes staged values to the GPU, growing the buffer if needed.
    ///
    /// Returns `true` when the buffer was (re)created; bind groups referencing
    /// the previous buffer must be rebuilt.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> bool {
        let needed = (self.len() as u64).max(1);
        let mut recreated = false;

        if self.buffer.is_none() || needed > self.capacity {
            let capacity = needed.next_power_of_two().max(16);
            self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: capacity * self.stride,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = capacity;
            recreated = true;
            log::debug!("{}: capacity -> {} slots", self.label, capacity);
        }

        if let Some(buffer) = self.buffer.as_ref() {
            if !self.staging.is_empty() {
                queue.write_buffer(buffer, 0, &self.staging);
            }
        }

        recreated
    }

    /// Binding for a single slot; pair with a dynamic offset from `push`.
    pub fn binding(&self) -> Option<wgpu::BindingResource<'_>> {
        let buffer = self.buffer.as_ref()?;
        Some(wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer,
            offset: 0,
            size: wgpu::BufferSize::new(self.item_size),
        }))
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::{Pod, Zeroable};

    use super::*;

    #[repr(C)]
    #[derive(Debug, Copy, Clone, Pod, Zeroable)]
    struct Payload {
        a: [f32; 4],
        b: [f32; 4],
    }

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(UniformArena::new("t", 208, 256).stride(), 256);
        assert_eq!(UniformArena::new("t", 256, 256).stride(), 256);
        assert_eq!(UniformArena::new("t", 272, 256).stride(), 512);
        assert_eq!(UniformArena::new("t", 32, 64).stride(), 64);
    }

    #[test]
    fn push_returns_consecutive_offsets() {
        let mut arena = UniformArena::new("t", 32, 256);
        let p = Payload { a: [1.0; 4], b: [2.0; 4] };
        assert_eq!(arena.push(&p), 0);
        assert_eq!(arena.push(&p), 256);
        assert_eq!(arena.push(&p), 512);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn slots_keep_their_own_values() {
        let mut arena = UniformArena::new("t", 32, 256);
        let first = arena.push(&Payload { a: [1.0; 4], b: [0.0; 4] });
        let second = arena.push(&Payload { a: [5.0; 4], b: [0.0; 4] });

        let read = |off| -> Payload { bytemuck::pod_read_unaligned(arena.slot(off).unwrap()) };
        assert_eq!(read(first).a, [1.0; 4]);
        assert_eq!(read(second).a, [5.0; 4]);
    }

    #[test]
    fn clear_restarts_at_zero() {
        let mut arena = UniformArena::new("t", 32, 256);
        arena.push(&Payload::zeroed());
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.push(&Payload::zeroed()), 0);
    }
}
