//! GPU buffer management for the flattened adjacency
//!
//! The immutable inputs (`offsets`, `counts`, `neighbors`, `out_degree`) are
//! uploaded once, before the iteration loop; only the previous rank vector
//! crosses the host/device boundary per iteration. All buffers are released
//! when the owning executor drops.

use super::GpuDevice;
use crate::storage::FlatAdjacency;
use anyhow::Result;

/// Device-side buffers for one ranking run
#[derive(Debug)]
pub struct GpuRankBuffers {
    /// Number of destination nodes
    pub num_rows: usize,

    /// Per-destination start offsets into `neighbors` (read-only storage)
    pub offsets: wgpu::Buffer,

    /// Per-destination neighbor counts (read-only storage)
    pub counts: wgpu::Buffer,

    /// Concatenated in-neighbor indices (read-only storage)
    pub neighbors: wgpu::Buffer,

    /// Distinct outgoing arc counts per node (read-only storage)
    pub out_degree: wgpu::Buffer,

    /// Previous (normalized) rank vector, rewritten each iteration
    pub old_ranks: wgpu::Buffer,

    /// Kernel output, copied to `staging` after each dispatch
    pub new_ranks: wgpu::Buffer,

    /// Per-iteration scalar arguments uniform
    pub params: wgpu::Buffer,

    /// Reusable MAP_READ staging buffer for readback
    pub staging: wgpu::Buffer,
}

impl GpuRankBuffers {
    /// Upload a frozen flattened adjacency and out-degree table.
    ///
    /// Must only be called for a non-empty graph; the engine short-circuits
    /// the zero-node case before any device work.
    ///
    /// # Errors
    ///
    /// Returns error if buffer allocation fails.
    pub fn from_flat(
        device: &GpuDevice,
        flat: &FlatAdjacency,
        out_degree: &[u32],
        params_size: u64,
    ) -> Result<Self> {
        let num_rows = flat.num_rows();
        let (neighbors, offsets, counts) = flat.components();

        let offsets = device.create_buffer_init(
            "rank offsets",
            bytemuck::cast_slice(offsets),
            wgpu::BufferUsages::STORAGE,
        )?;

        let counts = device.create_buffer_init(
            "rank counts",
            bytemuck::cast_slice(counts),
            wgpu::BufferUsages::STORAGE,
        )?;

        let neighbors = device.create_buffer_init(
            "rank neighbors",
            bytemuck::cast_slice(neighbors),
            wgpu::BufferUsages::STORAGE,
        )?;

        let out_degree = device.create_buffer_init(
            "rank out_degree",
            bytemuck::cast_slice(out_degree),
            wgpu::BufferUsages::STORAGE,
        )?;

        let vector_size = (num_rows * std::mem::size_of::<f32>()) as u64;

        let old_ranks = device.create_buffer(
            "rank old_ranks",
            vector_size,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        )?;

        let new_ranks = device.create_buffer(
            "rank new_ranks",
            vector_size,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        )?;

        let params = device.create_buffer(
            "rank params",
            params_size,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )?;

        let staging = device.create_buffer(
            "rank staging",
            vector_size,
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        )?;

        Ok(Self {
            num_rows,
            offsets,
            counts,
            neighbors,
            out_degree,
            old_ranks,
            new_ranks,
            params,
            staging,
        })
    }

    /// Byte size of one rank vector on the device
    #[must_use]
    pub fn vector_size(&self) -> u64 {
        (self.num_rows * std::mem::size_of::<f32>()) as u64
    }
}
