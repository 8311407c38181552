//! GPU rank-update executor
//!
//! One compute pipeline and bind group built at construction; per iteration
//! the executor uploads the previous vector and the scalar arguments,
//! records the kernel dispatch and the result copy in a single command
//! encoder, and awaits the map-completion event before reading back.
//!
//! Ordering is expressed as data dependencies, not assumptions: queue
//! writes precede the commands of the next submission, the copy is encoded
//! after the compute pass, and readback waits on the `map_async` completion
//! channel. The convergence reduction stays host-side; it is cheap next to
//! the kernel.
//!
//! The kernel computes in f32 (WGSL has no f64); CPU/GPU agreement is to a
//! documented epsilon, not bit-for-bit.

use super::{GpuDevice, GpuRankBuffers};
use crate::rank::RankExecutor;
use crate::storage::FlatAdjacency;
use anyhow::{Context, Result};

const WORKGROUP_SIZE: u32 = 256;

/// Scalar kernel arguments, rewritten each iteration
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct RankParams {
    num_nodes: u32,
    alpha: f32,
    base: f32,
    _padding: u32,
}

/// Data-parallel backend executing one kernel launch per iteration
pub struct GpuExecutor<'d> {
    device: &'d GpuDevice,
    buffers: GpuRankBuffers,
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,

    /// f64 → f32 conversion scratch, reused across iterations
    upload: Vec<f32>,
}

impl<'d> GpuExecutor<'d> {
    /// Build the pipeline and upload the frozen graph.
    ///
    /// The flattened adjacency and out-degrees cross the host/device
    /// boundary exactly once, here.
    ///
    /// # Errors
    ///
    /// Returns error if the shader fails validation or buffer allocation
    /// fails. Both are fatal for the run.
    #[allow(clippy::too_many_lines)]
    pub async fn new(
        device: &'d GpuDevice,
        flat: &FlatAdjacency,
        out_degree: &[u32],
    ) -> Result<GpuExecutor<'d>> {
        const SHADER: &str = include_str!("shaders/pagerank.wgsl");
        let shader_module = device.build_shader("rank update shader", SHADER).await?;

        let read_only_storage = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout =
            device
                .device()
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("rank bind group layout"),
                    entries: &[
                        // @binding(0): uniform params
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        read_only_storage(1), // offsets
                        read_only_storage(2), // counts
                        read_only_storage(3), // neighbors
                        read_only_storage(4), // out_degree
                        read_only_storage(5), // old_ranks
                        // @binding(6): storage new_ranks (read_write)
                        wgpu::BindGroupLayoutEntry {
                            binding: 6,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Storage { read_only: false },
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            device
                .device()
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("rank pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    push_constant_ranges: &[],
                });

        let pipeline = device
            .device()
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("rank pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader_module,
                entry_point: "rank_update",
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            });

        let buffers = GpuRankBuffers::from_flat(
            device,
            flat,
            out_degree,
            std::mem::size_of::<RankParams>() as u64,
        )?;

        let bind_group = device
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("rank bind group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffers.params.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: buffers.offsets.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buffers.counts.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: buffers.neighbors.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: buffers.out_degree.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 5,
                        resource: buffers.old_ranks.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 6,
                        resource: buffers.new_ranks.as_entire_binding(),
                    },
                ],
            });

        Ok(GpuExecutor {
            device,
            buffers,
            pipeline,
            bind_group,
            upload: Vec::new(),
        })
    }
}

impl RankExecutor for GpuExecutor<'_> {
    #[allow(clippy::cast_possible_truncation)] // node space is u32 by construction
    async fn update_ranks(
        &mut self,
        alpha: f64,
        base: f64,
        old_pr: &[f64],
        pr: &mut [f64],
    ) -> Result<()> {
        let num_nodes = self.buffers.num_rows as u32;
        let queue = self.device.queue();

        // Per-iteration mutable inputs: previous vector and scalar args.
        // Queue writes are ordered before the next submission's commands.
        self.upload.clear();
        self.upload.extend(old_pr.iter().map(|&p| p as f32));
        queue.write_buffer(
            &self.buffers.old_ranks,
            0,
            bytemuck::cast_slice(&self.upload),
        );
        queue.write_buffer(
            &self.buffers.params,
            0,
            bytemuck::bytes_of(&RankParams {
                num_nodes,
                alpha: alpha as f32,
                base: base as f32,
                _padding: 0,
            }),
        );

        // Kernel dispatch and result copy in one encoder: the copy cannot
        // begin before the pass completes.
        let mut encoder = self
            .device
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("rank iteration"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("rank update pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.dispatch_workgroups(num_nodes.div_ceil(WORKGROUP_SIZE).max(1), 1, 1);
        }
        encoder.copy_buffer_to_buffer(
            &self.buffers.new_ranks,
            0,
            &self.buffers.staging,
            0,
            self.buffers.vector_size(),
        );
        queue.submit(Some(encoder.finish()));

        // Readback waits on the map completion event.
        let slice = self.buffers.staging.slice(..);
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        self.device.device().poll(wgpu::Maintain::Wait);
        rx.receive()
            .await
            .context("Failed to receive map result")?
            .context("Buffer mapping failed")?;

        {
            let data = slice.get_mapped_range();
            let scores: &[f32] = bytemuck::cast_slice(&data);
            for (dst, &score) in pr.iter_mut().zip(scores) {
                *dst = f64::from(score);
            }
        }
        self.buffers.staging.unmap();

        Ok(())
    }
}
