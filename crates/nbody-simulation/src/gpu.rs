//! GPU orchestrator for the data-parallel path
//!
//! Owns device mirrors of every body array and runs one frame as:
//! upload -> force pass -> integrate pass -> copy to staging -> blocking readback.
//!
//! A `GpuNBody` only exists once the device, both pipelines and all buffers are
//! ready; setup failures come back as errors so the caller can fall back to the
//! sequential path.

use crate::error::{SimulationError, SimulationResult};
use crate::kernel::{KernelSource, FORCE_ENTRY_POINT, INTEGRATE_ENTRY_POINT};
use crate::params::{GpuParams, SimParams};
use nbody_physics::BodySoa;
use std::sync::mpsc;

/// Lanes per workgroup (matches `@workgroup_size` in nbody.wgsl)
const WORKGROUP_SIZE: u32 = 256;

const FLOAT_SIZE: u64 = std::mem::size_of::<f32>() as u64;

/// Arrays copied back per step: x, y, vx, vy, ax, ay
const READBACK_ARRAYS: u64 = 6;

/// One device buffer to allocate
struct BufferPlan {
    label: &'static str,
    size: u64,
    usage: wgpu::BufferUsages,
}

impl BufferPlan {
    /// Reject the buffer up front if it exceeds the device limits
    fn check(&self, limits: &wgpu::Limits) -> SimulationResult<()> {
        check_size(self.label, self.size, limits.max_buffer_size)?;
        if self.usage.contains(wgpu::BufferUsages::STORAGE) {
            check_size(
                self.label,
                self.size,
                u64::from(limits.max_storage_buffer_binding_size),
            )?;
        }
        Ok(())
    }

    /// Create the buffer inside its own out-of-memory scope
    async fn allocate(&self, device: &wgpu::Device) -> SimulationResult<wgpu::Buffer> {
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(self.label),
            size: self.size,
            usage: self.usage,
            mapped_at_creation: false,
        });

        match device.pop_error_scope().await {
            Some(err) => Err(SimulationError::Allocation {
                buffer: self.label,
                size: self.size,
                reason: err.to_string(),
            }),
            None => Ok(buffer),
        }
    }
}

/// Device mirrors of the body store, one buffer per attribute
struct BodyBuffers {
    x: wgpu::Buffer,
    y: wgpu::Buffer,
    vx: wgpu::Buffer,
    vy: wgpu::Buffer,
    ax: wgpu::Buffer,
    ay: wgpu::Buffer,
    m: wgpu::Buffer,
}

impl BodyBuffers {
    /// Plans in binding order (0..=6), each `size` bytes
    fn plans(size: u64) -> [BufferPlan; 7] {
        let dynamic = wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_DST
            | wgpu::BufferUsages::COPY_SRC;
        let plan = |label, usage| BufferPlan { label, size, usage };

        [
            plan("Position X Buffer", dynamic),
            plan("Position Y Buffer", dynamic),
            plan("Velocity X Buffer", dynamic),
            plan("Velocity Y Buffer", dynamic),
            plan("Acceleration X Buffer", dynamic),
            plan("Acceleration Y Buffer", dynamic),
            plan(
                "Mass Buffer",
                wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            ),
        ]
    }

    async fn allocate(device: &wgpu::Device, plans: &[BufferPlan; 7]) -> SimulationResult<Self> {
        let [x, y, vx, vy, ax, ay, m] = plans;
        Ok(Self {
            x: x.allocate(device).await?,
            y: y.allocate(device).await?,
            vx: vx.allocate(device).await?,
            vy: vy.allocate(device).await?,
            ax: ax.allocate(device).await?,
            ay: ay.allocate(device).await?,
            m: m.allocate(device).await?,
        })
    }

    /// Buffers in binding order (0..=6)
    fn bindings(&self) -> [&wgpu::Buffer; 7] {
        [
            &self.x, &self.y, &self.vx, &self.vy, &self.ax, &self.ay, &self.m,
        ]
    }

    /// Buffers in staging order
    fn readback(&self) -> [&wgpu::Buffer; READBACK_ARRAYS as usize] {
        [&self.x, &self.y, &self.vx, &self.vy, &self.ax, &self.ay]
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn check_size(buffer: &'static str, size: u64, limit: u64) -> SimulationResult<()> {
    if size > limit {
        return Err(SimulationError::BufferTooLarge {
            buffer,
            size,
            limit,
        });
    }
    Ok(())
}

/// Collect compiler messages for a failed build
async fn build_log(shader: &wgpu::ShaderModule, error: &wgpu::Error) -> String {
    let info = shader.get_compilation_info().await;
    let mut lines: Vec<String> = info
        .messages
        .iter()
        .map(|msg| match &msg.location {
            Some(loc) => format!(
                "{:?} at line {}:{}: {}",
                msg.message_type, loc.line_number, loc.line_position, msg.message
            ),
            None => format!("{:?}: {}", msg.message_type, msg.message),
        })
        .collect();
    lines.push(error.to_string());
    lines.join("\n")
}

/// Data-parallel gravity engine on a wgpu device
pub struct GpuNBody {
    device: wgpu::Device,
    queue: wgpu::Queue,

    // Buffers
    buffers: BodyBuffers,
    params_buffer: wgpu::Buffer,
    staging_buffer: wgpu::Buffer,

    // Compute pipelines (same module, same layout)
    force_pipeline: wgpu::ComputePipeline,
    integrate_pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,

    body_count: u32,
    adapter_name: String,
}

impl GpuNBody {
    /// Discover an adapter, open a device and build everything for `body_count` bodies.
    pub async fn setup(body_count: usize, source: &KernelSource) -> SimulationResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("✓ Using GPU: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("N-Body Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let mut gpu = Self::new(device, queue, body_count, source).await?;
        gpu.adapter_name = info.name;
        Ok(gpu)
    }

    /// [`GpuNBody::setup`] driven to completion on the current thread
    pub fn setup_blocking(body_count: usize, source: &KernelSource) -> SimulationResult<Self> {
        pollster::block_on(Self::setup(body_count, source))
    }

    /// Build buffers and pipelines on an existing device
    pub async fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        body_count: usize,
        source: &KernelSource,
    ) -> SimulationResult<Self> {
        log::info!("Initializing GpuNBody for {} bodies...", body_count);

        // Zero bodies still needs non-empty bindings
        let array_size = FLOAT_SIZE * body_count.max(1) as u64;
        let staging_size = array_size * READBACK_ARRAYS;
        let body_count = u32::try_from(body_count).map_err(|_| SimulationError::BufferTooLarge {
            buffer: "body buffers",
            size: array_size,
            limit: u32::MAX as u64 * FLOAT_SIZE,
        })?;

        let body_plans = BodyBuffers::plans(array_size);
        let params_plan = BufferPlan {
            label: "Sim Params Buffer",
            size: std::mem::size_of::<GpuParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        };
        let staging_plan = BufferPlan {
            label: "Readback Staging Buffer",
            size: staging_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        };

        let limits = device.limits();
        for plan in body_plans.iter().chain([&params_plan, &staging_plan]) {
            plan.check(&limits)?;
        }

        let source_text = source.load()?;

        // Create buffers
        let buffers = BodyBuffers::allocate(&device, &body_plans).await?;
        let params_buffer = params_plan.allocate(&device).await?;
        let staging_buffer = staging_plan.allocate(&device).await?;

        log::info!("Buffers created ({} bytes per array)", array_size);

        // Build the program
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("N-Body Kernels"),
            source: wgpu::ShaderSource::Wgsl(source_text),
        });

        // 0-5: dynamic arrays, 6: mass, 7: params
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("N-Body Bind Group Layout"),
            entries: &[
                storage_entry(0, false),
                storage_entry(1, false),
                storage_entry(2, false),
                storage_entry(3, false),
                storage_entry(4, false),
                storage_entry(5, false),
                storage_entry(6, true),
                wgpu::BindGroupLayoutEntry {
                    binding: 7,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("N-Body Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        log::debug!("Creating force pipeline...");
        let force_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Force Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some(FORCE_ENTRY_POINT),
            compilation_options: Default::default(),
            cache: None,
        });

        log::debug!("Creating integrate pipeline...");
        let integrate_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Integration Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some(INTEGRATE_ENTRY_POINT),
            compilation_options: Default::default(),
            cache: None,
        });

        let mut entries: Vec<wgpu::BindGroupEntry> = buffers
            .bindings()
            .into_iter()
            .enumerate()
            .map(|(binding, buffer)| wgpu::BindGroupEntry {
                binding: binding as u32,
                resource: buffer.as_entire_binding(),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: 7,
            resource: params_buffer.as_entire_binding(),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("N-Body Bind Group"),
            layout: &bind_group_layout,
            entries: &entries,
        });

        if let Some(err) = device.pop_error_scope().await {
            return Err(SimulationError::KernelBuild {
                log: build_log(&shader, &err).await,
            });
        }

        log::info!("Pipelines created from {}", source.describe());

        Ok(Self {
            device,
            queue,
            buffers,
            params_buffer,
            staging_buffer,
            force_pipeline,
            integrate_pipeline,
            bind_group,
            body_count,
            adapter_name: String::new(),
        })
    }

    /// Advance `store` by one step on the device.
    ///
    /// Blocks until both kernels have finished and the results are back in
    /// `store`. Panics if `store` does not have the size this orchestrator was
    /// built for.
    pub fn step(&mut self, store: &mut BodySoa, params: &SimParams) -> SimulationResult<()> {
        assert_eq!(
            store.len(),
            self.body_count as usize,
            "body store does not match the device mirrors"
        );
        if store.is_empty() {
            return Ok(());
        }

        // Upload inputs
        let b = &self.buffers;
        self.queue.write_buffer(&b.x, 0, bytemuck::cast_slice(&store.x));
        self.queue.write_buffer(&b.y, 0, bytemuck::cast_slice(&store.y));
        self.queue.write_buffer(&b.vx, 0, bytemuck::cast_slice(&store.vx));
        self.queue.write_buffer(&b.vy, 0, bytemuck::cast_slice(&store.vy));
        self.queue.write_buffer(&b.m, 0, bytemuck::cast_slice(&store.m));
        self.queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::bytes_of(&GpuParams::new(params, self.body_count)),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("N-Body Step Encoder"),
            });

        let workgroup_count = self.body_count.div_ceil(WORKGROUP_SIZE);

        // Step 1: Compute forces
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Force Compute Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.force_pipeline);
            compute_pass.set_bind_group(0, &self.bind_group, &[]);
            compute_pass.dispatch_workgroups(workgroup_count, 1, 1);
        }

        // Step 2: Integrate motion. A separate pass, so the acceleration writes
        // above are complete and visible before any lane reads them.
        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Integration Compute Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.integrate_pipeline);
            compute_pass.set_bind_group(0, &self.bind_group, &[]);
            compute_pass.dispatch_workgroups(workgroup_count, 1, 1);
        }

        // Step 3: Stage results for readback
        let array_size = FLOAT_SIZE * self.body_count as u64;
        for (slot, buffer) in self.buffers.readback().into_iter().enumerate() {
            encoder.copy_buffer_to_buffer(
                buffer,
                0,
                &self.staging_buffer,
                slot as u64 * array_size,
                array_size,
            );
        }

        let submission = self.queue.submit(std::iter::once(encoder.finish()));

        // Step 4: Blocking download
        let slice = self.staging_buffer.slice(..array_size * READBACK_ARRAYS);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::PollType::Wait {
            submission_index: Some(submission),
            timeout: None,
        })?;
        receiver
            .recv()
            .map_err(|_| SimulationError::ReadbackAbandoned)??;

        {
            let data = slice.get_mapped_range();
            let floats = bytemuck::cast_slice::<u8, f32>(&data);
            let targets = [
                &mut store.x,
                &mut store.y,
                &mut store.vx,
                &mut store.vy,
                &mut store.ax,
                &mut store.ay,
            ];
            for (target, chunk) in targets
                .into_iter()
                .zip(floats.chunks_exact(self.body_count as usize))
            {
                target.copy_from_slice(chunk);
            }
        }
        self.staging_buffer.unmap();

        log::trace!("GPU step complete ({} workgroups)", workgroup_count);
        Ok(())
    }

    pub fn body_count(&self) -> u32 {
        self.body_count
    }

    /// Name of the adapter in use; empty when built on a caller-provided device
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }
}
