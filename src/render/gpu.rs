use wgpu::util::DeviceExt;

use crate::buffer::output::OutputBuffer;
use crate::foundation::core::{Domain, Float4};
use crate::foundation::error::{ViewerError, ViewerResult};
use crate::render::backend::{BackendKind, RenderSettings, SinkBackend};
use crate::sink::plan::{SinkInputs, SinkPlan};
use crate::sink::strategy::Strategy;

const WORKGROUP_SIZE: u32 = 16;

// Mirrors `sink::kernels`: same clipping rule, same four pixel functions.
const WRITE_OUTPUT_WGSL: &str = r#"
struct PassParams {
  lower_bound: vec2<i32>,
  upper_bound: vec2<i32>,
  domain_size: vec2<u32>,
  output_size: vec2<u32>,
  image_size: vec2<u32>,
  alpha_size: vec2<u32>,
  image_single: u32,
  alpha_single: u32,
  pad: vec2<u32>,
  fill: vec4<f32>,
};

@group(0) @binding(0) var<uniform> params: PassParams;
@group(0) @binding(1) var<storage, read> image_px: array<vec4<f32>>;
@group(0) @binding(2) var<storage, read> alpha_px: array<f32>;
@group(0) @binding(3) var<storage, read_write> output_px: array<vec4<f32>>;

fn inside(p: vec2<i32>, size: vec2<u32>) -> bool {
  return p.x >= 0 && p.y >= 0 && u32(p.x) < size.x && u32(p.y) < size.y;
}

fn load_image(texel: vec2<i32>) -> vec4<f32> {
  if params.image_single != 0u {
    return image_px[0];
  }
  if !inside(texel, params.image_size) {
    return vec4<f32>(0.0);
  }
  return image_px[u32(texel.y) * params.image_size.x + u32(texel.x)];
}

fn load_alpha(texel: vec2<i32>) -> f32 {
  if params.alpha_single != 0u {
    return alpha_px[0];
  }
  if !inside(texel, params.alpha_size) {
    return 0.0;
  }
  return alpha_px[u32(texel.y) * params.alpha_size.x + u32(texel.x)];
}

// Linear output index of this invocation's write, or -1 when clipped.
fn output_index(texel: vec2<i32>) -> i32 {
  if !inside(texel, params.domain_size) {
    return -1;
  }
  let out = texel + params.lower_bound;
  if any(out < params.lower_bound) || any(out > params.upper_bound) {
    return -1;
  }
  if !inside(out, params.output_size) {
    return -1;
  }
  return i32(u32(out.y) * params.output_size.x + u32(out.x));
}

@compute @workgroup_size(16, 16, 1)
fn write_output_clear(@builtin(global_invocation_id) id: vec3<u32>) {
  let idx = output_index(vec2<i32>(id.xy));
  if idx < 0 {
    return;
  }
  output_px[idx] = params.fill;
}

@compute @workgroup_size(16, 16, 1)
fn write_output_opaque(@builtin(global_invocation_id) id: vec3<u32>) {
  let texel = vec2<i32>(id.xy);
  let idx = output_index(texel);
  if idx < 0 {
    return;
  }
  output_px[idx] = vec4<f32>(load_image(texel).xyz, 1.0);
}

@compute @workgroup_size(16, 16, 1)
fn write_output(@builtin(global_invocation_id) id: vec3<u32>) {
  let texel = vec2<i32>(id.xy);
  let idx = output_index(texel);
  if idx < 0 {
    return;
  }
  output_px[idx] = load_image(texel);
}

@compute @workgroup_size(16, 16, 1)
fn write_output_alpha(@builtin(global_invocation_id) id: vec3<u32>) {
  let texel = vec2<i32>(id.xy);
  let idx = output_index(texel);
  if idx < 0 {
    return;
  }
  output_px[idx] = vec4<f32>(load_image(texel).xyz, load_alpha(texel));
}
"#;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct PassParams {
    lower_bound: [i32; 2],
    upper_bound: [i32; 2],
    domain_size: [u32; 2],
    output_size: [u32; 2],
    image_size: [u32; 2],
    alpha_size: [u32; 2],
    image_single: u32,
    alpha_single: u32,
    pad: [u32; 2],
    fill: [f32; 4],
}

impl PassParams {
    fn new(plan: &SinkPlan, inputs: &SinkInputs<'_>, output: Domain) -> Self {
        Self {
            lower_bound: [plan.bounds.min.x, plan.bounds.min.y],
            upper_bound: [plan.bounds.max.x, plan.bounds.max.y],
            domain_size: [plan.domain.width, plan.domain.height],
            output_size: [output.width, output.height],
            image_size: [inputs.image.width(), inputs.image.height()],
            alpha_size: [inputs.alpha.width(), inputs.alpha.height()],
            image_single: u32::from(inputs.image.is_single_value()),
            alpha_single: u32::from(inputs.alpha.is_single_value()),
            pad: [0; 2],
            fill: plan.fill,
        }
    }
}

struct Kernels {
    bind_group_layout: wgpu::BindGroupLayout,
    clear: wgpu::ComputePipeline,
    opaque: wgpu::ComputePipeline,
    copy: wgpu::ComputePipeline,
    set_alpha: wgpu::ComputePipeline,
}

impl Kernels {
    fn pipeline(&self, strategy: Strategy) -> &wgpu::ComputePipeline {
        match strategy {
            Strategy::Clear => &self.clear,
            Strategy::IgnoreAlpha => &self.opaque,
            Strategy::Copy => &self.copy,
            Strategy::SetAlpha => &self.set_alpha,
        }
    }
}

/// Device backend: one compute dispatch per invocation, clipping done inside the kernel.
///
/// The output buffer is uploaded before the dispatch and read back after, so texels the kernel
/// clips keep their caller-provided values.
pub struct GpuBackend {
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    kernels: Option<Kernels>,
}

impl GpuBackend {
    /// Create an uninitialized backend; the device is requested on first use.
    pub fn new(_settings: &RenderSettings) -> Self {
        Self {
            device: None,
            queue: None,
            kernels: None,
        }
    }

    fn ensure_init(&mut self) -> ViewerResult<()> {
        if self.device.is_some() {
            return Ok(());
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => {
                ViewerError::backend("no gpu adapter available")
            }
            other => ViewerError::backend(format!("wgpu request_adapter failed: {other:?}")),
        })?;
        let info = adapter.get_info();
        tracing::debug!(adapter = %info.name, backend = ?info.backend, "gpu adapter selected");

        let required_limits = buffer_limits(&adapter.limits());
        tracing::debug!(
            max_buffer_size = required_limits.max_buffer_size,
            max_storage_binding = required_limits.max_storage_buffer_binding_size,
            "gpu buffer limits"
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("viewer_sink_device"),
            required_features: wgpu::Features::empty(),
            required_limits,
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| ViewerError::backend(format!("wgpu request_device failed: {e:?}")))?;

        self.kernels = Some(create_kernels(&device));
        self.device = Some(device);
        self.queue = Some(queue);
        Ok(())
    }
}

/// Default limits with the buffer ceilings raised to what the adapter supports.
fn buffer_limits(supported: &wgpu::Limits) -> wgpu::Limits {
    wgpu::Limits {
        max_buffer_size: supported.max_buffer_size,
        max_storage_buffer_binding_size: supported.max_storage_buffer_binding_size,
        ..wgpu::Limits::default()
    }
}

/// Reject planes that cannot be bound as a single storage buffer on this device.
fn check_plane_sizes(limits: &wgpu::Limits, planes: &[(&str, u64)]) -> ViewerResult<()> {
    let max = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
    for &(name, size) in planes {
        if size > max {
            return Err(ViewerError::backend(format!(
                "{name} plane is {size} bytes, device storage binding limit is {max} bytes"
            )));
        }
    }
    Ok(())
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

fn create_kernels(device: &wgpu::Device) -> Kernels {
    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("viewer_sink_bgl"),
        entries: &[
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
            storage_entry(1, true),
            storage_entry(2, true),
            storage_entry(3, false),
        ],
    });

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("viewer_sink_write_output"),
        source: wgpu::ShaderSource::Wgsl(WRITE_OUTPUT_WGSL.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("viewer_sink_pl"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = |entry: &str| {
        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(entry),
            layout: Some(&layout),
            module: &shader,
            entry_point: Some(entry),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        })
    };

    Kernels {
        clear: pipeline("write_output_clear"),
        opaque: pipeline("write_output_opaque"),
        copy: pipeline("write_output"),
        set_alpha: pipeline("write_output_alpha"),
        bind_group_layout,
    }
}

impl SinkBackend for GpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn execute_pass(
        &mut self,
        plan: &SinkPlan,
        inputs: &SinkInputs<'_>,
        output: &mut OutputBuffer,
    ) -> ViewerResult<()> {
        self.ensure_init()?;
        let not_init = || ViewerError::backend("gpu backend not initialized");
        let device = self.device.as_ref().ok_or_else(not_init)?;
        let queue = self.queue.as_ref().ok_or_else(not_init)?;
        let kernels = self.kernels.as_ref().ok_or_else(not_init)?;

        let params = PassParams::new(plan, inputs, output.domain());
        let (image_plane, alpha_plane) = match plan.strategy {
            Strategy::Clear => (vec![[0.0f32; 4]], vec![0.0f32]),
            Strategy::IgnoreAlpha | Strategy::Copy => {
                (non_empty(inputs.image.to_color_plane()), vec![0.0f32])
            }
            Strategy::SetAlpha => (
                non_empty(inputs.image.to_color_plane()),
                non_empty(inputs.alpha.to_float_plane()),
            ),
        };

        let out_size = std::mem::size_of_val(output.pixels()) as u64;
        check_plane_sizes(
            &device.limits(),
            &[
                ("output", out_size),
                ("image", std::mem::size_of_val(image_plane.as_slice()) as u64),
                ("alpha", std::mem::size_of_val(alpha_plane.as_slice()) as u64),
            ],
        )?;

        let params_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("viewer_sink_params"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let image_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("viewer_sink_image"),
            contents: bytemuck::cast_slice(&image_plane),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let alpha_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("viewer_sink_alpha"),
            contents: bytemuck::cast_slice(&alpha_plane),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let out_bytes: &[u8] = bytemuck::cast_slice(output.pixels());
        let out_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("viewer_sink_output"),
            contents: out_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        });
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("viewer_sink_readback"),
            size: out_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("viewer_sink_bg"),
            layout: &kernels.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: image_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: alpha_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: out_buf.as_entire_binding(),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("viewer_sink_encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(plan.strategy.name()),
                timestamp_writes: None,
            });
            pass.set_pipeline(kernels.pipeline(plan.strategy));
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(
                plan.domain.width.div_ceil(WORKGROUP_SIZE),
                plan.domain.height.div_ceil(WORKGROUP_SIZE),
                1,
            );
        }
        encoder.copy_buffer_to_buffer(&out_buf, 0, &readback, 0, out_size);
        queue.submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| ViewerError::backend(format!("wgpu poll failed: {e:?}")))?;
        rx.recv()
            .map_err(|_| ViewerError::backend("readback channel closed"))?
            .map_err(|e| ViewerError::backend(format!("readback map failed: {e:?}")))?;

        {
            let mapped = slice.get_mapped_range();
            bytemuck::cast_slice_mut::<Float4, u8>(output.pixels_mut()).copy_from_slice(&mapped);
        }
        readback.unmap();
        Ok(())
    }
}

fn non_empty<T: Copy + Default>(mut plane: Vec<T>) -> Vec<T> {
    if plane.is_empty() {
        plane.push(T::default());
    }
    plane
}

#[cfg(test)]
#[path = "../../tests/unit/render/gpu.rs"]
mod tests;
