//! wgpu compute device executing the WGSL kernels from `probe_shaders`.
//!
//! Pipelines are built once when the device session is created; each kernel
//! invocation binds its operand buffers, dispatches, and blocks until the
//! device is idle. `f32` only: WGSL has no 64-bit float type, so `f64`
//! invocations go through the software device instead.

use std::sync::mpsc;

use bytemuck::{bytes_of, cast_slice};
use probe_core::layout::packed_len;
use probe_core::{FillMode, KernelStatus, ProbeError};
use probe_shaders::compute;
use wgpu::util::DeviceExt;

use crate::backend::DeviceKernels;

const WORKGROUP_SIZE: u32 = 64;
const ELEM_SIZE: u64 = std::mem::size_of::<f32>() as u64;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SpmvParams {
    n: u32,
    batch_count: u32,
    uplo: u32,
    incx: i32,
    incy: i32,
    stride_a: u32,
    stride_x: u32,
    stride_y: u32,
    alpha: f32,
    beta: f32,
    _pad0: u32,
    _pad1: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SyrParams {
    n: u32,
    lda: u32,
    batch_count: u32,
    uplo: u32,
    incx: i32,
    stride_x: u32,
    stride_a: u32,
    alpha: f32,
}

enum BindingKind {
    StorageRead,
    StorageReadWrite,
    Uniform,
}

struct ComputeOp {
    pipeline: wgpu::ComputePipeline,
    layout: wgpu::BindGroupLayout,
}

/// One device session: adapter, queue, and the compiled kernel pipelines.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    spmv: ComputeOp,
    syr: ComputeOp,
}

/// One device-resident allocation. `len` is the logical element count; the
/// underlying buffer never shrinks below one element so it stays bindable.
pub struct WgpuBuffer {
    raw: wgpu::Buffer,
    len: usize,
}

impl WgpuBuffer {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn uplo_flag(uplo: FillMode) -> u32 {
    match uplo {
        FillMode::Upper => 0,
        FillMode::Lower => 1,
    }
}

fn vector_extent(count: usize, inc: i32) -> usize {
    if count == 0 {
        0
    } else {
        (count - 1) * inc.unsigned_abs() as usize + 1
    }
}

fn matrix_extent(rows: usize, cols: usize, ld: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (cols - 1) * ld + rows
    }
}

impl ComputeOp {
    fn new(
        device: &wgpu::Device,
        label: &str,
        source: &str,
        entry_point: &str,
        bindings: &[BindingKind],
    ) -> Self {
        let entries: Vec<wgpu::BindGroupLayoutEntry> = bindings
            .iter()
            .enumerate()
            .map(|(i, kind)| wgpu::BindGroupLayoutEntry {
                binding: i as u32,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: match kind {
                        BindingKind::StorageRead => {
                            wgpu::BufferBindingType::Storage { read_only: true }
                        }
                        BindingKind::StorageReadWrite => {
                            wgpu::BufferBindingType::Storage { read_only: false }
                        }
                        BindingKind::Uniform => wgpu::BufferBindingType::Uniform,
                    },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            })
            .collect();

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some(entry_point),
            compilation_options: Default::default(),
            cache: None,
        });

        Self { pipeline, layout }
    }
}

impl WgpuDevice {
    pub fn new() -> Result<Self, ProbeError> {
        pollster::block_on(Self::new_async())
    }

    async fn new_async() -> Result<Self, ProbeError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .map_err(|_| ProbeError::NoAdapter)?;
        tracing::debug!(adapter = %adapter.get_info().name, "selected wgpu adapter");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("batch_probe_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|err| ProbeError::DeviceRequest(err.to_string()))?;

        let spmv = ComputeOp::new(
            &device,
            "spmv_strided_batched",
            compute::SPMV_STRIDED_BATCHED,
            "spmv_strided_batched",
            &[
                BindingKind::StorageRead,
                BindingKind::StorageRead,
                BindingKind::StorageReadWrite,
                BindingKind::Uniform,
            ],
        );
        let syr = ComputeOp::new(
            &device,
            "syr_strided_batched",
            compute::SYR_STRIDED_BATCHED,
            "syr_strided_batched",
            &[
                BindingKind::StorageRead,
                BindingKind::StorageReadWrite,
                BindingKind::Uniform,
            ],
        );

        Ok(Self {
            device,
            queue,
            spmv,
            syr,
        })
    }

    fn readback(&self, src: &WgpuBuffer, dst: &mut [f32]) -> Result<(), ProbeError> {
        if dst.is_empty() {
            return Ok(());
        }
        let bytes = dst.len() as u64 * ELEM_SIZE;
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("probe_staging"),
            size: bytes,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("probe_readback"),
            });
        encoder.copy_buffer_to_buffer(&src.raw, 0, &staging, 0, bytes);
        self.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::MaintainBase::Wait);
        rx.recv()
            .map_err(|_| ProbeError::Readback("map callback dropped".into()))?
            .map_err(|err| ProbeError::Readback(err.to_string()))?;

        let data = slice.get_mapped_range();
        dst.copy_from_slice(cast_slice(&data));
        drop(data);
        staging.unmap();
        Ok(())
    }

    fn dispatch(&self, op: &ComputeOp, bind_group: &wgpu::BindGroup, threads: u32) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("probe_dispatch"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor::default());
            pass.set_pipeline(&op.pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            let workgroups = threads.div_ceil(WORKGROUP_SIZE);
            pass.dispatch_workgroups(workgroups, 1, 1);
        }
        self.queue.submit(Some(encoder.finish()));
        // the harness models kernel invocation as a blocking call
        let _ = self.device.poll(wgpu::MaintainBase::Wait);
    }
}

impl DeviceKernels<f32> for WgpuDevice {
    type Buffer = WgpuBuffer;

    fn alloc(&mut self, len: usize) -> Result<Self::Buffer, ProbeError> {
        let raw = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("probe_operand"),
            size: len.max(1) as u64 * ELEM_SIZE,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Ok(WgpuBuffer { raw, len })
    }

    fn copy_to_device(&mut self, dst: &mut Self::Buffer, src: &[f32]) -> Result<(), ProbeError> {
        if src.len() > dst.len {
            return Err(ProbeError::Transfer(format!(
                "host source of {} elements exceeds device allocation of {}",
                src.len(),
                dst.len
            )));
        }
        if !src.is_empty() {
            self.queue.write_buffer(&dst.raw, 0, cast_slice(src));
        }
        Ok(())
    }

    fn copy_to_host(&mut self, src: &Self::Buffer, dst: &mut [f32]) -> Result<(), ProbeError> {
        if dst.len() > src.len {
            return Err(ProbeError::Transfer(format!(
                "host destination of {} elements exceeds device allocation of {}",
                dst.len(),
                src.len
            )));
        }
        self.readback(src, dst)
    }

    fn set_matrix(
        &mut self,
        rows: i32,
        cols: i32,
        src: &[f32],
        lda: i32,
        dst: &mut Self::Buffer,
        ldc: i32,
    ) -> KernelStatus {
        if rows < 0 || cols < 0 || lda <= 0 || ldc <= 0 || lda < rows || ldc < rows {
            return KernelStatus::InvalidValue;
        }
        let (rows, cols, lda, ldc) = (rows as usize, cols as usize, lda as usize, ldc as usize);
        if src.len() < matrix_extent(rows, cols, lda) || dst.len < matrix_extent(rows, cols, ldc) {
            return KernelStatus::ExecutionFailed;
        }
        for j in 0..cols {
            let column = &src[j * lda..j * lda + rows];
            self.queue
                .write_buffer(&dst.raw, (j * ldc) as u64 * ELEM_SIZE, cast_slice(column));
        }
        KernelStatus::Success
    }

    fn get_matrix(
        &mut self,
        rows: i32,
        cols: i32,
        src: &Self::Buffer,
        ldc: i32,
        dst: &mut [f32],
        ldb: i32,
    ) -> KernelStatus {
        if rows < 0 || cols < 0 || ldc <= 0 || ldb <= 0 || ldc < rows || ldb < rows {
            return KernelStatus::InvalidValue;
        }
        let (rows, cols, ldc, ldb) = (rows as usize, cols as usize, ldc as usize, ldb as usize);
        if src.len < matrix_extent(rows, cols, ldc) || dst.len() < matrix_extent(rows, cols, ldb) {
            return KernelStatus::ExecutionFailed;
        }
        let mut scratch = vec![0.0f32; matrix_extent(rows, cols, ldc)];
        if let Err(err) = self.readback(src, &mut scratch) {
            tracing::warn!(%err, "get_matrix readback failed");
            return KernelStatus::ExecutionFailed;
        }
        for j in 0..cols {
            dst[j * ldb..j * ldb + rows].copy_from_slice(&scratch[j * ldc..j * ldc + rows]);
        }
        KernelStatus::Success
    }

    fn spmv_strided_batched(
        &mut self,
        uplo: FillMode,
        n: i32,
        alpha: f32,
        ap: &Self::Buffer,
        stride_a: i64,
        x: &Self::Buffer,
        incx: i32,
        stride_x: i64,
        beta: f32,
        y: &mut Self::Buffer,
        incy: i32,
        stride_y: i64,
        batch_count: i32,
    ) -> KernelStatus {
        if n < 0 || incx == 0 || incy == 0 || batch_count < 0 {
            return KernelStatus::InvalidValue;
        }
        let (Ok(stride_a), Ok(stride_x), Ok(stride_y)) = (
            u32::try_from(stride_a),
            u32::try_from(stride_x),
            u32::try_from(stride_y),
        ) else {
            return KernelStatus::InvalidValue;
        };
        if n == 0 || batch_count == 0 {
            return KernelStatus::Success;
        }

        let batches = batch_count as usize;
        let logical = n as usize;
        if ap.len < (batches - 1) * stride_a as usize + packed_len(n)
            || x.len < (batches - 1) * stride_x as usize + vector_extent(logical, incx)
            || y.len < (batches - 1) * stride_y as usize + vector_extent(logical, incy)
        {
            return KernelStatus::ExecutionFailed;
        }

        let params = SpmvParams {
            n: n as u32,
            batch_count: batch_count as u32,
            uplo: uplo_flag(uplo),
            incx,
            incy,
            stride_a,
            stride_x,
            stride_y,
            alpha,
            beta,
            _pad0: 0,
            _pad1: 0,
        };
        let params_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("spmv_params"),
                contents: bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("spmv_bind_group"),
            layout: &self.spmv.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ap.raw.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: x.raw.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: y.raw.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        self.dispatch(&self.spmv, &bind_group, params.n * params.batch_count);
        KernelStatus::Success
    }

    fn syr_strided_batched(
        &mut self,
        uplo: FillMode,
        n: i32,
        alpha: f32,
        x: &Self::Buffer,
        incx: i32,
        stride_x: i64,
        a: &mut Self::Buffer,
        lda: i32,
        stride_a: i64,
        batch_count: i32,
    ) -> KernelStatus {
        if n < 0 || incx == 0 || lda < n.max(1) || batch_count < 0 {
            return KernelStatus::InvalidValue;
        }
        let (Ok(stride_x), Ok(stride_a)) = (u32::try_from(stride_x), u32::try_from(stride_a))
        else {
            return KernelStatus::InvalidValue;
        };
        if n == 0 || batch_count == 0 {
            return KernelStatus::Success;
        }

        let batches = batch_count as usize;
        let logical = n as usize;
        if x.len < (batches - 1) * stride_x as usize + vector_extent(logical, incx)
            || a.len < (batches - 1) * stride_a as usize + matrix_extent(logical, logical, lda as usize)
        {
            return KernelStatus::ExecutionFailed;
        }

        let params = SyrParams {
            n: n as u32,
            lda: lda as u32,
            batch_count: batch_count as u32,
            uplo: uplo_flag(uplo),
            incx,
            stride_x,
            stride_a,
            alpha,
        };
        let params_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("syr_params"),
                contents: bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("syr_bind_group"),
            layout: &self.syr.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: x.raw.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: a.raw.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        self.dispatch(&self.syr, &bind_group, params.n * params.batch_count);
        KernelStatus::Success
    }
}
