//! Device-path tests. Each test skips when the machine has no usable adapter.

use nbody_physics::{compute_forces, integrate, seed, BodySoa};
use nbody_simulation::{
    ExecutionMode, GpuNBody, KernelSource, SimParams, Simulation, SimulationError,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `None` when no adapter or device is available
fn gpu_or_skip(body_count: usize, kernel: &KernelSource) -> Option<Result<GpuNBody, SimulationError>> {
    init_logging();
    match GpuNBody::setup_blocking(body_count, kernel) {
        Err(err @ (SimulationError::NoAdapter(_) | SimulationError::RequestDevice(_))) => {
            eprintln!("skipping GPU test: {err}");
            None
        }
        other => Some(other),
    }
}

fn seeded(n: usize, params: &SimParams) -> BodySoa {
    let mut store = BodySoa::new(n);
    seed(
        &mut store,
        params.domain_width,
        params.domain_height,
        params.center_mass,
    );
    store
}

fn host_step(store: &mut BodySoa, params: &SimParams) {
    compute_forces(store, params.gravity, params.softening);
    integrate(store, params.dt, params.domain_width, params.domain_height);
}

fn assert_close(name: &str, gpu: &[f32], cpu: &[f32]) {
    assert_eq!(gpu.len(), cpu.len());
    for (i, (g, c)) in gpu.iter().zip(cpu).enumerate() {
        let tolerance = 1e-3 + 1e-4 * c.abs();
        assert!(
            (g - c).abs() <= tolerance,
            "{name}[{i}]: gpu {g} vs cpu {c}"
        );
    }
}

fn assert_parity(n: usize, steps: usize) {
    let params = SimParams::default();
    let Some(gpu) = gpu_or_skip(n, &KernelSource::Embedded) else {
        return;
    };
    let mut gpu = gpu.expect("GPU setup failed");

    let mut on_device = seeded(n, &params);
    let mut on_host = on_device.clone();

    for _ in 0..steps {
        gpu.step(&mut on_device, &params).expect("GPU step failed");
        host_step(&mut on_host, &params);
    }

    assert_close("x", &on_device.x, &on_host.x);
    assert_close("y", &on_device.y, &on_host.y);
    assert_close("vx", &on_device.vx, &on_host.vx);
    assert_close("vy", &on_device.vy, &on_host.vy);
    assert_close("ax", &on_device.ax, &on_host.ax);
    assert_close("ay", &on_device.ay, &on_host.ay);
    assert_eq!(on_device.m, on_host.m);
}

#[test]
fn ten_bodies_match_the_host_path() {
    assert_parity(10, 10);
}

#[test]
fn partial_workgroups_match_the_host_path() {
    // 300 lanes = one full workgroup plus a partial one
    assert_parity(300, 3);
}

#[test]
fn empty_store_steps_without_dispatch() {
    let Some(gpu) = gpu_or_skip(0, &KernelSource::Embedded) else {
        return;
    };
    let mut gpu = gpu.expect("GPU setup failed");
    let mut store = BodySoa::new(0);

    gpu.step(&mut store, &SimParams::default()).unwrap();
    assert!(store.is_empty());
}

#[test]
fn broken_kernel_reports_a_build_log() {
    let kernel = KernelSource::Inline("@compute @workgroup_size(64) fn compute_forces( {".to_string());
    let Some(result) = gpu_or_skip(4, &kernel) else {
        return;
    };

    match result {
        Err(SimulationError::KernelBuild { log }) => assert!(!log.is_empty()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("malformed kernel built successfully"),
    }
}

#[test]
fn kernel_without_entry_points_fails_to_build() {
    let kernel = KernelSource::Inline("fn helper() -> f32 { return 1.0; }".to_string());
    let Some(result) = gpu_or_skip(4, &kernel) else {
        return;
    };

    assert!(matches!(result, Err(SimulationError::KernelBuild { .. })));
}

#[test]
fn engine_with_gpu_runs_in_parallel_mode() {
    let params = SimParams::default();
    let Some(gpu) = gpu_or_skip(10, &KernelSource::Embedded) else {
        return;
    };
    let gpu = gpu.expect("GPU setup failed");

    let mut sim = match Simulation::with_gpu(seeded(10, &params), params, gpu) {
        Ok(sim) => sim,
        Err(err) => panic!("engine rejected a matching orchestrator: {err}"),
    };
    assert_eq!(sim.mode(), ExecutionMode::Parallel);

    let before = sim.bodies().clone();
    sim.step().unwrap();
    assert_ne!(sim.bodies().x, before.x);
    assert_eq!(sim.frame(), 1);
}

#[test]
fn engine_rejects_a_mismatched_orchestrator() {
    let params = SimParams::default();
    let Some(gpu) = gpu_or_skip(8, &KernelSource::Embedded) else {
        return;
    };
    let gpu = gpu.expect("GPU setup failed");

    match Simulation::with_gpu(seeded(4, &params), params, gpu) {
        Err(SimulationError::BodyCountMismatch { store, device }) => {
            assert_eq!(store, 4);
            assert_eq!(device, 8);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("mismatched orchestrator was accepted"),
    }
}

/// A device whose limits are the adapter's, adjusted by `adjust`
fn device_with_limits(
    adjust: impl FnOnce(&mut wgpu::Limits),
) -> Option<(wgpu::Device, wgpu::Queue)> {
    init_logging();
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
        {
            Ok(adapter) => adapter,
            Err(err) => {
                eprintln!("skipping GPU test: {err}");
                return None;
            }
        };

        let mut limits = adapter.limits();
        adjust(&mut limits);

        match adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Reduced Limits Device"),
                required_limits: limits,
                ..Default::default()
            })
            .await
        {
            Ok(pair) => Some(pair),
            Err(err) => {
                eprintln!("skipping GPU test: {err}");
                None
            }
        }
    })
}

#[test]
fn body_arrays_over_the_binding_limit_are_rejected() {
    let Some((device, queue)) =
        device_with_limits(|limits| limits.max_storage_buffer_binding_size = 64)
    else {
        return;
    };

    match pollster::block_on(GpuNBody::new(device, queue, 100, &KernelSource::Embedded)) {
        Err(SimulationError::BufferTooLarge {
            buffer,
            size,
            limit,
        }) => {
            assert_eq!(buffer, "Position X Buffer");
            assert_eq!(size, 400);
            assert_eq!(limit, 64);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("oversized body arrays were accepted"),
    }
}

#[test]
fn staging_buffer_over_the_buffer_limit_is_rejected() {
    // Each body array fits, the six-array staging copy does not
    let Some((device, queue)) = device_with_limits(|limits| {
        limits.max_storage_buffer_binding_size = 400;
        limits.max_buffer_size = 2000;
    }) else {
        return;
    };

    match pollster::block_on(GpuNBody::new(device, queue, 100, &KernelSource::Embedded)) {
        Err(SimulationError::BufferTooLarge {
            buffer,
            size,
            limit,
        }) => {
            assert_eq!(buffer, "Readback Staging Buffer");
            assert_eq!(size, 2400);
            assert_eq!(limit, 2000);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("oversized staging buffer was accepted"),
    }
}
