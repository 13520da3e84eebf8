//! CLI runner for the kernel probes.
//!
//! Each probe owns its device session for exactly one invocation; the
//! software device is the default, `--backend=wgpu` dispatches the real
//! compute kernels (f32 only).

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use probe_core::{OperationArguments, ProbeError, Real};
use probe_device::{DeviceKernels, SoftwareDevice, WgpuDevice};
use probe_lab::{drivers, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    SetGetMatrix,
    SpmvStridedBatched,
    SyrStridedBatched,
}

impl Operation {
    const ALL: [Operation; 3] = [
        Operation::SetGetMatrix,
        Operation::SpmvStridedBatched,
        Operation::SyrStridedBatched,
    ];

    fn label(self) -> &'static str {
        match self {
            Operation::SetGetMatrix => "set_get_matrix",
            Operation::SpmvStridedBatched => "spmv_strided_batched",
            Operation::SyrStridedBatched => "syr_strided_batched",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.label() == value)
            .with_context(|| format!("unknown operation '{value}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Software,
    Wgpu,
}

impl Backend {
    fn label(self) -> &'static str {
        match self {
            Backend::Software => "software",
            Backend::Wgpu => "wgpu",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    F32,
    F64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    Unit,
    Norm,
}

struct CliOptions {
    backend: Backend,
    precision: Precision,
    op: Option<Operation>,
    cases_json: Option<PathBuf>,
    n: i32,
    batch_count: i32,
    stride_scale: f64,
    check: Option<Check>,
}

#[derive(Debug, Deserialize)]
struct CaseSpec {
    op: String,
    #[serde(flatten)]
    args: OperationArguments,
}

fn main() -> Result<()> {
    tracer::init_tracing();
    let options = parse_options()?;

    let cases = if let Some(ref path) = options.cases_json {
        load_cases(path)?
    } else {
        build_default_cases(&options)
    };
    if cases.is_empty() {
        bail!("no probe cases to run");
    }

    let precision_label = match options.precision {
        Precision::F32 => "f32",
        Precision::F64 => "f64",
    };

    let mut failures = 0usize;
    for (op, args) in &cases {
        let verdict = run_case(&options, *op, args)
            .with_context(|| format!("probe {} could not run", op.label()))?;
        println!(
            "{:<22} [{} {}] {}",
            op.label(),
            options.backend.label(),
            precision_label,
            verdict
        );
        if !verdict.passed() {
            failures += 1;
        }
    }

    println!("{} probe(s), {} failed", cases.len(), failures);
    if failures > 0 {
        bail!("{failures} probe(s) failed");
    }
    Ok(())
}

fn parse_options() -> Result<CliOptions> {
    let mut opts = CliOptions {
        backend: Backend::Software,
        precision: Precision::F32,
        op: None,
        cases_json: None,
        n: 32,
        batch_count: 3,
        stride_scale: 1.0,
        check: None,
    };

    for arg in env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--backend=") {
            opts.backend = match value {
                "software" => Backend::Software,
                "wgpu" => Backend::Wgpu,
                other => bail!("unknown backend '{other}'"),
            };
        } else if let Some(value) = arg.strip_prefix("--precision=") {
            opts.precision = match value {
                "f32" => Precision::F32,
                "f64" => Precision::F64,
                other => bail!("unknown precision '{other}'"),
            };
        } else if let Some(value) = arg.strip_prefix("--op=") {
            opts.op = Some(Operation::parse(value)?);
        } else if let Some(value) = arg.strip_prefix("--n=") {
            opts.n = value.parse().context("invalid --n value")?;
        } else if let Some(value) = arg.strip_prefix("--batch-count=") {
            opts.batch_count = value.parse().context("invalid --batch-count value")?;
        } else if let Some(value) = arg.strip_prefix("--stride-scale=") {
            opts.stride_scale = value.parse().context("invalid --stride-scale value")?;
        } else if let Some(value) = arg.strip_prefix("--check=") {
            opts.check = Some(match value {
                "unit" => Check::Unit,
                "norm" => Check::Norm,
                other => bail!("unknown check mode '{other}'"),
            });
        } else if let Some(value) = arg.strip_prefix("--cases-json=") {
            opts.cases_json = Some(PathBuf::from(value));
        } else {
            bail!("unrecognized argument: {arg}");
        }
    }

    Ok(opts)
}

fn load_cases(path: &Path) -> Result<Vec<(Operation, OperationArguments)>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read cases JSON {}", path.display()))?;
    let specs: Vec<CaseSpec> =
        serde_json::from_str(&text).context("failed to parse cases JSON")?;
    specs
        .into_iter()
        .map(|spec| Ok((Operation::parse(&spec.op)?, spec.args)))
        .collect()
}

fn build_default_cases(options: &CliOptions) -> Vec<(Operation, OperationArguments)> {
    // the real compute device accumulates in f32, so its default check is
    // the aggregate norm; the software device is held to the unit check
    let check = options.check.unwrap_or(match options.backend {
        Backend::Software => Check::Unit,
        Backend::Wgpu => Check::Norm,
    });
    let (unit_check, norm_check) = match check {
        Check::Unit => (true, false),
        Check::Norm => (false, true),
    };
    let n = options.n;

    let base = OperationArguments {
        rows: n,
        cols: n,
        m: n,
        n,
        lda: n,
        ldb: n,
        ldc: n,
        batch_count: options.batch_count,
        stride_scale: options.stride_scale,
        unit_check,
        norm_check,
        ..Default::default()
    };

    let mut cases = Vec::new();
    for op in Operation::ALL {
        if options.op.is_some_and(|selected| selected != op) {
            continue;
        }
        match op {
            Operation::SetGetMatrix => {
                // distinct leading dimensions on all three sides
                cases.push((
                    op,
                    OperationArguments {
                        lda: n + 1,
                        ldb: n + 2,
                        ldc: n + 3,
                        ..base.clone()
                    },
                ));
            }
            Operation::SpmvStridedBatched => {
                cases.push((op, base.clone()));
                cases.push((
                    op,
                    OperationArguments {
                        incx: 2,
                        incy: -1,
                        stride_scale: options.stride_scale.max(1.5),
                        uplo: 'L',
                        ..base.clone()
                    },
                ));
            }
            Operation::SyrStridedBatched => {
                cases.push((op, base.clone()));
                cases.push((
                    op,
                    OperationArguments {
                        lda: n + 3,
                        incx: 2,
                        stride_scale: options.stride_scale.max(2.0),
                        alpha: -0.5,
                        ..base.clone()
                    },
                ));
            }
        }
    }
    cases
}

fn run_case(
    options: &CliOptions,
    op: Operation,
    args: &OperationArguments,
) -> Result<Verdict> {
    match (options.backend, options.precision) {
        (Backend::Software, Precision::F32) => {
            let mut device = SoftwareDevice::new();
            Ok(dispatch::<f32, _>(&mut device, op, args)?)
        }
        (Backend::Software, Precision::F64) => {
            let mut device = SoftwareDevice::new();
            Ok(dispatch::<f64, _>(&mut device, op, args)?)
        }
        (Backend::Wgpu, Precision::F32) => {
            // one device session per probe invocation
            let mut device = WgpuDevice::new().context("failed to create wgpu device")?;
            Ok(dispatch::<f32, _>(&mut device, op, args)?)
        }
        (Backend::Wgpu, Precision::F64) => {
            bail!("the wgpu device supports f32 only; use --backend=software for f64")
        }
    }
}

fn dispatch<T: Real, B: DeviceKernels<T>>(
    backend: &mut B,
    op: Operation,
    args: &OperationArguments,
) -> Result<Verdict, ProbeError> {
    match op {
        Operation::SetGetMatrix => drivers::set_get_matrix::run(backend, args),
        Operation::SpmvStridedBatched => drivers::spmv_strided_batched::run(backend, args),
        Operation::SyrStridedBatched => drivers::syr_strided_batched::run(backend, args),
    }
}

mod tracer {
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt().try_init();
    }
}
