//! End-to-end run of the adaptive top-K operator on synthetic detection scores
//!
//! Run with:
//! ```bash
//! RUST_LOG=dyntopk_kernels=debug cargo run --example detection_topk
//! DYNTOPK_LOG_FORMAT=compact cargo run --example detection_topk
//! ```

use anyhow::Result;
use dyntopk_core::DenseND;
use dyntopk_kernels::{ArgTopKConfig, ArgTopKLayer, PreconditionPolicy};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn init_tracing() -> Result<()> {
    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "dyntopk_kernels=debug,info".to_string());
    let filter = EnvFilter::try_new(filter)?;
    let compact = std::env::var("DYNTOPK_LOG_FORMAT")
        .map(|s| s.eq_ignore_ascii_case("compact"))
        .unwrap_or(false);

    if compact {
        let layer = fmt::layer().compact().with_target(true).with_filter(filter);
        tracing_subscriber::registry().with(layer).init();
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_filter(filter);
        tracing_subscriber::registry().with(layer).init();
    }
    Ok(())
}

/// Deterministic scores in [0, 1)
fn synthetic_scores(len: usize, salt: usize) -> Vec<f32> {
    (0..len)
        .map(|i| ((i * 7919 + salt * 104_729) % 10_007) as f32 / 10_007.0)
        .collect()
}

fn main() -> Result<()> {
    init_tracing()?;

    println!("=== Adaptive top-K over detection scores ===\n");

    // [batch, 1, 1, anchors]
    let batch = 2;
    let anchors = 2_400;
    let scores = DenseND::from_vec(synthetic_scores(batch * anchors, 1), &[batch, 1, 1, anchors])?;
    let noobject = DenseND::from_vec(synthetic_scores(anchors, 2), &[1, 1, 1, anchors])?;

    // 1. Axis mode, values
    let config = ArgTopKConfig::default().with_axis(-1).with_out_max_val(true);
    let layer = ArgTopKLayer::setup(config, scores.shape())?;
    println!("capabilities: {:?}", layer.capabilities());

    let mut top = DenseND::zeros(&[1]);
    let resolution = layer.reshape(&scores, &noobject, &mut top)?;
    layer.forward(&scores, &resolution, &mut top)?;

    println!(
        "objects: {}  dynamic k: {}  output shape: {:?}",
        resolution.object_count,
        resolution.dynamic_k,
        top.shape()
    );
    let values = top
        .as_slice()
        .ok_or_else(|| anyhow::anyhow!("output is not contiguous"))?;
    println!("best five of instance 0: {:?}\n", &values[..5]);

    // 2. Flatten mode, index and value planes
    let config = ArgTopKConfig::default().with_out_max_val(true);
    let layer = ArgTopKLayer::setup(config, scores.shape())?;
    let resolution = layer.reshape(&scores, &noobject, &mut top)?;
    layer.forward(&scores, &resolution, &mut top)?;

    let k = resolution.effective_k;
    let planes = top
        .as_slice()
        .ok_or_else(|| anyhow::anyhow!("output is not contiguous"))?;
    println!("flatten output shape: {:?}", top.shape());
    println!("instance 1 indices: {:?}", &planes[2 * k..2 * k + 5]);
    println!("instance 1 values:  {:?}\n", &planes[3 * k..3 * k + 5]);

    // 3. Small groups: reject vs clamp
    let small = DenseND::from_vec(synthetic_scores(batch * 16, 3), &[batch, 1, 1, 16])?;
    let small_noobject = DenseND::from_vec(synthetic_scores(16, 4), &[1, 1, 1, 16])?;
    let reject = ArgTopKLayer::setup(ArgTopKConfig::default().with_axis(3), small.shape())?;
    let resolution = reject.reshape(&small, &small_noobject, &mut top)?;
    match reject.forward(&small, &resolution, &mut top) {
        Ok(()) => println!("reject: unexpected success"),
        Err(e) => println!("reject: {}", e),
    }

    let clamp = ArgTopKLayer::setup(
        ArgTopKConfig::default()
            .with_axis(3)
            .with_precondition(PreconditionPolicy::Clamp),
        small.shape(),
    )?;
    let resolution = clamp.reshape(&small, &small_noobject, &mut top)?;
    clamp.forward(&small, &resolution, &mut top)?;
    println!(
        "clamp: k {} -> {}, output shape {:?}",
        resolution.dynamic_k,
        resolution.effective_k,
        top.shape()
    );

    clamp.backward(&[true, false]);

    Ok(())
}
