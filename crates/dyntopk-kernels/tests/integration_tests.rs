//! Integration tests for dyntopk-kernels with dyntopk-core
//!
//! These tests drive the operator through the host-facing sequence
//! (setup, reshape, forward) on `DenseND` tensors.

use dyntopk_core::DenseND;
use dyntopk_kernels::{
    arg_top_k, select_top_k, ArgTopKConfig, ArgTopKLayer, Grouping, KernelError,
    PreconditionPolicy, MIN_DYNAMIC_K,
};

#[test]
fn test_detection_scores_resolve_to_floor() {
    // [2,1,1,4] scores, three objects beat the no-object score
    let scores = DenseND::<f64>::from_vec(
        vec![0.9, 0.8, 0.1, 0.7, 0.3, 0.2, 0.6, 0.5],
        &[2, 1, 1, 4],
    )
    .unwrap();
    let noobject = DenseND::from_vec(vec![0.2, 0.3, 0.4, 0.5], &[1, 1, 1, 4]).unwrap();

    let layer = ArgTopKLayer::setup(ArgTopKConfig::default().with_axis(3), scores.shape()).unwrap();
    let mut top = DenseND::zeros(&[1]);
    let resolution = layer.reshape(&scores, &noobject, &mut top).unwrap();

    assert_eq!(resolution.object_count, 3);
    assert_eq!(resolution.effective_k, MIN_DYNAMIC_K);
    assert_eq!(top.shape(), &[2, 1, 1, 1000]);
}

#[test]
fn test_flatten_values_and_indices() {
    let scores = DenseND::<f64>::from_vec(vec![0.1, 0.9, 0.3, 0.7, 0.5], &[1, 5]).unwrap();
    let mut out = vec![0.0; 6];

    select_top_k(
        scores.as_slice().unwrap(),
        scores.shape(),
        Grouping::Flatten,
        true,
        3,
        &mut out,
    )
    .unwrap();

    assert_eq!(&out[..3], &[1.0, 3.0, 4.0]);
    assert_eq!(&out[3..], &[0.9, 0.7, 0.5]);
}

#[test]
fn test_axis_indices_only() {
    let scores = DenseND::<f32>::from_vec(vec![5.0, 2.0, 9.0, 1.0], &[1, 4]).unwrap();
    let mut out = vec![0.0; 2];

    select_top_k(
        scores.as_slice().unwrap(),
        scores.shape(),
        Grouping::Axis(1),
        false,
        2,
        &mut out,
    )
    .unwrap();

    assert_eq!(out, vec![2.0, 0.0]);
}

#[test]
fn test_setup_rejects_zero_top_k() {
    let err = ArgTopKLayer::setup(ArgTopKConfig::default().with_top_k(0), &[2, 1, 1, 4])
        .unwrap_err();
    assert!(matches!(err, KernelError::Configuration { .. }));
}

#[test]
fn test_setup_rejects_axis_past_last() {
    let shape = [2, 1, 1, 4];
    let axis = shape.len() as isize + 1;
    let err = ArgTopKLayer::setup(ArgTopKConfig::default().with_axis(axis), &shape).unwrap_err();
    assert!(matches!(err, KernelError::Configuration { .. }));
}

#[test]
fn test_large_group_full_pipeline() {
    // 3 instances x 1500 anchors, 1200 positives -> K = 1200 fits the group
    let anchors = 1500;
    let scores: Vec<f64> = (0..3 * anchors)
        .map(|i| ((i * 7919) % 4099) as f64 / 4099.0)
        .collect();
    let scores = DenseND::from_vec(scores, &[3, anchors]).unwrap();
    let noobject: Vec<f64> = (0..anchors)
        .map(|i| if i < 1200 { -1.0 } else { 2.0 })
        .collect();
    let noobject = DenseND::from_vec(noobject, &[1, anchors]).unwrap();

    let top = arg_top_k(
        ArgTopKConfig::default().with_axis(1).with_out_max_val(true),
        &scores,
        &noobject,
    )
    .unwrap();
    assert_eq!(top.shape(), &[3, 1200]);

    let data = top.as_slice().unwrap();
    for row in data.chunks(1200) {
        assert!(row.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn test_reject_and_clamp_at_group_boundary() {
    // group size exactly MIN_DYNAMIC_K: both policies succeed with K == dim
    let dim = MIN_DYNAMIC_K;
    let scores = DenseND::from_vec((0..dim).map(|x| x as f64).collect(), &[1, dim]).unwrap();
    let noobject = DenseND::from_vec(vec![1e9; 4], &[1, 4]).unwrap();

    for policy in [PreconditionPolicy::Reject, PreconditionPolicy::Clamp] {
        let config = ArgTopKConfig::default().with_axis(1).with_precondition(policy);
        let top = arg_top_k(config, &scores, &noobject).unwrap();
        assert_eq!(top.shape(), &[1, dim]);
        assert_eq!(top.as_slice().unwrap()[0], (dim - 1) as f64);
    }

    // one element short: Reject fails, Clamp shrinks K
    let dim = MIN_DYNAMIC_K - 1;
    let scores = DenseND::from_vec((0..dim).map(|x| x as f64).collect(), &[1, dim]).unwrap();

    let reject = ArgTopKConfig::default().with_axis(1);
    let err = arg_top_k(reject, &scores, &noobject).unwrap_err();
    assert_eq!(err, KernelError::precondition_violation(MIN_DYNAMIC_K, dim));

    let clamp = ArgTopKConfig::default()
        .with_axis(1)
        .with_precondition(PreconditionPolicy::Clamp);
    let top = arg_top_k(clamp, &scores, &noobject).unwrap();
    assert_eq!(top.shape(), &[1, dim]);
}

#[test]
fn test_axis_zero_grouping() {
    // group along the batch axis: one group per feature column
    let scores = DenseND::from_vec(vec![1.0, 8.0, 5.0, 2.0, 3.0, 7.0], &[3, 2]).unwrap();
    let mut out = vec![0.0; 4];
    select_top_k(
        scores.as_slice().unwrap(),
        scores.shape(),
        Grouping::Axis(0),
        false,
        2,
        &mut out,
    )
    .unwrap();

    // column 0: [1, 5, 3] -> rows 1, 2; column 1: [8, 2, 7] -> rows 0, 2
    assert_eq!(out, vec![1.0, 0.0, 2.0, 2.0]);
}
