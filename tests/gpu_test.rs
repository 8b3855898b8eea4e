//! Device-backed tests for the GPU pipeline. These need `--features gpu` and
//! an adapter; machines without one skip gracefully.
#![cfg(feature = "gpu")]

use neptune::{Dimension, Neptune, NeptuneError};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

async fn try_neptune() -> Option<Neptune> {
    match Neptune::new(FORMAT, (800, 600), (64, 64)).await {
        Ok(neptune) => Some(neptune),
        Err(NeptuneError::NoAdapter) => {
            eprintln!("no GPU adapter available, skipping");
            None
        }
        Err(err) => panic!("device setup failed: {err}"),
    }
}

#[tokio::test]
async fn test_uninitialized_orchestrator_rejects_work() {
    let Some(mut neptune) = try_neptune().await else {
        return;
    };
    assert!(!neptune.is_ready());
    assert!(
        matches!(neptune.step(1.0 / 60.0), Err(NeptuneError::NotReady)),
        "stepping before set_dimension must fail"
    );
}

#[tokio::test]
async fn test_three_dimensional_mode_is_unsupported() {
    let Some(mut neptune) = try_neptune().await else {
        return;
    };
    let result = neptune.set_dimension(Dimension::Three);
    assert!(
        matches!(result, Err(NeptuneError::UnsupportedDimension(3))),
        "3D must be rejected"
    );
    assert!(!neptune.is_ready(), "a rejected dimension leaves no pipeline");
}

#[tokio::test]
async fn test_pipeline_steps_and_renders() {
    let Some(mut neptune) = try_neptune().await else {
        return;
    };
    neptune.set_dimension(Dimension::Two).expect("2D setup");
    assert!(neptune.is_ready());

    // A pointer stroke followed by a few frames must run clean.
    neptune.mouse_down();
    neptune.mouse_moved(0.4, 0.5);
    neptune.mouse_moved(0.6, 0.5);
    for _ in 0..5 {
        neptune.step(1.0 / 60.0).expect("step");
    }
    neptune.mouse_up();
    neptune.step(1.0 / 60.0).expect("idle step");
}

#[tokio::test]
async fn test_release_returns_all_buffers() {
    let Some(mut neptune) = try_neptune().await else {
        return;
    };
    let baseline = neptune.context().live_buffer_count();

    neptune.set_dimension(Dimension::Two).expect("2D setup");
    assert!(
        neptune.context().live_buffer_count() > baseline,
        "a live pipeline owns device buffers"
    );

    neptune.release();
    assert_eq!(
        neptune.context().live_buffer_count(),
        baseline,
        "release must return every buffer"
    );
    assert!(matches!(
        neptune.step(1.0 / 60.0),
        Err(NeptuneError::NotReady)
    ));
}

#[tokio::test]
async fn test_dimension_switch_rebuilds_cleanly() {
    let Some(mut neptune) = try_neptune().await else {
        return;
    };
    let baseline = neptune.context().live_buffer_count();

    neptune.set_dimension(Dimension::Two).expect("first setup");
    let with_pipeline = neptune.context().live_buffer_count();

    // Re-selecting 2D tears the old pipeline down before building anew.
    neptune.set_dimension(Dimension::Two).expect("second setup");
    assert_eq!(
        neptune.context().live_buffer_count(),
        with_pipeline,
        "rebuilding must not leak buffers"
    );

    neptune.release();
    assert_eq!(neptune.context().live_buffer_count(), baseline);
}
