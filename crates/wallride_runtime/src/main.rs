//! Wallride Runtime
//!
//! Spawns a player in a small test arena and drives it with a scripted
//! input sequence, logging every state change, jump and shot.
//!
//! Run with: cargo run -p wallride_runtime -- [config.toml]
//!       or: RUST_LOG=debug cargo run --bin wallride

mod arena;
mod boot_config;
mod script;

use boot_config::{BootConfig, BootError};
use script::InputScript;
use wallride_controller::{CameraRig, ControllerEvent, SessionBuilder};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), BootError> {
    let config = BootConfig::load()?;
    config.print_summary();

    let mut builder = SessionBuilder::new(config.controller.clone())?;
    let spawn_points = arena::build(builder.world_mut());
    for spawn in spawn_points {
        builder = builder.with_spawn_point(spawn);
    }
    let mut session = builder
        .with_camera(CameraRig::new(config.controller.camera.clone()))
        .spawn()?;

    let sender = session.input_sender();
    let mut script = InputScript::demo();
    let mut substeps = 0u32;
    let mut shots = 0usize;
    let mut impacts = 0usize;

    for frame in 0..config.run.frames {
        script.feed(frame, &sender);
        substeps += session.tick(config.run.frame_time)?;

        for event in session.drain_events() {
            match event {
                ControllerEvent::StateChanged { from, to } => {
                    log::info!("[frame {}] {} -> {}", frame, from, to);
                }
                ControllerEvent::Jumped => log::info!("[frame {}] jump", frame),
                ControllerEvent::DoubleJumped => log::info!("[frame {}] double jump", frame),
                ControllerEvent::WallJump { normal } => {
                    log::info!("[frame {}] wall jump along {:?}", frame, normal);
                }
                ControllerEvent::Fired(report) => {
                    shots += 1;
                    log::info!(
                        "[frame {}] shot {:?}: hit distance {:?}, display scale {:?}",
                        frame,
                        report.resolving,
                        report.hit_distance,
                        report.display_speed_scale
                    );
                }
                ControllerEvent::Impact(impact) => {
                    impacts += 1;
                    log::info!(
                        "[frame {}] {:?} hit {:?} at {:?}",
                        frame,
                        impact.projectile,
                        impact.object,
                        impact.point
                    );
                }
            }
        }
    }

    let snapshot = session.snapshot()?;
    log::info!(
        "Finished after {} frames / {} substeps: state {}, position {:?}, {} shots, {} impacts{}",
        config.run.frames,
        substeps,
        snapshot.state,
        snapshot.position,
        shots,
        impacts,
        if script.finished() { "" } else { " (script cut short)" }
    );
    log::debug!("Camera at {:?}, mesh at {:?}", session.camera().position(), session.mesh_pose().position);

    Ok(())
}
