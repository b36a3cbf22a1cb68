//! Cockpit demo application
//!
//! Drives a headless cockpit panel through a short session: binds a
//! sample agent snapshot, runs the frame loop, hovers and selects a
//! memory node through the pick pipeline, and prints the detail overlay.

use holodeck_engine::prelude::*;

/// Sample agent state standing in for a live producer feed
fn sample_snapshot() -> StateSnapshot {
    StateSnapshot {
        nodes: vec![
            GraphNode {
                id: "E1".to_string(),
                kind: NodeKind::Episodic,
                position: Vec3::new(0.0, 0.5, 0.0),
                label: "first boot".to_string(),
            },
            GraphNode {
                id: "S1".to_string(),
                kind: NodeKind::Semantic,
                position: Vec3::new(2.0, 0.0, -1.0),
                label: "operator prefers brevity".to_string(),
            },
            GraphNode {
                id: "P1".to_string(),
                kind: NodeKind::Procedural,
                position: Vec3::new(-2.0, -0.5, 1.0),
                label: "deploy checklist".to_string(),
            },
        ],
        links: vec![GraphLink::new("E1", "S1"), GraphLink::new("S1", "P1")],
        emotion: Some(EmotionState {
            stress: 0.2,
            focus: 0.8,
            curiosity: 0.6,
        }),
        events: vec![
            TimelineEvent {
                time: 800,
                kind: EventKind::Task,
                label: "fetch inbox".to_string(),
                status: EventStatus::Success,
            },
            TimelineEvent {
                time: 930,
                kind: EventKind::Reflection,
                label: "review plan".to_string(),
                status: EventStatus::Failure,
            },
            TimelineEvent {
                time: 1100,
                kind: EventKind::Projection,
                label: "draft reply".to_string(),
                status: EventStatus::Pending,
            },
        ],
        plugins: vec![
            PluginCard {
                id: "search".to_string(),
                name: "Web Search".to_string(),
                status: PluginStatus::Active,
                permissions: vec!["net".to_string()],
                last_used: Some("2 min ago".to_string()),
            },
            PluginCard {
                id: "calendar".to_string(),
                name: "Calendar".to_string(),
                status: PluginStatus::Idle,
                permissions: vec!["calendar.read".to_string()],
                last_used: None,
            },
        ],
    }
}

fn main() {
    env_logger::init();
    log::info!("Starting cockpit demo...");

    let config = PanelConfig {
        name: "memory-graph".to_string(),
        camera: CameraConfig::default(),
    };
    let mut panel = Panel::mount(
        Box::new(HeadlessSurface::new()),
        sample_snapshot(),
        config,
    );

    let dt = 1.0 / 60.0;

    // Let the scene settle for a second of simulated time.
    for _ in 0..60 {
        panel.frame(dt);
    }

    // Aim the pointer at node S1 through the live camera, then click.
    let node_position = Vec3::new(2.0, 0.0, -1.0);
    if let Some(camera) = panel.camera() {
        if let Some((ndc_x, ndc_y)) = camera.world_to_ndc(node_position) {
            panel.pointer_moved(ndc_x, ndc_y);
            panel.frame(dt);
            log::info!("hovering: {:?}", panel.hovered_id());

            panel.pointer_clicked();
            panel.frame(dt);
        }
    }

    match panel.overlay() {
        Some(overlay) => {
            println!("selected: {} ({})", overlay.title, overlay.kind);
            for line in &overlay.lines {
                println!("  {line}");
            }
        }
        None => println!("nothing selected"),
    }

    // A later producer push flows through the queue on the next frame.
    panel.update(sample_snapshot());
    for _ in 0..60 {
        panel.frame(dt);
    }

    for warning in panel.drain_warnings() {
        log::warn!("panel warning: {warning}");
    }

    panel.close_overlay();
    panel.dispose();
    log::info!("Cockpit demo finished");
}
