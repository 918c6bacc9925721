use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::math::primitives::Sphere;
use bevy::prelude::*;

use crate::configuration::config::PlaybackConfig;
use crate::playback::driver::Playback;
use crate::playback::error::{PlaybackError, PlaybackResult};
use crate::playback::scene::{Bounds, PointStyle};
use crate::playback::snapshot::NVec3;
use crate::visualization::camera::FixedCamera;

/// Component tagging each sphere with its particle index in the current cloud
#[derive(Component)]
struct ParticleMarker(pub usize);

/// Shortest timer period, a zero interval would fire on every tick
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Everything the viewer needs besides the playback itself
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    pub interval: Duration, // advisory delay between frame advances
    pub bounds: Bounds,
    pub style: PointStyle,
    pub camera: FixedCamera,
}

impl ViewerSettings {
    pub fn from_config(cfg: &PlaybackConfig) -> Self {
        Self {
            interval: Duration::from_millis(cfg.playback.interframe_interval_ms).max(MIN_INTERVAL),
            bounds: Bounds::new(cfg.scene.axis_bounds),
            style: PointStyle::from(&cfg.scene),
            camera: FixedCamera::orbit(
                cfg.scene.axis_bounds,
                cfg.scene.elevation_deg,
                cfg.scene.azimuth_deg,
            ),
        }
    }
}

/// What one timer tick did to the playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Waiting,                             // period not over yet
    Rendered { step: usize, last: bool }, // exactly one step drawn
    Idle,                                // sequence over, last frame stays up
    Failed,                              // this tick hit a load/shape error
    Halted,                              // an earlier tick failed, nothing advances
}

/// Owns the playback while the window is open and turns timer periods into
/// frame advances, at most one per tick
#[derive(Resource)]
pub struct PlaybackTicker {
    playback: Option<Playback>,     // taken when handed back on exit
    timer: Timer,
    failure: Option<PlaybackError>, // first load/shape error, ends the app
}

impl PlaybackTicker {
    pub fn new(playback: Playback, interval: Duration) -> Self {
        Self {
            playback: Some(playback),
            timer: Timer::new(interval.max(MIN_INTERVAL), TimerMode::Repeating),
            failure: None,
        }
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    pub fn failure(&self) -> Option<&PlaybackError> {
        self.failure.as_ref()
    }

    /// Advance the timer by `delta`; render one step if a period elapsed
    pub fn tick(&mut self, delta: Duration) -> TickOutcome {
        if !self.timer.tick(delta).just_finished() {
            return TickOutcome::Waiting;
        }
        self.step()
    }

    /// Render the next step unless the playback is over or already failed
    pub fn step(&mut self) -> TickOutcome {
        if self.failure.is_some() {
            return TickOutcome::Halted;
        }
        let Some(playback) = self.playback.as_mut() else {
            return TickOutcome::Halted;
        };
        if playback.is_finished() {
            return TickOutcome::Idle;
        }

        match playback.advance() {
            Ok(Some(step)) => TickOutcome::Rendered {
                step,
                last: playback.is_finished(),
            },
            Ok(None) => TickOutcome::Idle,
            Err(e) => {
                self.failure = Some(e);
                TickOutcome::Failed
            }
        }
    }

    /// Give the playback back to the caller, or the error that stopped it.
    /// `None` if it was already handed back.
    pub fn hand_back(&mut self) -> Option<PlaybackResult<Playback>> {
        let playback = self.playback.take()?;
        Some(match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(playback),
        })
    }
}

#[derive(Resource, Clone)]
struct ViewerLayout {
    settings: ViewerSettings,
}

#[derive(Resource)]
struct MarkerAssets {
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
}

#[derive(Resource)]
struct Handback(Sender<PlaybackResult<Playback>>);

/// Show the playback in a window, advancing one step per timer period.
/// Blocks until the window is closed, then hands the playback back so the
/// caller can export it.
pub fn present(playback: Playback, settings: &ViewerSettings) -> PlaybackResult<Playback> {
    log::info!(
        "viewer: playing {} steps, one every {:?}",
        playback.num_steps(),
        settings.interval
    );

    let (tx, rx) = mpsc::channel();

    let exit = App::new()
        .add_plugins(
            DefaultPlugins
                .build()
                // env_logger already owns the global logger
                .disable::<LogPlugin>()
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "N-body playback".into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(ClearColor(srgb(settings.style.background)))
        .insert_resource(ViewerLayout {
            settings: settings.clone(),
        })
        .insert_resource(PlaybackTicker::new(playback, settings.interval))
        .insert_resource(Handback(tx))
        .add_systems(Startup, setup_viewer)
        .add_systems(Update, ((advance_frame, sync_markers).chain(), draw_bounds))
        .add_systems(Last, hand_back_on_exit)
        .run();

    let playback = rx.try_recv().map_err(|_| {
        PlaybackError::Viewer(format!("viewer exited ({exit:?}) without returning the playback"))
    })??;

    if !playback.is_finished() {
        log::warn!(
            "viewer closed after {} of {} steps",
            playback.frames().len(),
            playback.num_steps()
        );
    }

    Ok(playback)
}

/// Startup system: camera at the fixed eye and the shared marker mesh/material
fn setup_viewer(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    layout: Res<ViewerLayout>,
) {
    let settings = &layout.settings;
    let cam = &settings.camera;

    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(srgb(settings.style.background)),
            ..default()
        },
        projection: Projection::Perspective(PerspectiveProjection {
            fov: cam.fovy as f32,
            near: cam.znear as f32,
            far: cam.zfar as f32,
            ..default()
        }),
        transform: Transform::from_translation(to_vec3(&cam.eye.coords))
            .looking_at(to_vec3(&cam.target.coords), Vec3::Z),
        ..default()
    });

    // every marker shares one mesh and one unlit material
    commands.insert_resource(MarkerAssets {
        mesh: meshes.add(Sphere::new(settings.style.marker_size as f32).mesh()),
        material: materials.add(StandardMaterial {
            base_color: srgb(settings.style.marker_color),
            unlit: true,
            ..default()
        }),
    });
}

/// Advance the playback by exactly one step when the timer period elapses
fn advance_frame(
    time: Res<Time>,
    mut ticker: ResMut<PlaybackTicker>,
    mut exit: EventWriter<AppExit>,
) {
    match ticker.tick(time.delta()) {
        TickOutcome::Rendered { step, last: true } => {
            log::info!("viewer: last step {step} shown, close the window to export");
        }
        TickOutcome::Failed => {
            if let Some(e) = ticker.failure() {
                log::error!("viewer: playback aborted: {e}");
            }
            exit.send(AppExit::error());
        }
        _ => {}
    }
}

/// Mirror the scene's current points onto marker entities. Markers are
/// respawned whenever the count changes (first frame, clear), otherwise moved.
fn sync_markers(
    mut commands: Commands,
    ticker: Res<PlaybackTicker>,
    assets: Option<Res<MarkerAssets>>,
    mut shown_revision: Local<Option<u64>>,
    mut markers: Query<(Entity, &ParticleMarker, &mut Transform, &mut Visibility)>,
) {
    let (Some(playback), Some(assets)) = (ticker.playback.as_ref(), assets) else {
        return;
    };
    let scene = playback.scene();
    if *shown_revision == Some(scene.revision()) {
        return;
    }
    *shown_revision = Some(scene.revision());

    let bounds = scene.bounds();
    let positions: Vec<NVec3> = scene.current_points().points().collect();

    if markers.iter().count() != positions.len() {
        for (entity, ..) in &markers {
            commands.entity(entity).despawn();
        }
        for (i, p) in positions.iter().enumerate() {
            commands.spawn((
                PbrBundle {
                    mesh: assets.mesh.clone(),
                    material: assets.material.clone(),
                    transform: Transform::from_translation(to_vec3(p)),
                    visibility: clip(&bounds, p),
                    ..default()
                },
                ParticleMarker(i),
            ));
        }
        return;
    }

    for (_, ParticleMarker(i), mut transform, mut visibility) in &mut markers {
        if let Some(p) = positions.get(*i) {
            transform.translation = to_vec3(p);
            *visibility = clip(&bounds, p);
        }
    }
}

/// Bounds cube plus the three coordinate axes
fn draw_bounds(mut gizmos: Gizmos, layout: Res<ViewerLayout>) {
    let h = layout.settings.bounds.half_extent as f32;

    gizmos.cuboid(
        Transform::from_scale(Vec3::splat(2.0 * h)),
        Color::srgb(0.3, 0.3, 0.3),
    );

    gizmos.line(Vec3::new(-h, 0.0, 0.0), Vec3::new(h, 0.0, 0.0), Color::srgb(1.0, 0.0, 0.0)); // x
    gizmos.line(Vec3::new(0.0, -h, 0.0), Vec3::new(0.0, h, 0.0), Color::srgb(0.0, 1.0, 0.0)); // y
    gizmos.line(Vec3::new(0.0, 0.0, -h), Vec3::new(0.0, 0.0, h), Color::srgb(0.0, 0.0, 1.0)); // z
}

/// Runs last in the frame the app decides to exit, for any reason
fn hand_back_on_exit(
    mut exits: EventReader<AppExit>,
    mut ticker: ResMut<PlaybackTicker>,
    handback: Res<Handback>,
) {
    if exits.read().next().is_none() {
        return;
    }
    let Some(outcome) = ticker.hand_back() else {
        return;
    };
    if handback.0.send(outcome).is_err() {
        log::warn!("viewer: nobody is waiting for the playback");
    }
}

fn clip(bounds: &Bounds, p: &NVec3) -> Visibility {
    if bounds.contains(p) {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

fn to_vec3(p: &NVec3) -> Vec3 {
    Vec3::new(p.x as f32, p.y as f32, p.z as f32)
}

fn srgb(c: [u8; 3]) -> Color {
    Color::srgb_u8(c[0], c[1], c[2])
}
