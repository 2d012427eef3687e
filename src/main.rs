//! Marble Dash entry point
//!
//! Native: runs a short headless course and logs what the physics host would
//! receive. Web: exposes the course to the JS host, which owns rendering,
//! rigid-body physics and input capture.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use marble_dash::hud::{Controls, HudSnapshot};
    use marble_dash::sim::{CommandWorld, Course, RunEvent, RunPhase};
    use marble_dash::{BestTimes, GameConfig};

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Course handle driven by the JS frame loop.
    ///
    /// Per frame the host calls `key` for input, `tick` with the shared clock
    /// reading, then applies `drain_commands` to its physics world before
    /// stepping it.
    #[wasm_bindgen]
    pub struct WasmCourse {
        config: GameConfig,
        course: Course,
        world: CommandWorld,
        controls: Controls,
        best_times: BestTimes,
    }

    #[wasm_bindgen]
    impl WasmCourse {
        #[wasm_bindgen(constructor)]
        pub fn new() -> Result<WasmCourse, JsValue> {
            let config = GameConfig::load();
            let mut course = Course::new(&config.level, config.seed_mode).map_err(js_err)?;
            let mut world = CommandWorld::new();
            course.spawn_bodies(&mut world);

            Ok(Self {
                config,
                course,
                world,
                controls: Controls::default(),
                best_times: BestTimes::load(),
            })
        }

        /// Key down/up from the page. The first control pressed starts the run.
        pub fn key(&mut self, code: &str, pressed: bool, now_ms: f64) {
            if self.controls.handle_key(code, pressed)
                && self.controls.any_active()
                && self.course.run.phase == RunPhase::Ready
            {
                self.course.run.apply(RunEvent::Start { at_ms: now_ms });
            }
        }

        /// Queue this frame's kinematic poses
        pub fn tick(&mut self, elapsed: f32) -> Result<(), JsValue> {
            let report = self.course.tick(elapsed, &mut self.world).map_err(js_err)?;
            if report.skipped > 0 {
                log::debug!("{} obstacles skipped this tick", report.skipped);
            }
            Ok(())
        }

        /// Physics commands since the last call, as a JSON array
        pub fn drain_commands(&mut self) -> Result<String, JsValue> {
            serde_json::to_string(&self.world.drain()).map_err(js_err)
        }

        /// Ball entered the goal
        pub fn finish(&mut self, now_ms: f64) {
            if self.course.run.apply(RunEvent::Finish { at_ms: now_ms }) {
                if let Some(secs) = self.course.run.finish_secs() {
                    let blocks = self.course.level().layout.count;
                    if self.best_times.add_time(secs, blocks, js_sys::Date::now()).is_some() {
                        self.best_times.save();
                    }
                }
            }
        }

        /// Restart button. A new seed rolls a fresh course and is remembered
        /// for the next visit.
        pub fn restart(&mut self, seed: Option<f64>) -> Result<bool, JsValue> {
            let config = match seed {
                Some(seed) => self.config.reseeded_from_f64(seed).map_err(js_err)?,
                None => self.config.clone(),
            };
            let regenerated = self
                .course
                .restart(&config.level, &mut self.world)
                .map_err(js_err)?;
            if config != self.config {
                config.save();
                self.config = config;
            }
            Ok(regenerated)
        }

        /// HUD state as JSON
        pub fn hud(&self, now_ms: f64) -> Result<String, JsValue> {
            serde_json::to_string(&HudSnapshot::new(&self.course.run, self.controls, now_ms))
                .map_err(js_err)
        }

        /// Static floor and wall instances, 20 floats each (model matrix + color)
        pub fn static_instances(&self) -> js_sys::Float32Array {
            let instances = self.course.level().static_instances();
            let floats: &[f32] = bytemuck::cast_slice(&instances);
            js_sys::Float32Array::from(floats)
        }

        /// Full level description (blocks, labels, bounds) as JSON
        pub fn level_json(&self) -> Result<String, JsValue> {
            serde_json::to_string(self.course.level()).map_err(js_err)
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        let level = GameConfig::load().log_level.to_level();
        console_log::init_with_level(level).expect("Failed to init logger");
        log::info!("Marble Dash starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Marble Dash (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let config = match std::env::args().nth(1) {
        Some(path) => load_config_file(&path),
        None => marble_dash::GameConfig::load(),
    };

    if let Err(e) = run_headless(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config_file(path: &str) -> marble_dash::GameConfig {
    use marble_dash::GameConfig;

    match std::fs::read_to_string(path) {
        Ok(json) => GameConfig::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Invalid config {}: {}, using defaults", path, e);
            GameConfig::default()
        }),
        Err(e) => {
            log::warn!("Cannot read {}: {}, using defaults", path, e);
            GameConfig::default()
        }
    }
}

/// Drive a course for a few simulated seconds against the in-memory world
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(config: &marble_dash::GameConfig) -> Result<(), Box<dyn std::error::Error>> {
    use marble_dash::BestTimes;
    use marble_dash::consts::SIM_DT;
    use marble_dash::hud::{Controls, HudSnapshot};
    use marble_dash::sim::{Course, Pose, RecordingWorld, RunEvent, SimClock};

    const RUN_SECONDS: f32 = 5.0;

    let mut course = Course::new(&config.level, config.seed_mode)?;
    let mut world = RecordingWorld::new();
    course.spawn_bodies(&mut world);

    for (kind, pos) in course.level().layout.blocks() {
        println!("{:>16} at z = {:>6.1}", format!("{:?}", kind), pos.z);
    }

    let mut clock = SimClock::new();
    course.run.apply(RunEvent::Start { at_ms: 0.0 });

    let ticks = (RUN_SECONDS / SIM_DT).round() as u64;
    for _ in 0..ticks {
        clock.advance();
        let report = course.tick(clock.elapsed(), &mut world)?;

        if clock.ticks % 60 == 0 {
            println!("t = {:.2}s ({} poses)", clock.elapsed(), report.written);
            for (body, pose) in course.poses(clock.elapsed()) {
                let Some(id) = body else { continue };
                match pose {
                    Pose::Rotation(q) => println!("  {} yaw {:+.3}", id, q.to_euler(glam::EulerRot::XYZ).1),
                    Pose::Translation(v) => println!("  {} at ({:+.3}, {:+.3}, {:+.3})", id, v.x, v.y, v.z),
                }
            }
        }
    }

    let finish_ms = f64::from(clock.elapsed()) * 1000.0;
    course.run.apply(RunEvent::Finish { at_ms: finish_ms });
    let hud = HudSnapshot::new(&course.run, Controls::default(), finish_ms);
    println!("Finished in {}s (restart shown: {})", hud.time, hud.show_restart);

    let blocks = course.level().layout.count;
    let mut best = BestTimes::load();
    if let Some(secs) = course.run.finish_secs() {
        if best.add_time(secs, blocks, 0.0).is_some() {
            best.save();
        }
    }
    if let Some(secs) = best.best(blocks) {
        println!("Best on {} blocks: {}s", blocks, marble_dash::format_seconds(secs));
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
