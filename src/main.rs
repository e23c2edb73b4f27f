//! Hollow Run headless host
//!
//! Drives the simulation with an autopilot instead of a window and input
//! devices. Useful for soak-testing the core and watching the event log.
//!
//! Usage: hollow-run [--difficulty easy|normal|hard] [--config FILE] [--seed N] [--frames N]

use std::process::ExitCode;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use hollow_run::consts::*;
use hollow_run::sim::{GamePhase, GameState, MovementPolicy, SimEvent, TickInput, tick};
use hollow_run::{ConfigError, Difficulty, SimConfig, facing_heading};

/// Command-line options
#[derive(Debug)]
struct Options {
    /// Preset layered over the config; `None` leaves the config untouched
    difficulty: Option<Difficulty>,
    config_path: Option<String>,
    seed: u64,
    frames: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            difficulty: None,
            config_path: None,
            seed: 0x5eed,
            frames: 60 * 120,
        }
    }
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("missing value for {}", arg));
        match arg.as_str() {
            "--difficulty" => {
                let v = value()?;
                options.difficulty = Some(
                    Difficulty::from_str(&v).ok_or_else(|| format!("unknown difficulty: {}", v))?,
                );
            }
            "--config" => options.config_path = Some(value()?),
            "--seed" => {
                let v = value()?;
                options.seed = v.parse().map_err(|_| format!("invalid seed: {}", v))?;
            }
            "--frames" => {
                let v = value()?;
                options.frames = v.parse().map_err(|_| format!("invalid frame count: {}", v))?;
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

/// Load the config file (or defaults) and layer an explicit difficulty on top
fn resolve_config(
    path: Option<&str>,
    difficulty: Option<Difficulty>,
) -> Result<SimConfig, ConfigError> {
    let mut config = match path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(difficulty) = difficulty {
        config.apply_difficulty(difficulty);
        config.validate()?;
    }
    Ok(config)
}

/// Host-side session: simulation plus the bits a real frontend would own
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    rng: Pcg32,
    wins: u32,
    losses: u32,
}

impl Game {
    fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(config)?,
            accumulator: 0.0,
            input: TickInput::default(),
            rng: Pcg32::seed_from_u64(seed),
            wins: 0,
            losses: 0,
        })
    }

    /// Pick intents: face the nearest coin and walk toward it, with some noise
    fn autopilot(&mut self) {
        use std::f32::consts::{PI, TAU};

        let hero = &self.state.hero;
        let target = self
            .state
            .coins
            .iter()
            .filter(|c| c.active)
            .min_by(|a, b| {
                a.position
                    .distance_squared(hero.position)
                    .partial_cmp(&b.position.distance_squared(hero.position))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|c| c.position);

        let mut input = TickInput {
            policy: self.input.policy,
            ..Default::default()
        };

        if let Some(heading) = target.and_then(|t| facing_heading(t - hero.position)) {
            let mut diff = (heading - hero.heading()).rem_euclid(TAU);
            if diff > PI {
                diff -= TAU;
            }
            input.turn_left = diff > 0.05;
            input.turn_right = diff < -0.05;
            input.forward = diff.abs() < 0.6;
        }

        // Occasional panic: back off or swap camera mode
        if self.rng.random_bool(0.02) {
            input.forward = false;
            input.backward = true;
        }
        if self.rng.random_bool(0.002) {
            input.policy = match input.policy {
                MovementPolicy::Arcball => MovementPolicy::FirstPerson,
                MovementPolicy::FirstPerson => MovementPolicy::Arcball,
            };
            log::debug!("Camera policy -> {:?}", input.policy);
        }

        if self.state.phase.is_finished() {
            input.reset = true;
        }
        self.input = input;
    }

    /// Run simulation steps for one host frame
    fn update(&mut self, frame_dt: f32) {
        let frame_dt = frame_dt.min(0.1);
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.autopilot();
            let events = tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for event in &events {
                match event {
                    SimEvent::Won => self.wins += 1,
                    SimEvent::Lost(_) => self.losses += 1,
                    _ => {}
                }
            }
        }
    }

    /// What a renderer would draw; here just a periodic status line
    fn report(&self, frame: u32) {
        let snapshot = self.state.snapshot();
        log::info!(
            "frame {}: {:?} lives={} coins={}/{} hero=({:.1}, {:.1}, {:.1})",
            frame,
            snapshot.phase,
            snapshot.hero_lives,
            snapshot.coins_collected,
            snapshot.coins.len(),
            snapshot.hero.position.x,
            snapshot.hero.position.y,
            snapshot.hero.position.z,
        );
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Hollow Run (headless) starting...");

    let options = match parse_args() {
        Ok(options) => options,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let game = resolve_config(options.config_path.as_deref(), options.difficulty)
        .and_then(|config| Game::new(config, options.seed));
    let mut game = match game {
        Ok(game) => game,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Difficulty {} with seed {}",
        options.difficulty.map_or("from config", |d| d.as_str()),
        options.seed
    );

    let mut frame_rng = Pcg32::seed_from_u64(options.seed.wrapping_add(1));

    for frame in 0..options.frames {
        // Jittered frame time around 60 Hz
        let frame_dt = SIM_DT * frame_rng.random_range(0.5..2.0);
        game.update(frame_dt);
        if frame % 600 == 0 {
            game.report(frame);
        }
    }

    game.report(options.frames);
    log::info!(
        "Done: {} wins, {} losses, final phase {:?}",
        game.wins,
        game.losses,
        game.state.phase
    );
    if game.state.phase == GamePhase::Playing {
        log::info!("Session still in progress after {:.1}s", game.state.elapsed);
    }
    ExitCode::SUCCESS
}
