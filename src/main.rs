//! Metro Rush entry point
//!
//! Headless demo: runs one scripted round of the default board and logs
//! what happens. The engine itself never draws; a real host would feed
//! input and render from [`metro_rush::sim::FrameSnapshot`].

use glam::Vec2;

use metro_rush::sim::SessionEvent;
use metro_rush::{Direction, GameConfig, GameSession, consts};

fn main() {
    env_logger::init();
    log::info!("Metro Rush (headless) starting...");

    // Optional argument: path to a GameConfig JSON file.
    let config = match std::env::args().nth(1) {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("failed to load {path}: {err}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    let mut session = match GameSession::new(config, Vec2::new(390.0, 844.0)) {
        Ok(session) => session,
        Err(err) => {
            log::error!("bad configuration: {err}");
            std::process::exit(1);
        }
    };
    session.start();

    // Scripted input: wander the board for twenty seconds.
    let script = [
        (0.0, Direction::Right),
        (1.5, Direction::Up),
        (4.0, Direction::Left),
        (7.0, Direction::Down),
        (10.0, Direction::Right),
        (14.0, Direction::Up),
    ];
    let mut next_command = 0;

    let dt = consts::MOVE_INTERVAL;
    let mut elapsed = 0.0;
    while elapsed < 20.0 {
        if next_command < script.len() && elapsed >= script[next_command].0 {
            session.command(script[next_command].1);
            next_command += 1;
        }
        for event in session.advance(dt) {
            match event {
                SessionEvent::Collected { id, score, points } => {
                    println!("collected #{id}: score {score}, points {points}");
                }
                SessionEvent::Respawned { id, pos } => {
                    println!("#{id} respawned at ({:.0}, {:.0})", pos.x, pos.y);
                }
                SessionEvent::ClockTicked { remaining } => {
                    let frame = session.frame();
                    println!(
                        "{remaining:>2}s | player ({:.0}, {:.0}) | camera ({:.0}, {:.0}) | {} items left",
                        frame.player_pos.x,
                        frame.player_pos.y,
                        frame.camera_offset.x,
                        frame.camera_offset.y,
                        frame.collectibles.len(),
                    );
                }
                SessionEvent::RoundEnded { score, points } => {
                    println!("round over: score {score}, points {points}");
                }
            }
        }
        elapsed += dt;
    }

    let frame = session.frame();
    println!(
        "demo done: score {} ({} points), {}s left on the clock",
        frame.score, frame.points, frame.remaining_seconds
    );
}

fn load_config(path: &str) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let config: GameConfig = serde_json::from_str(&text)?;
    config.validate()?;
    Ok(config)
}
