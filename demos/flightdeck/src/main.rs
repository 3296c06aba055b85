//! flightdeck — a console flight deck for the skyhelm simulation core.
//!
//! Builds the default solar system, drops the craft into Earth orbit, and
//! runs a fixed-timestep loop. Lines typed on stdin go through the command
//! interpreter ("fly mars", "set speed 12", "what is that", ...); voice
//! output and host events print to stdout.

use std::io::BufRead;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use glam::Vec3;
use skyhelm_core::{
    solar_system, CylImage, FixedTimestep, HostEvent, SimConfig, Simulation, CYL_COLS, CYL_ROWS,
};

/// Stand-in day/night textures: a banded "continents" image and a dark one
/// with city-light speckles, deterministic so runs are reproducible.
fn synthetic_earth_textures() -> (CylImage, CylImage) {
    let day = CylImage::from_fn(CYL_COLS, CYL_ROWS, |col, row| {
        let land = (col / 96 + row / 64) % 3 == 0;
        if land {
            Vec3::new(0.24, 0.42, 0.16)
        } else {
            Vec3::new(0.08, 0.22, 0.45)
        }
    });
    let night = CylImage::from_fn(CYL_COLS, CYL_ROWS, |col, row| {
        let speckle = (col * 31 + row * 17) % 97 == 0;
        if speckle {
            Vec3::new(0.9, 0.85, 0.6)
        } else {
            Vec3::new(0.01, 0.01, 0.03)
        }
    });
    (day, night)
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn main() -> Result<()> {
    env_logger::init();

    let mut sim = Simulation::new(&solar_system(), SimConfig::default())?;
    let earth = sim.ctx.arena.find("earth").context("earth missing from catalog")?;
    {
        let body = sim.ctx.arena.get_mut(earth).context("earth id is stale")?;
        let (day, night) = synthetic_earth_textures();
        body.attach_terminator(day, night, 220, 3.0);
        body.add_atmosphere(2.05, 0.0, 0.0, false);
    }
    sim.navigator.enter_orbit(earth, &mut sim.ctx);

    println!("flightdeck — type a command and press enter; \"drop dead\" or ctrl-d quits");
    let commands = spawn_stdin_reader();
    let mut timestep = FixedTimestep::new(sim.config().fixed_dt);
    let mut last = Instant::now();
    let mut last_status = String::new();

    'run: loop {
        loop {
            match commands.try_recv() {
                Ok(line) => sim.commands.push(line),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break 'run,
            }
        }

        let now = Instant::now();
        let steps = timestep.accumulate(now.duration_since(last).as_secs_f32());
        last = now;
        for _ in 0..steps {
            sim.tick();
        }

        for line in sim.ctx.drain_utterances() {
            println!("\u{00ab} {line}");
        }
        for event in sim.ctx.drain_events() {
            match event {
                HostEvent::Quit => break 'run,
                other => println!("\u{00b7} host event: {other:?}"),
            }
        }
        let status = sim.status_line();
        if status != last_status {
            let p = sim.ctx.craft.position;
            println!("\u{00b7} autopilot [{status}] at ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z);
            last_status = status;
        }

        thread::sleep(Duration::from_millis(8));
    }
    Ok(())
}
