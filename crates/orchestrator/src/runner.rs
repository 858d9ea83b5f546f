//! Simulation runner with lifecycle management
//!
//! This module provides the `SimulationRunner` which steps a `FluidSim` in a
//! background thread, including start, pause, resume, status tracking,
//! pointer-input hand-off, and read-only snapshots for renderers.

use glam::Vec2;
use kernel::{FluidSim, PointerInput};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

/// Runner state enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerState {
    /// Simulation created but not yet started
    Created,
    /// Simulation actively stepping
    Running,
    /// Simulation paused
    Paused,
    /// Simulation finished (reached a stopping condition or was dropped)
    Finished,
}

/// Read-only particle snapshot published after every frame.
///
/// Renderers read positions and velocities (for speed-to-color mapping) and
/// never mutate simulation state; the snapshot is a copy, so a slow reader
/// cannot stall the stepping thread.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Particle positions
    pub positions: Vec<Vec2>,
    /// Particle velocities
    pub velocities: Vec<Vec2>,
    /// Number of sub-steps executed when the snapshot was taken
    pub timestep: u64,
}

/// Shared state between the runner thread and control interface
struct SharedState {
    /// Current runner state
    state: RunnerState,
    /// Current simulation time (seconds)
    sim_time: f64,
    /// Number of sub-steps executed
    timestep_count: u64,
    /// Pointer input applied before each frame; `None` disables the force
    pointer: Option<PointerInput>,
}

/// Handle for controlling and querying a running simulation
pub struct SimulationRunner {
    /// Shared control state (protected by mutex)
    shared: Arc<Mutex<SharedState>>,
    /// Latest published particle snapshot
    snapshot: Arc<Mutex<Snapshot>>,
    /// Handle to the background thread
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl SimulationRunner {
    /// Create a new runner that owns `sim` on a background thread.
    ///
    /// Each frame executes `substeps_per_frame` sub-steps of duration
    /// `frame_dt / substeps_per_frame`, then publishes a snapshot.
    ///
    /// # Arguments
    /// * `sim` - The simulation to step
    /// * `frame_dt` - Simulated duration of one frame (seconds)
    /// * `substeps_per_frame` - Sub-steps per frame (at least 1)
    /// * `max_timesteps` - Optional maximum number of sub-steps
    /// * `max_time` - Optional maximum simulated time (seconds)
    pub fn new(
        mut sim: FluidSim,
        frame_dt: f32,
        substeps_per_frame: u32,
        max_timesteps: Option<u64>,
        max_time: Option<f64>,
    ) -> Self {
        let shared = Arc::new(Mutex::new(SharedState {
            state: RunnerState::Created,
            sim_time: 0.0,
            timestep_count: 0,
            pointer: None,
        }));
        let snapshot = Arc::new(Mutex::new(Snapshot {
            positions: sim.particles().positions.clone(),
            velocities: sim.particles().velocities.clone(),
            timestep: 0,
        }));

        let shared_clone = Arc::clone(&shared);
        let snapshot_clone = Arc::clone(&snapshot);

        let thread_handle = thread::spawn(move || {
            run_simulation_loop(
                &mut sim,
                shared_clone,
                snapshot_clone,
                frame_dt,
                substeps_per_frame.max(1),
                max_timesteps,
                max_time,
            );
        });

        Self {
            shared,
            snapshot,
            thread_handle: Some(thread_handle),
        }
    }

    /// Get current runner state
    pub fn state(&self) -> RunnerState {
        self.shared.lock().unwrap().state.clone()
    }

    /// Get current simulated time (seconds)
    pub fn sim_time(&self) -> f64 {
        self.shared.lock().unwrap().sim_time
    }

    /// Get current sub-step count
    pub fn timestep_count(&self) -> u64 {
        self.shared.lock().unwrap().timestep_count
    }

    /// Get a copy of the latest particle snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.lock().unwrap().clone()
    }

    /// Set or clear the pointer input applied before each frame
    pub fn set_pointer(&self, pointer: Option<PointerInput>) {
        self.shared.lock().unwrap().pointer = pointer;
    }

    /// Start the simulation (transition from Created to Running)
    pub fn start(&self) {
        let mut state = self.shared.lock().unwrap();
        if state.state == RunnerState::Created {
            state.state = RunnerState::Running;
        }
    }

    /// Pause the simulation
    pub fn pause(&self) {
        let mut state = self.shared.lock().unwrap();
        if state.state == RunnerState::Running {
            state.state = RunnerState::Paused;
        }
    }

    /// Resume the simulation
    pub fn resume(&self) {
        let mut state = self.shared.lock().unwrap();
        if state.state == RunnerState::Paused {
            state.state = RunnerState::Running;
        }
    }

    /// Wait for the simulation thread to complete
    pub fn join(mut self) -> Result<(), String> {
        if let Some(handle) = self.thread_handle.take() {
            handle.join().map_err(|_| "Thread panicked".to_string())?;
        }
        Ok(())
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        // Signal the thread to exit
        if let Ok(mut state) = self.shared.lock() {
            if state.state == RunnerState::Running || state.state == RunnerState::Paused {
                state.state = RunnerState::Finished;
            }
        }
    }
}

/// Main simulation loop executed in the background thread
fn run_simulation_loop(
    sim: &mut FluidSim,
    shared: Arc<Mutex<SharedState>>,
    snapshot: Arc<Mutex<Snapshot>>,
    frame_dt: f32,
    substeps_per_frame: u32,
    max_timesteps: Option<u64>,
    max_time: Option<f64>,
) {
    // Wait for start signal
    loop {
        let state = {
            let guard = shared.lock().unwrap();
            guard.state.clone()
        };

        match state {
            RunnerState::Created => {
                thread::sleep(std::time::Duration::from_millis(10));
            }
            RunnerState::Running => break,
            _ => return,
        }
    }

    let start_wall_time = Instant::now();
    let substep_dt = frame_dt / substeps_per_frame as f32;
    let mut sim_time = 0.0_f64;
    let mut timestep_count = 0_u64;
    let mut frame_count = 0_u64;

    loop {
        // Check state and fetch the latest pointer input
        let (current_state, pointer) = {
            let guard = shared.lock().unwrap();
            (guard.state.clone(), guard.pointer)
        };

        match current_state {
            RunnerState::Running => {
                // Execute one frame of sub-steps
                sim.set_pointer(pointer);
                for _ in 0..substeps_per_frame {
                    sim.step(substep_dt);
                }
                sim_time += frame_dt as f64;
                timestep_count += substeps_per_frame as u64;
                frame_count += 1;

                // Publish the renderer snapshot
                {
                    let mut guard = snapshot.lock().unwrap();
                    guard.positions.clear();
                    guard.positions.extend_from_slice(&sim.particles().positions);
                    guard.velocities.clear();
                    guard.velocities.extend_from_slice(&sim.particles().velocities);
                    guard.timestep = timestep_count;
                }

                // Update shared counters
                {
                    let mut guard = shared.lock().unwrap();
                    guard.sim_time = sim_time;
                    guard.timestep_count = timestep_count;
                }

                // Check stopping conditions
                if let Some(max_steps) = max_timesteps {
                    if timestep_count >= max_steps {
                        tracing::info!(
                            "Simulation finished: reached max_timesteps = {}",
                            max_steps
                        );
                        let mut guard = shared.lock().unwrap();
                        guard.state = RunnerState::Finished;
                        break;
                    }
                }

                if let Some(max_t) = max_time {
                    if sim_time >= max_t {
                        tracing::info!("Simulation finished: reached max_time = {:.3}s", max_t);
                        let mut guard = shared.lock().unwrap();
                        guard.state = RunnerState::Finished;
                        break;
                    }
                }

                // Log progress periodically
                if frame_count % 100 == 0 {
                    let wall_time = start_wall_time.elapsed().as_secs_f64();
                    let metrics = sim.metrics();
                    tracing::debug!(
                        "Frame {}: steps={}, sim_time={:.3}s, wall_time={:.2}s, max_speed={:.3}",
                        frame_count,
                        timestep_count,
                        sim_time,
                        wall_time,
                        metrics.max_speed,
                    );
                }
            }
            RunnerState::Paused => {
                // Wait while paused
                thread::sleep(std::time::Duration::from_millis(50));
            }
            RunnerState::Finished => {
                break;
            }
            RunnerState::Created => {
                // Shouldn't happen, but treat as finished
                break;
            }
        }
    }

    tracing::info!(
        "Simulation thread exiting: {} sub-steps over {} frames, {:.3}s simulated",
        timestep_count,
        frame_count,
        sim_time
    );
}
