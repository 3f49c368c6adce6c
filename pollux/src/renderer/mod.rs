pub mod compaction;
mod pipeline;

pub use pipeline::{render, IterationStats, WavefrontPipeline};

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{channel, Receiver, RecvError, Sender, TryRecvError},
        Arc,
    },
    thread::JoinHandle,
    time::Instant,
};

use crate::{
    error::{Error, Result},
    film::Film,
    pollux_debug, pollux_error, pollux_info, pollux_trace,
    scene::Scene,
    settings::RenderSettings,
};

pub enum RenderStatus {
    Progress {
        iterations_done: u32,
        iterations_total: u32,
        approx_remaining_s: f32,
        current_rays_per_s: f32,
    },
    Finished {
        ray_count: usize,
    },
}

pub struct RenderResult {
    pub film: Film,
    pub secs: f32,
    pub ray_count: usize,
    /// Less than the requested count if the render was cancelled
    pub iterations: u32,
}

enum Message {
    Progress {
        render_id: usize,
        iterations_done: u32,
        iterations_total: u32,
        approx_remaining_s: f32,
        current_rays_per_s: f32,
    },
    Finished {
        render_id: usize,
        result: Result<RenderResult>,
    },
}

struct RenderTask {
    rx: Receiver<Message>,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Runs renders on a background thread, reporting progress through `check_status`.
pub struct Renderer {
    task: Option<RenderTask>,
    render_in_progress: bool,
    render_id: usize,
    result: Option<Result<RenderResult>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            task: None,
            render_in_progress: false,
            render_id: 0,
            result: None,
        }
    }

    /// Checks if the render task is active.
    pub fn is_active(&self) -> bool {
        self.render_in_progress
    }

    /// Launch a new render task, cancelling the previous one if one is already running.
    pub fn launch(&mut self, scene: Arc<Scene>, settings: RenderSettings) -> Result<()> {
        self.kill();
        self.render_id += 1;
        self.result = None;

        let (tx, rx) = channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let render_id = self.render_id;

        pollux_debug!("launch: Spawning render {}", render_id);
        let handle = {
            let cancel = Arc::clone(&cancel);
            std::thread::Builder::new()
                .name("RenderTask".into())
                .spawn(move || {
                    let result = run(render_id, scene, settings, &cancel, &tx);
                    if let Err(why) = &result {
                        pollux_error!("Render {} failed: {}", render_id, why);
                    }
                    drop(tx.send(Message::Finished { render_id, result }));
                })
                .map_err(Error::Spawn)?
        };

        self.task = Some(RenderTask { rx, cancel, handle });
        self.render_in_progress = true;
        Ok(())
    }

    /// Returns the latest status of the active render, `None` if nothing new was reported.
    pub fn check_status(&mut self) -> Option<RenderStatus> {
        if !self.render_in_progress {
            return None;
        }
        let task = self.task.as_ref()?;

        let mut ret = None;
        let mut finished = None;
        loop {
            match task.rx.try_recv() {
                Ok(Message::Progress {
                    render_id,
                    iterations_done,
                    iterations_total,
                    approx_remaining_s,
                    current_rays_per_s,
                }) => {
                    if render_id == self.render_id {
                        ret = Some(RenderStatus::Progress {
                            iterations_done,
                            iterations_total,
                            approx_remaining_s,
                            current_rays_per_s,
                        });
                    } else {
                        pollux_debug!("check_status: Stale render job has progressed");
                    }
                }
                Ok(Message::Finished { render_id, result }) => {
                    if render_id == self.render_id {
                        pollux_debug!("check_status: Render job has finished");
                        finished = Some(result);
                        break;
                    }
                    pollux_debug!("check_status: Stale render job has finished");
                }
                Err(TryRecvError::Empty) => {
                    pollux_trace!("check_status: Render job still running");
                    break;
                }
                Err(TryRecvError::Disconnected) => {
                    pollux_error!("check_status: Render task has been terminated");
                    finished = Some(Err(Error::RenderPanicked));
                    break;
                }
            }
        }

        if let Some(result) = finished {
            let ray_count = result.as_ref().map_or(0, |r| r.ray_count);
            self.finish(result);
            ret = Some(RenderStatus::Finished { ray_count });
        }
        ret
    }

    /// Waits for the render task to end and returns its result
    pub fn wait_result(&mut self) -> Result<RenderResult> {
        if self.render_in_progress {
            let result = match self.task.as_ref() {
                Some(task) => loop {
                    match task.rx.recv() {
                        Ok(Message::Finished { render_id, result })
                            if render_id == self.render_id =>
                        {
                            break result;
                        }
                        Ok(_) => (),
                        Err(RecvError) => break Err(Error::RenderPanicked),
                    }
                },
                None => Err(Error::NoRender),
            };
            self.finish(result);
        }
        self.result.take().unwrap_or(Err(Error::NoRender))
    }

    /// Stops the active render, discarding its result
    pub fn kill(&mut self) {
        if let Some(RenderTask { cancel, handle, .. }) = self.task.take() {
            cancel.store(true, Ordering::Relaxed);
            if handle.join().is_err() {
                pollux_error!("kill: Render task panicked");
            }
        }
        self.render_in_progress = false;
    }

    fn finish(&mut self, result: Result<RenderResult>) {
        self.render_in_progress = false;
        self.result = Some(result);
        if let Some(RenderTask { handle, .. }) = self.task.take() {
            if handle.join().is_err() {
                pollux_error!("Render task panicked");
            }
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.kill();
    }
}

fn run(
    render_id: usize,
    scene: Arc<Scene>,
    settings: RenderSettings,
    cancel: &AtomicBool,
    to_parent: &Sender<Message>,
) -> Result<RenderResult> {
    let render_start = Instant::now();
    let mut pipeline = WavefrontPipeline::new(scene, settings)?;

    for i in 0..settings.iterations {
        if cancel.load(Ordering::Relaxed) {
            pollux_info!("Render {} cancelled after {} iterations", render_id, i);
            break;
        }

        let iteration_start = Instant::now();
        let stats = pipeline.render_iteration()?;
        let iteration_s = iteration_start.elapsed().as_secs_f32();

        let done = i + 1;
        let elapsed_s = render_start.elapsed().as_secs_f32();
        let approx_remaining_s =
            elapsed_s / (done as f32) * ((settings.iterations - done) as f32);
        let current_rays_per_s = if iteration_s > 0.0 {
            (stats.rays_traced as f32) / iteration_s
        } else {
            0.0
        };
        // Parent may have stopped listening
        drop(to_parent.send(Message::Progress {
            render_id,
            iterations_done: done,
            iterations_total: settings.iterations,
            approx_remaining_s,
            current_rays_per_s,
        }));
    }

    let iterations = pipeline.iteration();
    let ray_count = pipeline.ray_count();
    Ok(RenderResult {
        film: pipeline.into_film(),
        secs: render_start.elapsed().as_secs_f32(),
        ray_count,
        iterations,
    })
}
