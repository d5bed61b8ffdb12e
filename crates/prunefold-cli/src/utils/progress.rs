use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use prunefold::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// What the terminal shows of a running search.
struct SearchDisplay {
    bar: ProgressBar,
    phase: &'static str,
    /// Candidates pruned since the current task started.
    pruned: usize,
    exhausted_at: Option<usize>,
}

impl SearchDisplay {
    fn apply(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                self.phase = name;
                self.exhausted_at = None;
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(spinner_style());
                self.bar
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                self.bar.set_message(name);
            }
            Progress::TaskStart { total_steps } => {
                self.pruned = 0;
                self.bar.disable_steady_tick();
                self.bar.reset();
                self.bar.set_length(total_steps);
                self.bar.set_style(level_style());
                self.bar.set_message(self.phase);
            }
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::LevelFinish {
                depth,
                survivors,
                pruned,
            } => {
                self.pruned += pruned;
                self.bar
                    .set_message(format!("atom {depth}: {survivors} live, {pruned} pruned"));
            }
            Progress::SearchExhausted { depth } => {
                self.exhausted_at = Some(depth);
                self.bar.disable_steady_tick();
                self.bar.abandon_with_message(format!(
                    "✗ every candidate pruned at atom {depth} ({} pruned in total)",
                    self.pruned
                ));
            }
            Progress::TaskFinish => {
                if self.exhausted_at.is_none() {
                    if let Some(length) = self.bar.length() {
                        self.bar.set_position(length);
                    }
                }
            }
            Progress::PhaseFinish => {
                if self.exhausted_at.is_some() {
                    return;
                }
                self.bar.disable_steady_tick();
                let summary = if self.pruned > 0 {
                    format!("✓ {}: {} pruned", self.phase, self.pruned)
                } else {
                    format!("✓ {}", self.phase)
                };
                self.bar.finish_with_message(summary);
            }
            Progress::Message(msg) => {
                if self.bar.is_finished() {
                    self.bar.set_message(msg);
                } else {
                    self.bar.println(format!("  {msg}"));
                }
            }
        }
    }
}

/// Renders a reconstruction as one spinner per phase and a bar over tree levels.
///
/// Each level shows its survivors and pruned count. An exhausted search abandons the bar
/// where it stopped instead of filling it.
#[derive(Clone)]
pub struct CliProgressHandler {
    display: Arc<Mutex<SearchDisplay>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::new(0).with_style(spinner_style());
        bar.set_draw_target(target);
        bar.finish_and_clear();

        Self {
            display: Arc::new(Mutex::new(SearchDisplay {
                bar,
                phase: "",
                pruned: 0,
                exhausted_at: None,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let display = self.display.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut display) = display.lock() else {
                warn!("Progress display mutex was poisoned. Cannot update progress.");
                return;
            };
            display.apply(progress);
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn level_style() -> ProgressStyle {
    ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} levels  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}
