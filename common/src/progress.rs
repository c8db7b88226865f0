use std::io::IsTerminal;
use std::time::Duration;

use tracing::{event, Level};

/// How copy progress is rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum ProgressType {
    /// ProgressBar when stderr is a terminal, TextUpdates otherwise
    #[default]
    #[value(alias = "auto")]
    Auto,
    /// Animated progress bar
    #[value(alias = "progress-bar")]
    ProgressBar,
    /// One line per update, suitable for logs
    #[value(alias = "text-updates")]
    TextUpdates,
}

/// Estimate after `done` of `total` files took `elapsed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eta {
    pub done: usize,
    pub total: usize,
    pub elapsed: Duration,
    pub average: Duration,
    pub remaining: Duration,
}

impl Eta {
    pub fn after(done: usize, total: usize, elapsed: Duration) -> Self {
        let (average, remaining) = if done == 0 {
            (Duration::ZERO, Duration::ZERO)
        } else {
            let average = elapsed.div_f64(done as f64);
            let left = total.saturating_sub(done);
            (average, average.mul_f64(left as f64))
        };
        Self {
            done,
            total,
            elapsed,
            average,
            remaining,
        }
    }

    pub fn message(&self) -> String {
        let width = self.total.to_string().len();
        format!(
            "copying file {:0>width$} of {:>width$}  - approx remaining time {} - hit <ctrl>+c to cancel",
            self.done,
            self.total,
            format_hms(self.remaining),
            width = width
        )
    }
}

/// Renders `HH:MM:SS`, hours keep growing past 99.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Receives an update after every copied file. Purely cosmetic.
pub trait ProgressSink {
    fn start(&self, _total: usize) {}
    fn update(&self, eta: &Eta);
    fn finish(&self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _eta: &Eta) {}
}

impl ProgressSink for indicatif::ProgressBar {
    fn start(&self, total: usize) {
        self.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.set_length(total as u64);
        self.set_position(0);
        self.enable_steady_tick(Duration::from_millis(200));
    }

    fn update(&self, eta: &Eta) {
        self.set_position(eta.done as u64);
        self.set_message(eta.message());
    }

    fn finish(&self) {
        self.finish_and_clear();
    }
}

/// Plain lines on stderr, at most one per `delay`.
#[derive(Debug)]
pub struct TextUpdates {
    delay: Duration,
    last: std::cell::Cell<Option<std::time::Instant>>,
}

impl TextUpdates {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last: std::cell::Cell::new(None),
        }
    }
}

impl ProgressSink for TextUpdates {
    fn update(&self, eta: &Eta) {
        let now = std::time::Instant::now();
        let due = match self.last.get() {
            Some(last) => now.duration_since(last) >= self.delay || eta.done == eta.total,
            None => true,
        };
        if due {
            self.last.set(Some(now));
            eprintln!("{}", eta.message());
        }
    }
}

/// Builds the sink for `progress_type`; `None` disables progress output.
pub fn make_sink(progress_type: Option<ProgressType>) -> Box<dyn ProgressSink> {
    let Some(progress_type) = progress_type else {
        return Box::new(NoProgress);
    };
    let progress_type = match progress_type {
        ProgressType::Auto if std::io::stderr().is_terminal() => ProgressType::ProgressBar,
        ProgressType::Auto => ProgressType::TextUpdates,
        other => other,
    };
    event!(Level::DEBUG, "progress type: {:?}", progress_type);
    match progress_type {
        ProgressType::ProgressBar => {
            // hidden until the copy starts so it does not draw over the prompts
            let bar = indicatif::ProgressBar::hidden();
            bar.set_style(
                indicatif::ProgressStyle::with_template("{wide_bar} {pos}/{len}\n{msg}")
                    .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
            );
            Box::new(bar)
        }
        _ => Box::new(TextUpdates::new(Duration::from_secs(10))),
    }
}
