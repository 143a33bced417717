use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

fn enabled() -> bool {
    if std::env::var_os("NO_PROGRESS").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

/// Progress handle for one external step: started by the workflow, finished by the runner.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        log::debug!("{}", message);
        if !enabled() {
            return Spinner {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        bar.set_message(message.to_string());
        Spinner { bar }
    }

    pub fn succeed(&self, label: &str) {
        log::debug!("Completed: {}", label);
        self.finish(format!("{} Completed: {}", "✔".green(), label.green()));
    }

    pub fn fail(&self, label: &str) {
        log::debug!("Error in: {}", label);
        self.finish(format!("{} Error in: {}", "✖".red(), label.red()));
    }

    fn finish(&self, line: String) {
        if self.bar.is_hidden() {
            eprintln!("{}", line);
        } else {
            self.bar.finish_with_message(line);
        }
    }
}
