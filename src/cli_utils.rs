use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {msg} {spinner:.green}";
const SPINNER_TICK_MS: u64 = 80;

pub fn create_spinner(quiet_mode: bool, msg: &str) -> ProgressBar {
    let spinner = match quiet_mode {
        true => ProgressBar::hidden(),
        false => ProgressBar::new_spinner(),
    };

    spinner.set_message(msg);
    spinner.set_style(ProgressStyle::default_spinner().template(SPINNER_TEMPLATE));
    spinner.enable_steady_tick(SPINNER_TICK_MS);

    spinner
}

/// Runs a blocking request with a spinner on stderr.
pub fn with_spinner<T, F: FnOnce() -> T>(quiet_mode: bool, msg: &str, request: F) -> T {
    let spinner = create_spinner(quiet_mode, msg);
    let result = request();
    spinner.finish_and_clear();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_return_the_request_result() {
        assert_eq!(with_spinner(true, "Working...", || 42), 42);
    }
}
