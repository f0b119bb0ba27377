use std::io;
use std::time::Duration;

use clap::Parser;
use tracing::Level;
use velvet_ui::components::ToastConfig;
use velvet_ui::constants::{
    AUTOCOMPLETE_BLUR_DELAY, DEFAULT_MAX_TOASTS, DEFAULT_TOAST_DURATION, TOAST_TICK,
};
use velvet_ui::drivers::{ConsoleDriver, ConsoleOutput, InputDriver};
use velvet_ui::event_loop::{EventLoop, LoopEvent};
use velvet_ui::layout::Placement;
use velvet_ui::log_buffer::{LogBuffer, set_global_log_buffer};

mod gallery;

use gallery::Gallery;

#[derive(Parser, Debug)]
#[command(
    name = "velvet-playground",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive gallery of the velvet-ui floating panels and toasts"
)]
struct PlaygroundCli {
    /// Event loop tick; drives toast countdowns and blur delays.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = TOAST_TICK.as_millis() as u64)]
    tick_ms: u64,

    /// Toasts kept on screen before the oldest is evicted.
    #[arg(long = "max-toasts", value_name = "COUNT", default_value_t = DEFAULT_MAX_TOASTS)]
    max_toasts: usize,

    /// Lifetime of gallery toasts. 0 keeps them until dismissed.
    #[arg(
        long = "toast-duration-ms",
        value_name = "MS",
        default_value_t = DEFAULT_TOAST_DURATION.as_millis() as u64
    )]
    toast_duration_ms: u64,

    /// Delay between the autocomplete losing focus and its panel closing.
    #[arg(
        long = "blur-delay-ms",
        value_name = "MS",
        default_value_t = AUTOCOMPLETE_BLUR_DELAY.as_millis() as u64
    )]
    blur_delay_ms: u64,

    /// Tooltip placement, e.g. `top`, `bottom-start`, `right-end`.
    #[arg(long = "placement", value_name = "PLACEMENT", default_value = "top")]
    placement: String,

    /// Most verbose level shown in the log pane.
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "debug")]
    log_level: String,
}

#[derive(Debug, Clone)]
pub struct PlaygroundConfig {
    pub tick: Duration,
    pub toast: ToastConfig,
    pub toast_duration: Option<Duration>,
    pub blur_delay: Duration,
    pub placement: Placement,
    pub log_level: Level,
}

impl TryFrom<&PlaygroundCli> for PlaygroundConfig {
    type Error = String;

    fn try_from(cli: &PlaygroundCli) -> Result<Self, Self::Error> {
        if !(10..=1000).contains(&cli.tick_ms) {
            return Err("tick must be between 10 and 1000 ms".to_string());
        }
        if !(1..=20).contains(&cli.max_toasts) {
            return Err("max-toasts must be between 1 and 20".to_string());
        }
        if cli.blur_delay_ms > 5000 {
            return Err("blur delay must be at most 5000 ms".to_string());
        }
        let placement: Placement = cli.placement.parse().map_err(|err| format!("{err}"))?;
        let log_level: Level = cli
            .log_level
            .parse()
            .map_err(|_| format!("unknown log level `{}`", cli.log_level))?;
        Ok(Self {
            tick: Duration::from_millis(cli.tick_ms),
            toast: ToastConfig::default().with_max_toasts(cli.max_toasts),
            toast_duration: (cli.toast_duration_ms > 0)
                .then(|| Duration::from_millis(cli.toast_duration_ms)),
            blur_delay: Duration::from_millis(cli.blur_delay_ms),
            placement,
            log_level,
        })
    }
}

fn main() -> io::Result<()> {
    let args = PlaygroundCli::parse();
    let config = PlaygroundConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let logs = LogBuffer::default();
    set_global_log_buffer(logs.clone());
    velvet_ui::tracing_sub::init(config.log_level);
    tracing::info!(?config, "playground starting");

    let mut output = ConsoleOutput::new()?;
    output.enter()?;
    let mut driver = ConsoleDriver::new();
    driver.set_mouse_capture(true)?;

    let mut gallery = Gallery::new(&config, logs);
    let mut event_loop = EventLoop::with_tick(driver, config.tick);
    let result = event_loop.run(|_, event| {
        let flow = match event {
            LoopEvent::Input(event) => gallery.handle_input(&event),
            LoopEvent::Tick(now) => gallery.tick(now),
        };
        output.draw(|mut frame| gallery.draw(&mut frame))?;
        Ok(flow)
    });

    event_loop.driver().set_mouse_capture(false)?;
    output.exit()?;
    result?;
    println!("{}", gallery.summary());
    Ok(())
}
