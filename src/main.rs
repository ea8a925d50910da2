pub mod seq;
pub mod algo;
pub mod math;
pub mod scan;
pub mod ext;
pub mod command;

mod err;
pub use err::Error;

fn init_logger() -> Result<(), log::SetLoggerError> {
    use fern::{
        Dispatch,
        colors::{Color, ColoredLevelConfig},
    };
    let colors = ColoredLevelConfig::default()
        .info(Color::Green)
        .debug(Color::Cyan);
    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {:>5}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(std::io::stderr())
        .apply()?;
    log::set_max_level(log::LevelFilter::Debug);
    Ok(())
}

fn main() {
    if let Err(e) = init_logger() {
        eprintln!("Could not initialize logger: {}", e);
    }
    let args: Vec<_> = std::env::args().collect();
    if let Err(e) = command::run(&args) {
        log::error!("{}", e.display());
        std::process::exit(1);
    }
}
