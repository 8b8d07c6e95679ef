use env_logger::{Builder, Env};
use log::error;

fn init_logger() {
    // RUST_LOG overrides the default filter, e.g. RUST_LOG=debug pagefile info t.bin
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = pagefile::cli::run() {
        error!("{}", e);
        std::process::exit(e.code());
    }
}
