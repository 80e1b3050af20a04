use std::sync::Arc;

use fm_tuner::{ConsoleDisplay, Peripherals, RadioConfig, SysfsGpio};
use tea5767_protocol::Transport;
use tea5767_protocol::transport::i2c::I2cTransport;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("--- FM RADIO RECEIVER --");
    println!("--- 87.5MHz - 108MHz ---");

    let config = RadioConfig::default();
    let bus = config.i2c_bus.clone();
    let console = ConsoleDisplay::stdout();
    let status = console.status_line();
    let peripherals = Peripherals {
        lines: Arc::new(SysfsGpio),
        open_transport: Box::new(move || {
            I2cTransport::open(&bus).map(|t| Box::new(t) as Box<dyn Transport>)
        }),
        display: Box::new(console),
        status: Arc::new(status),
    };

    let receiver = match fm_tuner::launch(&config, peripherals) {
        Ok(receiver) => receiver,
        Err(e) => {
            eprintln!("Failed to start receiver: {e}");
            std::process::exit(1);
        }
    };
    receiver.join();
}
