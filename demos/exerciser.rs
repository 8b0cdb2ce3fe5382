//! Toggles axis 0 of an NCV7718 on a Linux `spidev` bus until Ctrl-C.
//!
//! Usage: `exerciser <SPI bus> <SPI CS> [<GPIO CS>]`
//!
//! A GPIO chip-select is a line offset on `/dev/gpiochip0`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::{error, info, warn};
use ncv7718_dd::linux::SpidevBinder;
use ncv7718_dd::{BusConfig, Ncv7718};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (bus, cs, gpio_cs) = match args.as_slice() {
        [bus, cs] => (bus, cs, None),
        [bus, cs, gpio_cs] => (bus, cs, Some(gpio_cs)),
        _ => bail!("Usage: exerciser <SPI Bus> <SPI CS> [<Optional GPIO CS>]"),
    };
    let bus: u8 = bus.parse().context("invalid SPI bus")?;
    let cs: u8 = cs.parse().context("invalid SPI chip-select")?;
    let gpio_cs: i32 = match gpio_cs {
        Some(gpio) => gpio.parse().context("invalid GPIO chip-select")?,
        None => -1,
    };

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop_clone = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            stop_clone.store(true, Ordering::Relaxed);
        })
        .context("failed to install Ctrl-C handler")?;
    }

    let config = BusConfig::new(bus, cs, gpio_cs);
    let mut hb = Ncv7718::open(&mut SpidevBinder::default(), &config).context("init failed")?;
    info!("NCV7718 on {config:?} ready");

    'outer: while !stop.load(Ordering::Relaxed) {
        for direction in [1, 0] {
            if let Err(e) = hb.set_output(0, direction) {
                error!("{e}");
                break 'outer;
            }
            match hb.apply() {
                Ok(status) => info!("axis 0 -> {direction}, status {:#06x}", status.raw()),
                Err(e) => warn!("axis 0 -> {direction}: {e}"),
            }
            thread::sleep(Duration::from_secs(1));
        }
    }

    hb.close();
    info!("outputs off");
    Ok(())
}
