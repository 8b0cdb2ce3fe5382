use super::{SpiDevice, bisync};
use crate::{BusConfig, CommandWord, DeviceState, Direction, OutputState, SpiBinder, Status};
use crate::Ncv7718Error;

/// NCV7718 hex half-bridge driver.
///
/// Owns the SPI device for its whole lifetime. Outputs are staged with
/// [`set_output`](Self::set_output) and pushed to the chip by
/// [`apply`](Self::apply).
pub struct Ncv7718<SpiBus> {
    spi: SpiBus,
    outputs: OutputState,
    state: DeviceState,
    last_status: Option<Status>,
}

impl<SpiBus, E> Ncv7718<SpiBus>
where
    SpiBus: SpiDevice<Error = E>,
    E: core::fmt::Debug,
{
    /// Wrap an SPI device configured for mode 1, 8-bit words, MSB first.
    ///
    /// Nothing is sent until [`init`](Self::init).
    pub fn new(spi: SpiBus) -> Self {
        Self {
            spi,
            outputs: OutputState::new(),
            state: DeviceState::Uninitialized,
            last_status: None,
        }
    }

    /// Bind the transport described by `config` and run the power-on reset.
    ///
    /// No handle is returned if either step fails.
    #[bisync]
    pub async fn open<B>(binder: &mut B, config: &BusConfig) -> Result<Self, Ncv7718Error<E>>
    where
        B: SpiBinder<Device = SpiBus>,
    {
        let spi = binder.bind(config).map_err(|e| {
            error!("Error binding SPI bus {}", config.bus);
            Ncv7718Error::Spi(e)
        })?;
        let mut dev = Self::new(spi);
        dev.init().await?;
        Ok(dev)
    }

    /// Power-on reset. Moves the handle to [`DeviceState::Ready`] on success.
    #[bisync]
    pub async fn init(&mut self) -> Result<(), Ncv7718Error<E>> {
        self.reset().await?;
        self.state = DeviceState::Ready;
        debug!("NCV7718 ready");
        Ok(())
    }

    /// Send the status-register reset strobe with every output disabled.
    ///
    /// This clears latched faults. Staged outputs are kept and can be
    /// re-applied afterwards.
    #[bisync]
    pub async fn reset(&mut self) -> Result<(), Ncv7718Error<E>> {
        let cmd = CommandWord::reset();
        self.write_word(cmd)
            .await
            .inspect_err(|_| error!("Could not send command {:#x}", cmd.raw()))
    }

    /// Stage `direction` (-1, 0 or 1) for channel pair `axis` (0..=3).
    ///
    /// Only the addressed pair changes. Out-of-range arguments leave the staged
    /// state untouched and return [`Ncv7718Error::InvalidArgument`].
    pub fn set_output(&mut self, axis: u8, direction: i8) -> Result<(), Ncv7718Error<E>> {
        self.outputs.set_output(axis, direction).map_err(|e| {
            error!("Invalid output axis {} direction {}", axis, direction);
            e.into()
        })
    }

    /// Typed variant of [`set_output`](Self::set_output).
    pub fn set_direction(&mut self, axis: u8, direction: Direction) -> Result<(), Ncv7718Error<E>> {
        self.outputs.set_direction(axis, direction).map_err(|e| {
            error!("Invalid output axis {}", axis);
            e.into()
        })
    }

    /// Push the staged outputs to the device and verify them.
    ///
    /// The command is written once, then written again while the status of
    /// the first frame is clocked back. The reported configuration must match
    /// what was sent, after which thermal warning, power supply failure,
    /// overcurrent shutoff and under-load are checked in that order. Staged
    /// state is kept whatever the outcome.
    #[bisync]
    pub async fn apply(&mut self) -> Result<Status, Ncv7718Error<E>> {
        if self.state != DeviceState::Ready {
            error!("Apply on an uninitialized device");
            return Err(Ncv7718Error::NotInitialized);
        }

        let cmd = self.outputs.command();
        self.write_word(cmd)
            .await
            .inspect_err(|_| error!("Could not send command {:#x}", cmd.raw()))?;
        let status = self
            .exchange_word(cmd)
            .await
            .inspect_err(|_| error!("Could not confirm command {:#x}", cmd.raw()))?;
        self.last_status = Some(status);

        if status.hbcr() != cmd.hbcnf() {
            error!(
                "HB configuration does not match: out {:#x} | in {:#x}",
                cmd.raw(),
                status.raw()
            );
            return Err(Ncv7718Error::ConfigMismatch {
                sent: cmd.hbcnf(),
                reported: status.hbcr(),
            });
        }
        if let Some(fault) = status.fault() {
            warn!("Device fault, status {:#x}", status.raw());
            return Err(Ncv7718Error::from_fault(fault, status));
        }

        trace!("Command {:#x} | Result {:#x}", cmd.raw(), status.raw());
        Ok(status)
    }

    /// Disable every output and release the SPI device.
    ///
    /// A failing shutdown transfer is logged and otherwise ignored.
    #[bisync]
    pub async fn close(mut self) -> SpiBus {
        self.outputs.clear();
        if self.reset().await.is_err() {
            error!("Could not turn off outputs");
        }
        self.spi
    }

    /// Outputs staged for the next [`apply`](Self::apply).
    pub fn outputs(&self) -> &OutputState {
        &self.outputs
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Status decoded by the most recent read-back.
    pub fn last_status(&self) -> Option<Status> {
        self.last_status
    }

    #[bisync]
    async fn write_word(&mut self, cmd: CommandWord) -> Result<(), Ncv7718Error<E>> {
        self.spi.write(&cmd.to_be_bytes()).await.map_err(Ncv7718Error::Spi)
    }

    /// Full-duplex transfer, returns the status of the previous frame.
    #[bisync]
    async fn exchange_word(&mut self, cmd: CommandWord) -> Result<Status, Ncv7718Error<E>> {
        let mut response = [0u8; 2];
        self.spi
            .transfer(&mut response, &cmd.to_be_bytes())
            .await
            .map_err(Ncv7718Error::Spi)?;
        Ok(Status::from_be_bytes(response))
    }
}
