use crate::{
    board::Board,
    packet::{LedCommand, LedTarget, PacketType},
    parser::Command,
    serial::Transport,
};

/// Apply a decoded command.
///
/// LED commands drive the addressed LED, serial commands echo their byte
/// straight back over `link`. Anything else is dropped.
pub fn perform<B: Board, T: Transport>(
    command: Command,
    board: &mut B,
    link: &mut T,
) -> Result<(), T::Error> {
    match command.kind() {
        Some(PacketType::Led) => {
            let led = LedCommand::from(command.value);
            log::debug!("led command {:?}", led);
            match led.target() {
                LedTarget::Data => board.set_data_led(led.on()),
                LedTarget::Error => board.set_error_led(led.on()),
            }
        }
        Some(PacketType::Serial) => {
            log::debug!("serial echo {:#04x}", command.value);
            link.send(command.value)?;
        }
        _ => {
            log::trace!("no action for tag {:#04x}", command.tag);
        }
    }
    Ok(())
}
