//! Display wiring descriptor
//!
//! Identifies which board pins serve as chip-select, data/command
//! select, and reset, plus the optional canned initialization byte
//! sequence some controllers expect at bring-up.
//!
//! # Init sequence encoding
//!
//! A canned sequence is a stream of entries:
//!
//! ```text
//! [opcode, n_params | DELAY_FLAG, params..., delay?]
//! ```
//!
//! The low 7 bits of the second byte give the parameter count; if the
//! high bit is set, one extra byte follows the parameters giving a
//! post-command delay in milliseconds (0xFF means 500 ms). The stream
//! is transmitted verbatim during controller bring-up.

use heapless::Vec;

use crate::error::BringupError;

/// Maximum length of a canned init sequence in bytes
pub const MAX_INIT_SEQUENCE: usize = 64;

/// Delay-byte-follows flag in an init sequence entry
pub const DELAY_FLAG: u8 = 0x80;

/// Delay value meaning "500 ms"
const DELAY_EXTENDED: u8 = 0xFF;

/// Bounded canned init byte sequence
pub type InitSequence = Vec<u8, MAX_INIT_SEQUENCE>;

/// Identifier of a board pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

/// How controller commands are signalled at bring-up
///
/// The two variants are mutually exclusive per wiring descriptor:
/// either a dedicated data/command select pin is named, or the
/// controller expects a canned init byte sequence instead.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandSource {
    /// Dedicated data/command select pin
    Pin(PinId),
    /// Canned init sequence transmitted verbatim at bring-up
    Sequence(InitSequence),
}

/// Wiring descriptor for one panel
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WiringDescriptor {
    /// Chip-select pin
    pub chip_select: PinId,
    /// Reset pin (held through the reset timing window during init)
    pub reset: PinId,
    /// Command pin or canned init sequence
    pub command: CommandSource,
}

impl WiringDescriptor {
    /// Descriptor with a dedicated data/command pin
    pub const fn with_command_pin(chip_select: PinId, command: PinId, reset: PinId) -> Self {
        Self {
            chip_select,
            reset,
            command: CommandSource::Pin(command),
        }
    }

    /// Descriptor with a canned init sequence
    ///
    /// Fails with `ControllerInitFailure` if the sequence does not fit
    /// the bounded buffer.
    pub fn with_init_sequence(
        chip_select: PinId,
        sequence: &[u8],
        reset: PinId,
    ) -> Result<Self, BringupError> {
        let sequence =
            InitSequence::from_slice(sequence).map_err(|_| BringupError::ControllerInitFailure)?;
        Ok(Self {
            chip_select,
            reset,
            command: CommandSource::Sequence(sequence),
        })
    }

    /// Validate the bus-wiring binding
    ///
    /// The command pin must be distinct from chip-select, and a canned
    /// init sequence must decode completely.
    pub fn validate(&self) -> Result<(), BringupError> {
        match &self.command {
            CommandSource::Pin(pin) => {
                if *pin == self.chip_select {
                    return Err(BringupError::ControllerInitFailure);
                }
            }
            CommandSource::Sequence(sequence) => validate_sequence(sequence)?,
        }
        Ok(())
    }
}

/// One decoded init sequence entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitOp<'a> {
    /// Controller command opcode
    pub opcode: u8,
    /// Command parameters
    pub params: &'a [u8],
    /// Delay to observe after the command, in milliseconds
    pub delay_ms: u32,
}

/// Decode the next entry of an init sequence
///
/// Returns the entry and the remaining bytes, `Ok(None)` at end of
/// stream, or `ControllerInitFailure` for a truncated entry.
fn next_op(bytes: &[u8]) -> Result<Option<(InitOp<'_>, &[u8])>, BringupError> {
    let (&opcode, rest) = match bytes.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };
    let (&flags, rest) = rest
        .split_first()
        .ok_or(BringupError::ControllerInitFailure)?;

    let n_params = (flags & !DELAY_FLAG) as usize;
    if rest.len() < n_params {
        return Err(BringupError::ControllerInitFailure);
    }
    let (params, rest) = rest.split_at(n_params);

    let (delay_ms, rest) = if flags & DELAY_FLAG != 0 {
        let (&delay, rest) = rest
            .split_first()
            .ok_or(BringupError::ControllerInitFailure)?;
        let delay_ms = if delay == DELAY_EXTENDED {
            500
        } else {
            delay as u32
        };
        (delay_ms, rest)
    } else {
        (0, rest)
    };

    Ok(Some((
        InitOp {
            opcode,
            params,
            delay_ms,
        },
        rest,
    )))
}

/// Check that a sequence decodes completely
pub fn validate_sequence(sequence: &[u8]) -> Result<(), BringupError> {
    let mut rest = sequence;
    while let Some((_, tail)) = next_op(rest)? {
        rest = tail;
    }
    Ok(())
}

/// Iterator over the entries of an already-validated init sequence
///
/// Decoding errors terminate the iteration; call [`validate_sequence`]
/// first to reject malformed input.
pub fn init_ops(sequence: &[u8]) -> impl Iterator<Item = InitOp<'_>> {
    let mut rest = sequence;
    core::iter::from_fn(move || match next_op(rest) {
        Ok(Some((op, tail))) => {
            rest = tail;
            Some(op)
        }
        _ => None,
    })
}
