//! dd-style operand parsing.
//!
//! Two forms are accepted:
//!
//! - `rdd SOURCE DEST`, when neither operand contains `=`;
//! - `rdd if=SOURCE of=DEST [bs=SIZE] [comp=MODE]`, in any order.

use rdd_core::{parse_size, CompressionMode, Error, Locator, Result, TransferRequest};

/// Message for a missing destination.
pub const MISSING_TARGET: &str = "please select target device";

/// Message for a missing source.
pub const MISSING_SOURCE: &str = "please select source";

/// Operands as given, before they are checked for completeness.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Operands {
    pub source: Option<String>,
    pub destination: Option<String>,
    /// `0` selects the default block size.
    pub block_size: usize,
    pub compression: CompressionMode,
}

impl Operands {
    /// Returns `true` when no destination was named, or it was left empty.
    ///
    /// The caller lists removable devices in this case.
    pub fn needs_target(&self) -> bool {
        self.destination.is_none()
    }

    /// Builds the transfer request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingOperand`] when the destination or the source is
    /// missing, in that order.
    pub fn into_request(self) -> Result<TransferRequest> {
        let destination = self.destination.ok_or_else(|| Error::MissingOperand {
            message: MISSING_TARGET.to_string(),
        })?;
        let source = self.source.ok_or_else(|| Error::MissingOperand {
            message: MISSING_SOURCE.to_string(),
        })?;

        Ok(TransferRequest::new(
            Locator::parse(&source),
            Locator::parse(&destination),
        )
        .with_block_size(self.block_size)
        .with_compression(self.compression))
    }
}

/// Parses the positional operands of the command line.
///
/// A lone operand without `=` is taken as the source, leaving the destination
/// unset. An empty source or destination counts as not given, so `of=` never
/// falls back to standard output. Repeated keys keep the last value.
///
/// # Errors
///
/// - [`Error::UnknownArgument`] for a key other than `if`, `of`, `bs`, `comp`,
///   or an operand without `=` outside the two-operand form;
/// - [`Error::MalformedSize`] for a bad `bs=` value;
/// - [`Error::UnknownCompressionType`] for a bad `comp=` value.
pub fn parse_operands<S: AsRef<str>>(args: &[S]) -> Result<Operands> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();

    match args.as_slice() {
        [single] if !single.contains('=') => {
            return Ok(Operands {
                source: named(single),
                ..Operands::default()
            });
        }
        [source, destination] if !source.contains('=') && !destination.contains('=') => {
            return Ok(Operands {
                source: named(source),
                destination: named(destination),
                ..Operands::default()
            });
        }
        _ => {}
    }

    let mut operands = Operands::default();
    for arg in args {
        let unknown = || Error::UnknownArgument {
            token: arg.to_string(),
        };
        let (key, value) = arg.split_once('=').ok_or_else(unknown)?;
        match key {
            "if" => operands.source = named(value),
            "of" => operands.destination = named(value),
            "bs" => {
                let size = parse_size(value)?;
                operands.block_size =
                    usize::try_from(size).map_err(|_| Error::MalformedSize {
                        input: value.to_string(),
                    })?;
            }
            "comp" => operands.compression = value.parse()?,
            _ => return Err(unknown()),
        }
    }

    Ok(operands)
}

fn named(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
