use alloy_primitives::Address;
use multisend::MultiSendError;

/// Why a dump attempt did not go through. Every variant is recoverable by retrying.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("Wallet is not connected")]
    WalletNotConnected,

    #[error("None of the selected Safes can be dumped")]
    NothingToDump,

    #[error("A dump is already in progress")]
    Busy,

    #[error("Failed to build transaction for {safe}: {message}")]
    Build { safe: Address, message: String },

    #[error("Failed to sign transaction for {safe}: {message}")]
    Sign { safe: Address, message: String },

    #[error("Failed to encode batch: {0}")]
    Encode(#[from] MultiSendError),

    #[error("Failed to send batch: {0}")]
    Broadcast(String),
}

impl DumpError {
    pub(crate) fn build(safe: Address, err: eyre::Report) -> Self {
        Self::Build { safe, message: short_form(&err) }
    }

    pub(crate) fn sign(safe: Address, err: eyre::Report) -> Self {
        Self::Sign { safe, message: short_form(&err) }
    }

    pub(crate) fn broadcast(err: eyre::Report) -> Self {
        Self::Broadcast(short_form(&err))
    }

    /// One line message of the failing step, shown to the user as is.
    pub fn short_message(&self) -> String {
        match self {
            Self::Build { message, .. } | Self::Sign { message, .. } | Self::Broadcast(message) => {
                message.clone()
            }
            other => short_form(other),
        }
    }
}

/// First line of the outermost error message.
fn short_form(err: &dyn std::fmt::Display) -> String {
    let message = err.to_string();
    message.lines().next().unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_is_first_line_of_cause() {
        let err = DumpError::sign(
            Address::ZERO,
            eyre::eyre!("User rejected the request.\n\nRequest Arguments: ..."),
        );

        assert_eq!(err.short_message(), "User rejected the request.");
        assert!(err.to_string().starts_with("Failed to sign transaction for 0x"));
    }

    #[test]
    fn short_message_of_plain_variants() {
        assert_eq!(DumpError::NothingToDump.short_message(), "None of the selected Safes can be dumped");
        assert_eq!(
            DumpError::broadcast(eyre::eyre!("insufficient funds for gas")).short_message(),
            "insufficient funds for gas"
        );
    }
}
