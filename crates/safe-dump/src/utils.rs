use std::{
    future::Future,
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use alloy_chains::Chain;
use alloy_primitives::B256;
use colored::Colorize;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

pub fn print_success_message(message: &str) {
    println!("{}", message.bright_green());
}

pub fn print_error_message(message: &str) {
    println!("{}", message.bright_red());
}

pub fn print_warning_message(message: &str) {
    println!("{}", message.bright_yellow());
}

pub fn print_info_message(message: &str) {
    println!("{}", message.bright_cyan());
}

/// Async version that runs a loading animation until a future completes
pub async fn print_loading_until_async<F, T>(message: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    let message = message.to_string();

    // Spawn the animation in a separate thread
    let animation = std::thread::spawn(move || {
        let mut i = 0;
        let mut stdout = std::io::stdout();

        while running_clone.load(Ordering::Relaxed) {
            let _ = write!(stdout, "\r{} {} ", message, SPINNER[i]);
            let _ = stdout.flush();
            std::thread::sleep(SPINNER_INTERVAL);
            i = (i + 1) % SPINNER.len();
        }

        let _ = write!(stdout, "\r{}\r", " ".repeat(message.chars().count() + 2));
        let _ = stdout.flush();
    });

    let result = future.await;

    running.store(false, Ordering::Relaxed);
    let _ = animation.join();

    result
}

/// Block explorer link of a transaction, if the chain has a known explorer.
pub fn explorer_tx_url(chain_id: u64, tx_hash: B256) -> Option<String> {
    let (_, base_url) = Chain::from_id(chain_id).etherscan_urls()?;
    Some(format!("{}/tx/{tx_hash:#x}", base_url.trim_end_matches('/')))
}

/// Shortens `0x1234…abcd` style for narrow listings.
pub fn short_hex(value: &str) -> String {
    if value.len() <= 14 {
        return value.to_string();
    }
    format!("{}…{}", &value[..8], &value[value.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explorer_links() {
        let hash = B256::repeat_byte(0xab);

        assert_eq!(
            explorer_tx_url(1, hash).unwrap(),
            format!("https://etherscan.io/tx/{hash:#x}")
        );
        assert!(explorer_tx_url(11155111, hash).unwrap().contains("sepolia"));
        assert_eq!(explorer_tx_url(987654321, hash), None);
    }

    #[test]
    fn short_hex_keeps_both_ends() {
        assert_eq!(short_hex("0x1234567890abcdef1234"), "0x123456…1234");
        assert_eq!(short_hex("0x1234"), "0x1234");
    }

    #[tokio::test]
    async fn loading_returns_future_output() {
        let value = print_loading_until_async("Working", async { 42 }).await;
        assert_eq!(value, 42);
    }
}
