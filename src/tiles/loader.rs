use super::source::TileSource;
use crate::core::constants::USER_AGENT;
use crate::core::geo::TileCoord;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use std::sync::mpsc::Sender;
use std::thread;

/// Completed download: the tile bytes or a failure reason
pub type TileMessage = (TileCoord, std::result::Result<Vec<u8>, String>);

/// Shared blocking HTTP client with a custom User-Agent so that tile
/// servers don't reject the request.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|err| {
            log::warn!("falling back to default tile client: {}", err);
            Client::new()
        })
});

/// Fetches tiles on background threads and sends the result back over an
/// `mpsc` channel. Each tile is requested once; failures are reported, not
/// retried.
pub struct TileLoader {
    tx: Sender<TileMessage>,
}

impl TileLoader {
    /// Create a new tile loader given a sender to report completed downloads.
    pub fn new(tx: Sender<TileMessage>) -> Self {
        Self { tx }
    }

    /// Start downloading the specified tile on a detached thread.
    pub fn start_download(&self, source: &dyn TileSource, coord: TileCoord) {
        let url = source.url(coord);
        let tx = self.tx.clone();

        thread::spawn(move || {
            log::debug!("fetch tile {:?}", coord);
            let result = fetch(&url);
            match &result {
                Ok(data) => log::debug!("downloaded tile {:?} ({} bytes)", coord, data.len()),
                Err(err) => log::warn!("tile {:?} failed: {}", coord, err),
            }
            // The layer may have been dropped while we were downloading.
            let _ = tx.send((coord, result));
        });
    }
}

fn fetch(url: &str) -> std::result::Result<Vec<u8>, String> {
    let resp = HTTP_CLIENT.get(url).send().map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let bytes = resp.bytes().map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}
