//! Dispatch commands

use std::path::Path;

use crate::config::AppConfig;
use crate::dispatch::{DispatchHandle, Dispatcher};
use crate::io::read_text_file;

fn report(handle: DispatchHandle) {
    // Failures are already logged by the dispatcher
    if let Ok(body) = handle.wait() {
        println!("{body}");
    }
}

/// Send a file's content to the endpoint and print the response
pub fn execute(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let file = read_text_file(path)?;
    let dispatcher = Dispatcher::http(config.endpoint.clone(), config.request_timeout());
    report(dispatcher.execute(file.content));
    Ok(())
}

/// Send the connectivity probe
pub fn probe(config: &AppConfig) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::http(config.endpoint.clone(), config.request_timeout());
    report(dispatcher.probe());
    Ok(())
}
