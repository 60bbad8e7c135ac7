//! Minimal stand-in for a GUI event loop embedding the client: start a
//! request, then tick until the terminal event shows up.

use std::sync::Arc;
use std::time::Duration;

use restcutie_core::{ClientConfig, ClientInstance, RequestSpec};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let runtime = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?,
    );
    let mut instance = ClientInstance::new(runtime, ClientConfig::default())?;

    let mut spec = RequestSpec::get("https://httpbin.org/get");
    spec.set_query_param("greeting", "hello world");
    let id = instance.start_request(spec)?;
    println!("request {id} started");

    // The tick loop a real UI would drive from its idle handler.
    loop {
        match instance.poll() {
            Some((id, Ok(response))) => {
                println!(
                    "request {id} finished: {} {}",
                    response.status_code, response.status_text
                );
                println!("{}", response.body_pretty());
                break;
            }
            Some((id, Err(e))) => {
                eprintln!("request {id} failed: {e}");
                break;
            }
            None => std::thread::sleep(Duration::from_millis(16)),
        }
    }

    Ok(())
}
