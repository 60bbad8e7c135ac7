//! Sends one request from the command line and prints the response the way
//! the viewer window would lay it out.

use restcutie_core::{build_transport, ClientConfig, Dispatcher, RequestSpec};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://httpbin.org/get".to_string());

    let config = ClientConfig::default();
    let client = build_transport(&config)?;
    let dispatcher = Dispatcher::new(client, config);

    let mut spec = RequestSpec::get(&url);
    spec.set_query_param("greeting", "hello world");
    spec.set_header("x-demo", "quick-request");

    let response = dispatcher.send(spec, CancellationToken::new()).await?;

    println!(
        "{} {} - {}",
        response.status_code, response.status_text, response.request_url
    );
    for (name, value) in response.header_rows() {
        println!("  {name}: {value}");
    }
    println!("{}", response.body_pretty());

    Ok(())
}
