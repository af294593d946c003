//! Minimal walkthrough: put a key, read it back, probe the version.
//!
//! Run against a local cluster:
//! `cargo run --example basic -- http://127.0.0.1:2379`

use etcdv2_http::{EtcdClient, KeyRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let endpoints: Vec<String> = std::env::args().skip(1).collect();
    let endpoints = if endpoints.is_empty() {
        vec!["http://127.0.0.1:2379".to_owned()]
    } else {
        endpoints
    };

    let client = EtcdClient::new(endpoints)?;

    println!("server version: {}", client.version().await?);

    let set = client.put("demo/greeting", "hello").await?;
    println!("set {:?} -> {:?}", set.action, set.node);

    let get = client
        .send(KeyRequest::get("demo/greeting"))
        .await?
        .into_key_response()?;
    println!(
        "read back: {}",
        get.node.and_then(|node| node.value).unwrap_or_default()
    );

    client.delete("demo/greeting").await?;
    client.close();
    Ok(())
}
