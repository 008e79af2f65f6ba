use smartis::SmartisClientBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = SmartisClientBuilder::from_env()?.build()?;

    for metric in client.get_metrics().await? {
        println!("{:<32} {}", metric.code, metric.title);
    }

    Ok(())
}
