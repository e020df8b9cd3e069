use anyhow::Result;
use car_repair::ShopConfig;

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    levelq::init_tracing();

    let config = ShopConfig::from_env()?;
    let per_worker = car_repair::run(&config)?;

    for (n, handled) in per_worker.iter().enumerate() {
        println!("[car-repair] mechanic-{} repaired {} cars", n + 1, handled.len());
    }

    Ok(())
}
