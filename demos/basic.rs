//! Basic query over two datasets of mixed dimension.
//!
//! ```bash
//! RUST_LOG=easyknn=debug cargo run --example basic
//! ```

use easyknn::{Dataset, Plan, Value};
use tracing_subscriber::EnvFilter;

fn main() -> easyknn::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Every value has three dimensions.
    let mut first = Dataset::new().with_name("Dataset 1");
    first.add_values([
        Value::from_slice(&[1.0, 3.0, 3.0])?,
        Value::from_slice(&[4.0, 5.0, 6.0])?,
    ])?;

    // Two and four dimensions, with negative and fractional coordinates.
    let mut second = Dataset::new().with_name("Dataset 2");
    second.add_values([
        Value::from_slice(&[6.7, 8.0])?,
        Value::from_slice(&[1.0, 2.0, 7.0, -4.1])?,
    ])?;

    let mut plan = Plan::new();
    plan.add_datasets([first, second])?;

    // Five dimensions: every dataset is padded with `None` up to 5 first.
    let query = Value::from_slice(&[1.0, 2.0, 3.0, 5.0, 6.0])?;
    let result = plan.neighbors(&query)?;

    let nearest = result.nearest_neighbor(1)[0];
    println!("nearest value:   {nearest} (distance {:.3})", nearest.distance());

    let farthest = result.nearest_neighbor(-1)[0];
    println!("farthest value:  {farthest} (distance {:.3})", farthest.distance());

    let best = result.nearest_dataset(1)[0];
    println!(
        "nearest dataset: {} (average distance {:.3})",
        best.display_name.as_deref().unwrap_or("unnamed"),
        best.average_dist
    );
    println!("mean distance:   {:.3}", result.average_dist());

    Ok(())
}
