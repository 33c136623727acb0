//! Weighted search: pick a car for each customer.
//!
//! Each car is `[fuel consumption, engine power, top speed, price]`. Weights
//! say how much each customer cares about each criterion.
//!
//! ```bash
//! cargo run --example dealership
//! ```

use easyknn::{Dataset, NeighborsParams, Plan, Value, Weight};
use tracing_subscriber::EnvFilter;

fn main() -> easyknn::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut dealership = Dataset::new().with_name("dealership");
    dealership.add_values([
        Value::from_slice(&[7.5, 130.0, 210.0, 30000.0])?.with_name("Mercedes C-Class"),
        Value::from_slice(&[8.1, 120.0, 195.0, 25000.0])?.with_name("Peugeot 508"),
        Value::from_slice(&[6.8, 160.0, 235.0, 40000.0])?.with_name("BMW 3-Series"),
        Value::from_slice(&[7.3, 115.0, 185.0, 22000.0])?.with_name("Skoda Octavia"),
        Value::from_slice(&[9.2, 100.0, 170.0, 20000.0])?.with_name("Toyota Prius Sedan"),
        Value::from_slice(&[4.2, 45.0, 45.0, 7000.0])?.with_name("Citroen Ami"),
    ])?;

    let mut plan = Plan::new();
    plan.add_dataset(dealership)?;

    let customers = [
        // Wants power and speed, price matters less.
        ("Bob", [7.5, 180.0, 220.0, 35000.0], [1.0, 2.0, 2.0, 0.4]),
        // Does not care about fuel consumption at all.
        ("Alice", [7.5, 125.0, 180.0, 23000.0], [0.0, 1.0, 1.0, 0.7]),
        // Only the price counts.
        ("Carol", [0.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]),
    ];

    for (name, wishes, weights) in customers {
        let params = NeighborsParams {
            weight: Weight::from_slice(&weights)?,
            ..Default::default()
        };
        // Cached distances ignore the weight, so start fresh per customer.
        plan.clear_cache();

        let result = plan.neighbors_with(&Value::from_slice(&wishes)?, &params)?;
        println!("best car for {name}: {}", result.nearest_neighbor(1)[0]);
    }

    Ok(())
}
