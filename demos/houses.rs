//! Group ranking: sort a new student into the nearest house.
//!
//! Each student is `[courage, intelligence, strength, logic]`. A house is a
//! dataset, ranked by the average distance of its members to the newcomer.
//!
//! ```bash
//! cargo run --example houses
//! ```

use easyknn::{Dataset, Plan, Value};
use tracing_subscriber::EnvFilter;

type Member<'a> = (&'a str, [f64; 4]);

fn house(name: &str, members: &[Member<'_>]) -> easyknn::Result<Dataset> {
    let mut dataset = Dataset::new().with_name(name);
    for (student, traits) in members {
        dataset.add_value(Value::from_slice(traits)?.with_name(*student))?;
    }
    Ok(dataset)
}

fn main() -> easyknn::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let houses = [
        house(
            "Gryffindor",
            &[
                ("Harry Potter", [10.0, 5.0, 8.0, 3.0]),
                ("Hermione Granger", [9.0, 6.0, 7.0, 4.0]),
                ("Ron Weasley", [2.0, 7.0, 6.0, 5.0]),
                ("Neville Longbottom", [7.0, 8.0, 5.0, 6.0]),
            ],
        )?,
        house(
            "Ravenclaw",
            &[
                ("Luna Lovegood", [5.0, 9.0, 3.0, 8.0]),
                ("Cho Chang", [6.0, 9.0, 4.0, 7.0]),
                ("Padma Patil", [7.0, 8.0, 5.0, 5.0]),
                ("Terry Boot", [7.0, 7.0, 6.0, 5.0]),
            ],
        )?,
        house(
            "Hufflepuff",
            &[
                ("Cedric Diggory", [3.0, 8.0, 5.0, 10.0]),
                ("Hannah Abbott", [4.0, 7.0, 6.0, 9.0]),
                ("Susan Bones", [5.0, 6.0, 7.0, 8.0]),
                ("Justin Finch-Fletchley", [6.0, 5.0, 8.0, 7.0]),
            ],
        )?,
        house(
            "Slytherin",
            &[
                ("Draco Malfoy", [7.0, 3.0, 10.0, 1.0]),
                ("Vincent Crabbe", [7.0, 4.0, 9.0, 6.0]),
                ("Gregory Goyle", [6.0, 5.0, 8.0, 7.0]),
                ("Pansy Parkinson", [5.0, 6.0, 7.0, 7.0]),
            ],
        )?,
    ];

    let mut plan = Plan::new();
    plan.add_datasets(houses)?;

    let student = Value::from_slice(&[8.0, 4.0, 2.0, 7.0])?.with_name("Hughes Pham");
    let result = plan.neighbors(&student)?;

    let best = result.nearest_dataset(1)[0];
    println!(
        "{student} belongs in {}",
        best.display_name.as_deref().unwrap_or("?")
    );
    for ranked in result.dataset_neighbors() {
        println!(
            "  {:<12} {:.3}",
            ranked.display_name.as_deref().unwrap_or("?"),
            ranked.average_dist
        );
    }

    println!("potential friends:");
    for friend in result.nearest_neighbor(3) {
        println!("  {friend} ({:.3})", friend.distance());
    }

    Ok(())
}
