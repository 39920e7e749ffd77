//! Example: searching a five-record table for the key holding a value.
//!
//! Run with `RUST_LOG=grover_db=debug cargo run --example database_search`
//! to see the search milestones.

use grover_db::{GroverSearch, Record, SearchConfig, SearchResult};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let table: Vec<Record> = [(1, 42), (2, 17), (3, 73), (4, 29), (5, 55)]
        .into_iter()
        .map(Record::from)
        .collect();
    let key_width = 3;

    for target in [73u64, 17, 999] {
        let search = GroverSearch::new(&table, target, key_width)?.with_config(SearchConfig::new().with_seed(target));
        println!("--- Target value {} ({} iterations) ---", target, search.iterations());

        let distribution = search.amplify()?;
        print!("{}", distribution);

        match search.search()? {
            SearchResult::Found(key) => println!("Found key {} holding {}", key, target),
            SearchResult::NotFound => println!("No key holds {}", target),
        }
    }

    // The diffusion operator for a 3-qubit key register.
    println!("{}", grover_db::diffusion(key_width)?);
    Ok(())
}
