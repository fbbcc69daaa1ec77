//! Demo: monthly usage of five language models as a streamgraph.
//!
//! Set `STREAMGRAPH_LOG=debug` for render diagnostics.

use streamgraph::{Row, StreamgraphConfig, logging, run_streamgraph};

const DEMO_DATA: &str = include_str!("../data/llm_usage.json");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::setup()?;
    let rows: Vec<Row> = serde_json::from_str(DEMO_DATA)?;
    log::info!("loaded {} demo rows", rows.len());
    run_streamgraph(rows, StreamgraphConfig::default())?;
    Ok(())
}
